pub mod available_spaces;
pub mod safety_messages;
pub mod stations;
pub mod users;
