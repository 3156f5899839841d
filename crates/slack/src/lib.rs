pub mod blocks;
pub mod bridge;
pub mod client;
pub mod reminder;
