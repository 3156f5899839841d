pub mod broadcast;
pub mod config;
pub mod protocol;
pub mod signing;
pub mod types;
