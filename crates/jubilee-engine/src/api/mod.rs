pub mod config;
pub mod greeting;
pub mod types;
