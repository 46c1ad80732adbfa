pub mod config;
pub mod consume;
pub mod error;
pub mod produce;
