pub mod config;
pub mod engines;
pub mod error;
pub mod problems;
pub mod push;
pub mod types;

pub use error::{Result, SwarmError};
