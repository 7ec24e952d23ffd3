pub mod catalog;
pub mod config;
pub mod error;
pub mod prompt;
pub mod recommend;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::{ReadrecError, Result};
