pub mod config;
pub mod error;
pub mod integrate;
pub mod logging;
pub mod probe;
pub mod validate_env;

pub use error::{PreflightError, Result};
