mod config;
pub mod constants;
mod error;

pub use config::{ActionInputs, Policy, Repository};
pub use error::{ConfigError, Result};
