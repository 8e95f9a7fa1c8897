use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    #[error("invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
