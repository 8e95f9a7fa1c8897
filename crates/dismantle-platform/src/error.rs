use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("rate limit exceeded, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("GitHub API error: {0}")]
    Transport(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
