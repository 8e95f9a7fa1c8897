use dismantle_platform::PlatformError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Deactivate,
    Delete,
}

impl fmt::Display for BatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchAction::Deactivate => write!(f, "deactivating"),
            BatchAction::Delete => write!(f, "deleting"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TeardownError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("{action} deployment {deployment_id} failed: {source}")]
    Batch {
        action: BatchAction,
        deployment_id: u64,
        #[source]
        source: PlatformError,
    },
}

pub type Result<T> = std::result::Result<T, TeardownError>;
