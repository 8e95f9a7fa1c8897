use crate::error::Result;
use dismantle_platform::{DeploymentPlatform, PlatformError};
use std::fmt;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentOutcome {
    /// Policy did not allow deleting the environment.
    Skipped,
    /// Deployments for other refs remain, so the environment was kept.
    Retained,
    /// The environment did not exist.
    Absent,
    Deleted,
}

impl fmt::Display for EnvironmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnvironmentOutcome::Skipped => "skipped",
            EnvironmentOutcome::Retained => "retained",
            EnvironmentOutcome::Absent => "absent",
            EnvironmentOutcome::Deleted => "deleted",
        };
        write!(f, "{}", s)
    }
}

/// Delete `environment` if it exists. A missing environment is not an error.
pub async fn remove_environment(
    platform: &dyn DeploymentPlatform,
    environment: &str,
) -> Result<EnvironmentOutcome> {
    match platform.get_environment(environment).await {
        Ok(_) => {}
        Err(PlatformError::NotFound(_)) => {
            info!("environment {} does not exist, nothing to delete", environment);
            return Ok(EnvironmentOutcome::Absent);
        }
        Err(e) => {
            error!("Error deleting environment");
            return Err(e.into());
        }
    }

    info!("deleting environment {}", environment);
    platform.delete_environment(environment).await?;
    info!("environment {} deleted", environment);

    Ok(EnvironmentOutcome::Deleted)
}
