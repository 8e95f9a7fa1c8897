mod error;
mod github;
mod provider;

pub use error::{PlatformError, Result};
pub use github::GitHubPlatform;
pub use provider::{DeploymentPlatform, DeploymentRecord, DeploymentState, Environment};
