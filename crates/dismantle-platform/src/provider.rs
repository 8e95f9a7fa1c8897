use crate::Result;
use async_trait::async_trait;

/// Remote surface the teardown workflow drives. One instance is bound to a
/// single repository.
#[async_trait]
pub trait DeploymentPlatform: Send + Sync {
    /// Fetch one page of deployments registered for `environment`. Pages are
    /// 1-based.
    async fn list_deployments(
        &self,
        environment: &str,
        git_ref: Option<&str>,
        page: u32,
        per_page: usize,
    ) -> Result<Vec<DeploymentRecord>>;

    async fn create_deployment_status(
        &self,
        deployment_id: u64,
        state: DeploymentState,
    ) -> Result<()>;

    async fn delete_deployment(&self, deployment_id: u64) -> Result<()>;

    /// Returns `PlatformError::NotFound` when the environment does not exist.
    async fn get_environment(&self, name: &str) -> Result<Environment>;

    async fn delete_environment(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub id: u64,
    pub git_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentState {
    Active,
    Inactive,
}

impl DeploymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentState::Active => "active",
            DeploymentState::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeploymentState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(DeploymentState::Active),
            "inactive" => Ok(DeploymentState::Inactive),
            _ => Err(format!("Invalid deployment state: {}", s)),
        }
    }
}
