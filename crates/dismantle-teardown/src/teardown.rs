use crate::environment::{EnvironmentOutcome, remove_environment};
use crate::error::Result;
use crate::filter::Selection;
use crate::{batch, lister};
use dismantle_config::{ActionInputs, Policy};
use dismantle_platform::DeploymentPlatform;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownSummary {
    pub found: usize,
    pub targeted: usize,
    pub deactivated: usize,
    pub deleted: usize,
    pub environment: EnvironmentOutcome,
}

/// One teardown run against a single environment.
///
/// Phases run strictly in order: list, filter, deactivate, delete, remove
/// environment. Each phase finishes all of its requests before the next one
/// starts, and the first error aborts the remaining phases.
pub struct Teardown {
    platform: Arc<dyn DeploymentPlatform>,
    environment: String,
    git_ref: Option<String>,
    policy: Policy,
    max_concurrency: usize,
}

impl Teardown {
    pub fn new(platform: Arc<dyn DeploymentPlatform>, inputs: &ActionInputs) -> Self {
        Self {
            platform,
            environment: inputs.environment.clone(),
            git_ref: inputs.git_ref.clone().filter(|r| !r.is_empty()),
            policy: inputs.policy(),
            max_concurrency: inputs.max_concurrency,
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub async fn run(&self) -> Result<TeardownSummary> {
        let platform = self.platform.as_ref();
        let environment = self.environment.as_str();

        let deployments =
            lister::list_deployments(platform, environment, self.git_ref.as_deref()).await?;
        info!("Found {} deployments", deployments.len());

        let selection = Selection::new(&deployments, self.git_ref.as_deref());

        // Deactivation always runs: the platform refuses to delete active
        // deployments.
        info!("{}", selection.describe("deactivating", environment));
        batch::deactivate_deployments(platform, &selection.ids, self.max_concurrency).await?;

        let mut deleted = 0;
        if self.policy.delete_deployments {
            info!("{}", selection.describe("deleting", environment));
            batch::delete_deployments(platform, &selection.ids, self.max_concurrency).await?;
            deleted = selection.len();
        }

        let environment_outcome = if !self.policy.delete_environment {
            EnvironmentOutcome::Skipped
        } else if self.has_remaining_deployments().await? {
            EnvironmentOutcome::Retained
        } else {
            remove_environment(platform, environment).await?
        };

        info!("done");

        Ok(TeardownSummary {
            found: deployments.len(),
            targeted: selection.len(),
            deactivated: selection.len(),
            deleted,
            environment: environment_outcome,
        })
    }

    /// With a ref filter only part of the environment was cleaned; deployments
    /// for other refs keep the environment alive.
    async fn has_remaining_deployments(&self) -> Result<bool> {
        if self.git_ref.is_none() {
            return Ok(false);
        }

        let remaining =
            lister::list_deployments(self.platform.as_ref(), &self.environment, None).await?;
        if remaining.is_empty() {
            return Ok(false);
        }

        info!(
            "{} deployments remain in environment {}, keeping the environment",
            remaining.len(),
            self.environment
        );
        Ok(true)
    }
}
