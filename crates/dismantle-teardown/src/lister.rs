use crate::error::Result;
use dismantle_config::constants::{DEPLOYMENTS_PAGE_SIZE, FIRST_PAGE};
use dismantle_platform::{DeploymentPlatform, DeploymentRecord};
use tracing::debug;

/// Collect every deployment registered for `environment`, in the order the
/// platform returns them. A page shorter than the page size ends the listing.
pub async fn list_deployments(
    platform: &dyn DeploymentPlatform,
    environment: &str,
    git_ref: Option<&str>,
) -> Result<Vec<DeploymentRecord>> {
    let mut deployments = Vec::new();
    let mut page = FIRST_PAGE;

    loop {
        let batch = platform
            .list_deployments(environment, git_ref, page, DEPLOYMENTS_PAGE_SIZE)
            .await?;
        let count = batch.len();

        debug!(
            "Fetched page {} of deployments for {}: {} records",
            page, environment, count
        );

        deployments.extend(batch);

        if count < DEPLOYMENTS_PAGE_SIZE {
            break;
        }
        page += 1;
    }

    Ok(deployments)
}
