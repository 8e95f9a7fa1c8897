use crate::error::{BatchAction, Result, TeardownError};
use dismantle_platform::{DeploymentPlatform, DeploymentState, PlatformError};
use futures::{StreamExt, stream};
use std::future::Future;
use tracing::error;

pub async fn deactivate_deployments(
    platform: &dyn DeploymentPlatform,
    ids: &[u64],
    max_concurrency: usize,
) -> Result<()> {
    run_batch(ids, max_concurrency, BatchAction::Deactivate, |id| {
        platform.create_deployment_status(id, DeploymentState::Inactive)
    })
    .await
}

pub async fn delete_deployments(
    platform: &dyn DeploymentPlatform,
    ids: &[u64],
    max_concurrency: usize,
) -> Result<()> {
    run_batch(ids, max_concurrency, BatchAction::Delete, |id| {
        platform.delete_deployment(id)
    })
    .await
}

/// Runs `op` for every id with at most `max_concurrency` requests in flight.
/// All requests are driven to completion before the outcome is decided; the
/// first failure in id order becomes the batch error.
async fn run_batch<F, Fut>(
    ids: &[u64],
    max_concurrency: usize,
    action: BatchAction,
    op: F,
) -> Result<()>
where
    F: Fn(u64) -> Fut,
    Fut: Future<Output = std::result::Result<(), PlatformError>>,
{
    let results: Vec<(u64, std::result::Result<(), PlatformError>)> =
        stream::iter(ids.iter().copied())
            .map(|id| {
                let request = op(id);
                async move { (id, request.await) }
            })
            .buffered(max_concurrency.max(1))
            .collect()
            .await;

    let mut first_failure = None;
    for (deployment_id, result) in results {
        if let Err(e) = result {
            error!("Failed {} deployment {}: {}", action, deployment_id, e);
            if first_failure.is_none() {
                first_failure = Some(TeardownError::Batch {
                    action,
                    deployment_id,
                    source: e,
                });
            }
        }
    }

    match first_failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
