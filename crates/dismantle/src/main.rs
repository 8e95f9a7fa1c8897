mod report;

use dismantle_config::ActionInputs;
use dismantle_platform::GitHubPlatform;
use dismantle_teardown::Teardown;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Teardown failed: {:#}", e);
            report::set_failed(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let inputs = ActionInputs::from_env()?;

    tracing::info!(
        "Tearing down environment {} in {}",
        inputs.environment,
        inputs.repository
    );

    let platform = GitHubPlatform::with_base_url(
        inputs.token.clone(),
        inputs.repository.clone(),
        &inputs.api_url,
    )?;

    let summary = Teardown::new(Arc::new(platform), &inputs).run().await?;

    tracing::info!(
        "Teardown complete: {} found, {} deactivated, {} deleted, environment {}",
        summary.found,
        summary.deactivated,
        summary.deleted,
        summary.environment
    );

    Ok(())
}

fn init_tracing() {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var("DISMANTLE_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}
