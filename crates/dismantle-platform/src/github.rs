//! GitHub REST implementation of [`DeploymentPlatform`].
//!
//! Every request carries the bearer token and the versioned media type. A
//! rate-limit response (429, or 403 with the quota exhausted) is retried
//! exactly once after the delay the API asks for; a second one is returned
//! as [`PlatformError::RateLimited`].

use crate::provider::{DeploymentPlatform, DeploymentRecord, DeploymentState, Environment};
use crate::{PlatformError, Result};
use async_trait::async_trait;
use dismantle_config::{Repository, constants};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{Instrument, debug, warn};

const MAX_ATTEMPTS: u32 = 2;

pub struct GitHubPlatform {
    client: Client,
    base_url: Url,
    repository: Repository,
    token: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct GhDeployment {
    id: u64,
    #[serde(rename = "ref")]
    git_ref: String,
}

#[derive(Debug, Deserialize)]
struct GhEnvironment {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct GhErrorBody {
    message: String,
}

impl GitHubPlatform {
    pub fn new(token: String, repository: Repository) -> Result<Self> {
        Self::with_base_url(token, repository, constants::DEFAULT_API_URL)
    }

    /// Point the client at another API root, e.g. a GitHub Enterprise
    /// `https://ghe.example.com/api/v3`.
    pub fn with_base_url(token: String, repository: Repository, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PlatformError::Transport(format!("invalid API URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PlatformError::Transport(format!(
                "invalid API URL {}",
                base_url
            )));
        }

        let client = Client::builder().timeout(constants::HTTP_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url,
            repository,
            token,
            user_agent: format!("dismantle/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// `{base}/repos/{owner}/{repo}/{segments...}`, each segment percent-encoded.
    fn repo_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push("repos")
                .push(&self.repository.owner)
                .push(&self.repository.name)
                .extend(segments);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut builder = self
                .client
                .request(method.clone(), url.clone())
                .header(AUTHORIZATION, format!("Bearer {}", self.token))
                .header(ACCEPT, constants::ACCEPT_HEADER)
                .header("X-GitHub-Api-Version", constants::API_VERSION)
                .header(USER_AGENT, &self.user_agent);

            if let Some(body) = body {
                builder = builder.json(body);
            }

            let span = tracing::info_span!(
                "github_request",
                method = %method,
                path = url.path(),
                attempt,
            );

            let response = builder.send().instrument(span).await?;
            let status = response.status();
            debug!("{} {} -> {}", method, url.path(), status);

            if status.is_success() {
                return Ok(response);
            }

            match error_from_response(response).await {
                PlatformError::RateLimited { retry_after } if attempt < MAX_ATTEMPTS => {
                    warn!(
                        "Rate limited on {} {}, retrying in {}s",
                        method,
                        url.path(),
                        retry_after.as_secs()
                    );
                    tokio::time::sleep(retry_after).await;
                }
                error => return Err(error),
            }
        }
    }
}

#[async_trait]
impl DeploymentPlatform for GitHubPlatform {
    async fn list_deployments(
        &self,
        environment: &str,
        git_ref: Option<&str>,
        page: u32,
        per_page: usize,
    ) -> Result<Vec<DeploymentRecord>> {
        let mut url = self.repo_url(&["deployments"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("environment", environment);
            if let Some(git_ref) = git_ref {
                query.append_pair("ref", git_ref);
            }
            query
                .append_pair("per_page", &per_page.to_string())
                .append_pair("page", &page.to_string());
        }

        let deployments: Vec<GhDeployment> = self.send(Method::GET, url, None).await?.json().await?;

        Ok(deployments
            .into_iter()
            .map(|d| DeploymentRecord {
                id: d.id,
                git_ref: d.git_ref,
            })
            .collect())
    }

    async fn create_deployment_status(
        &self,
        deployment_id: u64,
        state: DeploymentState,
    ) -> Result<()> {
        let id = deployment_id.to_string();
        let url = self.repo_url(&["deployments", id.as_str(), "statuses"]);
        let body = serde_json::json!({ "state": state.as_str() });

        self.send(Method::POST, url, Some(&body)).await?;

        Ok(())
    }

    async fn delete_deployment(&self, deployment_id: u64) -> Result<()> {
        let id = deployment_id.to_string();
        let url = self.repo_url(&["deployments", id.as_str()]);

        self.send(Method::DELETE, url, None).await?;

        Ok(())
    }

    async fn get_environment(&self, name: &str) -> Result<Environment> {
        let url = self.repo_url(&["environments", name]);
        let environment: GhEnvironment = self.send(Method::GET, url, None).await?.json().await?;

        Ok(Environment {
            id: environment.id,
            name: environment.name,
        })
    }

    async fn delete_environment(&self, name: &str) -> Result<()> {
        let url = self.repo_url(&["environments", name]);

        self.send(Method::DELETE, url, None).await?;

        Ok(())
    }
}

async fn error_from_response(response: Response) -> PlatformError {
    let status = response.status();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    if let Some(retry_after) = rate_limit_delay(status, response.headers(), now) {
        return PlatformError::RateLimited { retry_after };
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GhErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);

    match status {
        StatusCode::NOT_FOUND => PlatformError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PlatformError::Auth(format!("{}: {}", status, message))
        }
        status => PlatformError::Transport(format!("{}: {}", status, message)),
    }
}

/// Delay to wait before retrying, or `None` when the response is not a
/// rate-limit signal.
fn rate_limit_delay(status: StatusCode, headers: &HeaderMap, now: u64) -> Option<Duration> {
    let header_u64 = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    };

    let retry_after = header_u64("retry-after");
    let remaining = header_u64("x-ratelimit-remaining");

    let limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && (remaining == Some(0) || retry_after.is_some()));
    if !limited {
        return None;
    }

    let delay = match (retry_after, header_u64("x-ratelimit-reset")) {
        (Some(secs), _) => Duration::from_secs(secs),
        (None, Some(reset)) => Duration::from_secs(reset.saturating_sub(now)),
        (None, None) => constants::DEFAULT_RATE_LIMIT_DELAY,
    };

    Some(delay.min(constants::MAX_RATE_LIMIT_DELAY))
}
