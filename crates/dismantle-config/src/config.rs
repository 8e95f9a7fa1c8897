use crate::constants;
use crate::error::{ConfigError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Repository {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// What a run is allowed to mutate, derived from the two action flags.
///
/// `deactivate_only` wins over `delete_deployments_only`: when set, nothing is
/// ever deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub deactivate_only: bool,
    pub delete_deployments_only: bool,
    pub delete_deployments: bool,
    pub delete_environment: bool,
}

impl Policy {
    pub fn from_flags(only_remove_deployments: bool, only_deactivate_deployments: bool) -> Self {
        let (delete_deployments, delete_environment) = if only_deactivate_deployments {
            (false, false)
        } else if only_remove_deployments {
            (true, false)
        } else {
            (true, true)
        };

        Self {
            deactivate_only: only_deactivate_deployments,
            delete_deployments_only: only_remove_deployments,
            delete_deployments,
            delete_environment,
        }
    }
}

/// Inputs of a single run, read once from the runner environment.
#[derive(Clone)]
pub struct ActionInputs {
    pub token: String,
    pub environment: String,
    pub git_ref: Option<String>,
    pub only_remove_deployments: bool,
    pub only_deactivate_deployments: bool,
    pub repository: Repository,
    pub api_url: String,
    pub max_concurrency: usize,
}

impl ActionInputs {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required_input(&lookup, "token")?;
        let environment = required_input(&lookup, "environment")?;
        let git_ref = input(&lookup, "ref");
        let only_remove_deployments = flag_input(&lookup, "onlyRemoveDeployments");
        let only_deactivate_deployments = flag_input(&lookup, "onlyDeactivateDeployments");

        let repository: Repository = lookup("GITHUB_REPOSITORY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingInput("GITHUB_REPOSITORY".to_string()))?
            .parse()?;

        let api_url = lookup("GITHUB_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| constants::DEFAULT_API_URL.to_string());

        let max_concurrency = match lookup("DISMANTLE_MAX_CONCURRENCY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "DISMANTLE_MAX_CONCURRENCY".to_string(),
                        value: raw,
                    });
                }
            },
            None => constants::DEFAULT_MAX_CONCURRENT_REQUESTS,
        };

        debug!(
            "Loaded inputs for {} (environment: {}, ref: {:?})",
            repository, environment, git_ref
        );

        Ok(Self {
            token,
            environment,
            git_ref,
            only_remove_deployments,
            only_deactivate_deployments,
            repository,
            api_url,
            max_concurrency,
        })
    }

    pub fn policy(&self) -> Policy {
        Policy::from_flags(
            self.only_remove_deployments,
            self.only_deactivate_deployments,
        )
    }
}

impl fmt::Debug for ActionInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInputs")
            .field("token", &"***")
            .field("environment", &self.environment)
            .field("git_ref", &self.git_ref)
            .field("only_remove_deployments", &self.only_remove_deployments)
            .field(
                "only_deactivate_deployments",
                &self.only_deactivate_deployments,
            )
            .field("repository", &self.repository)
            .field("api_url", &self.api_url)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

/// Actions exposes `with:` inputs as `INPUT_<NAME>`, upper-cased with spaces
/// replaced by underscores.
fn input_env_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn input<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&input_env_key(name))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_input<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    input(lookup, name).ok_or_else(|| ConfigError::MissingInput(name.to_string()))
}

fn flag_input<F>(lookup: &F, name: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    input(lookup, name).as_deref() == Some("true")
}
