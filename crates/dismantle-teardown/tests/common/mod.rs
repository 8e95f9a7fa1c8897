#![allow(dead_code)]

use async_trait::async_trait;
use dismantle_config::{ActionInputs, Repository, constants};
use dismantle_platform::{
    DeploymentPlatform, DeploymentRecord, DeploymentState, Environment, PlatformError, Result,
};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { git_ref: Option<String>, page: u32 },
    SetStatus(u64, DeploymentState),
    DeleteDeployment(u64),
    GetEnvironment(String),
    DeleteEnvironment(String),
}

impl Call {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Call::SetStatus(..) | Call::DeleteDeployment(_) | Call::DeleteEnvironment(_)
        )
    }
}

#[derive(Debug, Clone)]
struct FakeDeployment {
    id: u64,
    git_ref: String,
    inactive: bool,
}

#[derive(Debug, Default)]
struct State {
    environment_exists: bool,
    deployments: Vec<FakeDeployment>,
    calls: Vec<Call>,
    next_id: u64,
    fail_delete_of: Option<u64>,
    fail_environment_lookup: bool,
}

/// In-memory stand-in for the deployments API of one repository environment.
/// Like the real platform it refuses to delete deployments that are still
/// active, and deleting the environment drops its deployments.
pub struct FakePlatform {
    environment: String,
    honours_ref_filter: bool,
    state: Mutex<State>,
}

impl FakePlatform {
    pub fn new(environment: &str) -> Self {
        Self {
            environment: environment.to_string(),
            honours_ref_filter: true,
            state: Mutex::new(State {
                next_id: 1000,
                ..Default::default()
            }),
        }
    }

    pub fn ignoring_ref_filter(mut self) -> Self {
        self.honours_ref_filter = false;
        self
    }

    pub fn create_environment(&self) {
        self.state.lock().unwrap().environment_exists = true;
    }

    pub fn add_deployment(&self, git_ref: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.deployments.push(FakeDeployment {
            id,
            git_ref: git_ref.to_string(),
            inactive: false,
        });
        id
    }

    pub fn add_deployments(&self, git_ref: &str, count: usize) -> Vec<u64> {
        (0..count).map(|_| self.add_deployment(git_ref)).collect()
    }

    pub fn fail_delete_of(&self, id: u64) {
        self.state.lock().unwrap().fail_delete_of = Some(id);
    }

    pub fn fail_environment_lookup(&self) {
        self.state.lock().unwrap().fail_environment_lookup = true;
    }

    pub fn environment_exists(&self) -> bool {
        self.state.lock().unwrap().environment_exists
    }

    pub fn deployments(&self) -> Vec<DeploymentRecord> {
        self.state
            .lock()
            .unwrap()
            .deployments
            .iter()
            .map(|d| DeploymentRecord {
                id: d.id,
                git_ref: d.git_ref.clone(),
            })
            .collect()
    }

    pub fn is_inactive(&self, id: u64) -> bool {
        self.state
            .lock()
            .unwrap()
            .deployments
            .iter()
            .any(|d| d.id == id && d.inactive)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl DeploymentPlatform for FakePlatform {
    async fn list_deployments(
        &self,
        environment: &str,
        git_ref: Option<&str>,
        page: u32,
        per_page: usize,
    ) -> Result<Vec<DeploymentRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List {
            git_ref: git_ref.map(str::to_string),
            page,
        });

        if environment != self.environment {
            return Ok(Vec::new());
        }

        let skip = (page.max(1) as usize - 1) * per_page;
        Ok(state
            .deployments
            .iter()
            .filter(|d| !self.honours_ref_filter || git_ref.is_none_or(|r| d.git_ref == r))
            .skip(skip)
            .take(per_page)
            .map(|d| DeploymentRecord {
                id: d.id,
                git_ref: d.git_ref.clone(),
            })
            .collect())
    }

    async fn create_deployment_status(
        &self,
        deployment_id: u64,
        state: DeploymentState,
    ) -> Result<()> {
        let mut guard = self.state.lock().unwrap();
        guard.calls.push(Call::SetStatus(deployment_id, state));

        let deployment = guard
            .deployments
            .iter_mut()
            .find(|d| d.id == deployment_id)
            .ok_or_else(|| PlatformError::NotFound(format!("deployment {}", deployment_id)))?;
        deployment.inactive = state == DeploymentState::Inactive;

        Ok(())
    }

    async fn delete_deployment(&self, deployment_id: u64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteDeployment(deployment_id));

        if state.fail_delete_of == Some(deployment_id) {
            return Err(PlatformError::Transport(
                "500 Internal Server Error: Server Error".to_string(),
            ));
        }

        let index = state
            .deployments
            .iter()
            .position(|d| d.id == deployment_id)
            .ok_or_else(|| PlatformError::NotFound(format!("deployment {}", deployment_id)))?;

        if !state.deployments[index].inactive {
            return Err(PlatformError::Transport(
                "422 Unprocessable Entity: We cannot delete an active deployment".to_string(),
            ));
        }

        state.deployments.remove(index);
        Ok(())
    }

    async fn get_environment(&self, name: &str) -> Result<Environment> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetEnvironment(name.to_string()));

        if state.fail_environment_lookup {
            return Err(PlatformError::Auth(
                "403 Forbidden: Resource not accessible by integration".to_string(),
            ));
        }

        if name == self.environment && state.environment_exists {
            Ok(Environment {
                id: 1,
                name: name.to_string(),
            })
        } else {
            Err(PlatformError::NotFound("Not Found".to_string()))
        }
    }

    async fn delete_environment(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteEnvironment(name.to_string()));

        if name != self.environment || !state.environment_exists {
            return Err(PlatformError::NotFound("Not Found".to_string()));
        }

        state.environment_exists = false;
        state.deployments.clear();
        Ok(())
    }
}

pub fn inputs(
    environment: &str,
    git_ref: Option<&str>,
    only_remove_deployments: bool,
    only_deactivate_deployments: bool,
) -> ActionInputs {
    ActionInputs {
        token: "test-token".to_string(),
        environment: environment.to_string(),
        git_ref: git_ref.map(str::to_string),
        only_remove_deployments,
        only_deactivate_deployments,
        repository: Repository {
            owner: "strumwolf".to_string(),
            name: "delete-deployment-environment".to_string(),
        },
        api_url: constants::DEFAULT_API_URL.to_string(),
        max_concurrency: constants::DEFAULT_MAX_CONCURRENT_REQUESTS,
    }
}
