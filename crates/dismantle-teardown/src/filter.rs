use dismantle_platform::DeploymentRecord;

/// Deployments a run acts on, plus how to describe them in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub ids: Vec<u64>,
    git_ref: Option<String>,
    listed: usize,
}

impl Selection {
    /// Without a ref every listed deployment is selected; with one, only
    /// deployments whose ref matches exactly.
    pub fn new(deployments: &[DeploymentRecord], git_ref: Option<&str>) -> Self {
        let git_ref = git_ref.filter(|r| !r.is_empty());

        let ids = deployments
            .iter()
            .filter(|d| git_ref.is_none_or(|r| d.git_ref == r))
            .map(|d| d.id)
            .collect();

        Self {
            ids,
            git_ref: git_ref.map(str::to_string),
            listed: deployments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn git_ref(&self) -> Option<&str> {
        self.git_ref.as_deref()
    }

    pub fn describe(&self, verb: &str, environment: &str) -> String {
        match &self.git_ref {
            Some(git_ref) => format!(
                "{} deployment ref {} in environment {}",
                verb, git_ref, environment
            ),
            None => format!(
                "{} all {} deployments in environment {}",
                verb, self.listed, environment
            ),
        }
    }
}
