mod batch;
mod environment;
mod error;
mod filter;
mod lister;
mod teardown;

pub use batch::{deactivate_deployments, delete_deployments};
pub use environment::{EnvironmentOutcome, remove_environment};
pub use error::{BatchAction, Result, TeardownError};
pub use filter::Selection;
pub use lister::list_deployments;
pub use teardown::{Teardown, TeardownSummary};
