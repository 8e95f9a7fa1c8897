use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const API_VERSION: &str = "2022-11-28";
pub const ACCEPT_HEADER: &str = "application/vnd.github+json";

pub const DEPLOYMENTS_PAGE_SIZE: usize = 100;
pub const FIRST_PAGE: u32 = 1;

pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(60);
pub const MAX_RATE_LIMIT_DELAY: Duration = Duration::from_secs(300);

pub const INACTIVE_STATE: &str = "inactive";
