// crates/forge-server/src/http.rs
// Shared HTTP client for all network operations

use std::time::Duration;

/// Default request timeout for generation calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the shared HTTP client with appropriate defaults.
///
/// Created once at startup and handed to the generation client, which
/// lets tests swap in their own.
pub fn create_shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
