use reqwest::Client;
use std::time::Duration;

/// Shared HTTP client for identification requests. Only the request timeout
/// varies; there is no retry layer.
pub fn build_identify_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}
