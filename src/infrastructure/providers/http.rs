use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Plain client with bounded timeouts. Provider calls are not retried.
pub fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .pool_max_idle_per_host(2)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(5))
        .build()
        .unwrap_or_else(|_| Client::new())
}
