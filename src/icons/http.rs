use std::time::Duration;

use crate::config::FETCH_TIMEOUT_MS;

/// Creates the HTTP client shared by the registry and the tarball fetcher
pub fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("mdi-lsp/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
        .build()
        .expect("Failed to create HTTP client")
}
