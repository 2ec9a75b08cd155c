//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::CT_REQUEST_TIMEOUT_SECS;

/// Initializes the shared HTTP client for CT aggregator and registry
/// queries.
///
/// Configured with the service User-Agent and the CT request timeout; the
/// same client serves both concerns since their latency profiles match.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(user_agent: &str) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(CT_REQUEST_TIMEOUT_SECS))
        .user_agent(user_agent.to_string())
        .build()?;
    Ok(Arc::new(client))
}
