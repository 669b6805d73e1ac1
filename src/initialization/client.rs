//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{ResolverConfig, TCP_CONNECT_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used by every strategy of one resolver.
///
/// Creates a `reqwest::Client` configured with:
/// - Overall per-request timeout from the config
/// - TCP connect timeout (`TCP_CONNECT_TIMEOUT_SECS`)
/// - Default User-Agent from the config (stage headers may override it)
/// - The configured proxy for all schemes, when present
///
/// # Errors
///
/// Returns `InitializationError::InvalidProxyError` if the proxy URL cannot be
/// parsed, or `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &ResolverConfig) -> Result<Arc<reqwest::Client>, InitializationError> {
    let mut builder = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone());

    if let Some(proxy) = config.proxy.as_deref() {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| {
            InitializationError::InvalidProxyError {
                proxy: proxy.to_string(),
                reason: e.to_string(),
            }
        })?;
        builder = builder.proxy(proxy);
    }

    let client = builder.build()?;
    Ok(Arc::new(client))
}
