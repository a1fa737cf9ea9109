//! Gateway provider factory.
//!
//! Resolves a provider name from configuration to a concrete gateway
//! implementation behind the `Gateway` trait.

use std::sync::Arc;
use std::time::Duration;

use crate::client::Gateway;
use crate::providers::{HttpGateway, MockGateway};
use vectordeck_core::{AppError, AppResult};

/// Create a gateway based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("http", "mock")
/// * `base_url` - Backend base URL (ignored by the mock provider)
/// * `timeout` - Optional request timeout for HTTP calls
///
/// # Errors
/// Returns an error if the provider is unknown or the HTTP client cannot
/// be built.
pub fn create_gateway(
    provider: &str,
    base_url: &str,
    timeout: Option<Duration>,
) -> AppResult<Arc<dyn Gateway>> {
    match provider.to_lowercase().as_str() {
        "http" => {
            let gateway = match timeout {
                Some(timeout) => HttpGateway::with_timeout(base_url, timeout)?,
                None => HttpGateway::with_base_url(base_url),
            };
            Ok(Arc::new(gateway))
        }
        "mock" => Ok(Arc::new(MockGateway::new())),
        other => Err(AppError::Config(format!("Unknown provider: {}", other))),
    }
}
