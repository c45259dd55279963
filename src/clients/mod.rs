//! HTTP clients for the services the marketplace delegates to.

pub mod chain;
pub mod ip_registry;
pub mod pinning;

pub use chain::{ChainClient, TransactionReceipt};
pub use ip_registry::{IpRegistration, IpRegistrationRequest, IpRegistryClient, LicenseTerms};
pub use pinning::PinningClient;

use std::time::Duration;

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}

/// Turn a non-2xx response into an upstream error carrying the body.
pub(crate) async fn ensure_success(
    service: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, crate::error::AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    tracing::error!("{} returned status {}: {}", service, status, body);
    Err(crate::error::AppError::UpstreamError(format!(
        "{} request failed with status: {}",
        service, status
    )))
}
