//! Backend descriptors and the forwarding contract.
//!
//! A backend is a logical downstream service identified by a stable id. The
//! route table names backends by id; the runtime binds each id to a concrete
//! [`Backend`] implementation at startup.

use super::error::GatewayError;
use super::filter::FilterResult;
use super::types::GatewayRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What serves a backend id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum BackendKind {
    /// Remote HTTP service reached at `endpoint`.
    #[default]
    Http,
    /// The gateway's own health/info/metrics endpoints, served in-process.
    Actuator,
}

/// Static description of one backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// Unique stable identifier (must not be empty).
    pub id: String,
    #[serde(default)]
    pub kind: BackendKind,
    /// Base URL for forwarding (e.g. `http://auth-back-server:8080`).
    /// Ignored for [`BackendKind::Actuator`].
    #[serde(default)]
    pub endpoint: String,
    /// Default timeout for this backend in milliseconds (`0` = gateway default).
    #[serde(default)]
    pub timeout_ms: u64,
}

impl BackendConfig {
    /// Construct an HTTP backend descriptor.
    pub fn http(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: BackendKind::Http,
            endpoint: endpoint.into(),
            timeout_ms: 0,
        }
    }

    /// Construct the in-process actuator backend descriptor.
    pub fn actuator(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: BackendKind::Actuator,
            endpoint: String::new(),
            timeout_ms: 0,
        }
    }

    /// Builder: set the backend default timeout.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Basic sanity checks run during [`GatewayConfig::validate()`].
    ///
    /// [`GatewayConfig::validate()`]: super::validation::GatewayConfig::validate
    pub(crate) fn validate(&self) -> Result<(), GatewayError> {
        if self.id.trim().is_empty() {
            return Err(GatewayError::EmptyBackendId);
        }
        if self.kind != BackendKind::Http {
            return Ok(());
        }
        if self.endpoint.trim().is_empty() {
            return Err(GatewayError::InvalidEndpoint(
                self.id.clone(),
                "endpoint URI cannot be empty".to_string(),
            ));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(GatewayError::InvalidEndpoint(
                self.id.clone(),
                format!(
                    "endpoint '{}' must start with http:// or https://",
                    self.endpoint
                ),
            ));
        }
        Ok(())
    }
}

/// Kernel contract for something that can answer a forwarded request.
///
/// Implementations receive the request with the route's path rewriting and
/// header injection already applied. Cancellation is by drop: when the
/// client goes away the returned future is dropped mid-flight.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Id this backend is registered under.
    fn id(&self) -> &str;

    /// Send `request` downstream and return its response.
    async fn forward(&self, request: GatewayRequest) -> FilterResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_backend_requires_scheme() {
        let ok = BackendConfig::http("users", "http://localhost:8081");
        assert!(ok.validate().is_ok());

        let bad = BackendConfig::http("users", "lb://auth-back-server");
        assert!(matches!(
            bad.validate(),
            Err(GatewayError::InvalidEndpoint(id, _)) if id == "users"
        ));
    }

    #[test]
    fn actuator_backend_needs_no_endpoint() {
        assert!(BackendConfig::actuator("gateway").validate().is_ok());
        assert_eq!(
            BackendConfig::actuator("").validate(),
            Err(GatewayError::EmptyBackendId)
        );
    }
}
