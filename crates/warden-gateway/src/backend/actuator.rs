//! In-process actuator backend: health, build info and Prometheus metrics.

use crate::metrics::GatewayMetrics;
use async_trait::async_trait;
use serde_json::json;
use warden_kernel::gateway::{
    Backend, ChainError, FilterResult, GatewayRequest, GatewayResponse, HttpMethod,
};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Serves `/actuator/{health,info,prometheus}` without leaving the process.
///
/// Accepts both the full path and the path with the `/actuator` prefix
/// already stripped by the route.
pub struct ActuatorBackend {
    id: String,
    metrics: Option<GatewayMetrics>,
}

impl ActuatorBackend {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metrics: None,
        }
    }

    /// Builder: expose `metrics` at `/prometheus`.
    pub fn with_metrics(mut self, metrics: GatewayMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn json(&self, status: u16, value: serde_json::Value) -> GatewayResponse {
        GatewayResponse::new(status, self.id.clone())
            .with_header("content-type", "application/json")
            .with_body(value.to_string().into_bytes())
    }
}

#[async_trait]
impl Backend for ActuatorBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn forward(&self, request: GatewayRequest) -> FilterResult {
        if !matches!(request.method, HttpMethod::Get | HttpMethod::Head) {
            return Err(ChainError::MethodNotAllowed(request.method.to_string()));
        }

        let endpoint = request
            .path
            .strip_prefix("/actuator")
            .unwrap_or(&request.path)
            .trim_end_matches('/');

        match endpoint {
            "" => Ok(self.json(
                200,
                json!({
                    "_links": {
                        "health": {"href": "/actuator/health"},
                        "info": {"href": "/actuator/info"},
                        "prometheus": {"href": "/actuator/prometheus"},
                    }
                }),
            )),
            "/health" => Ok(self.json(200, json!({"status": "UP"}))),
            "/info" => Ok(self.json(
                200,
                json!({
                    "app": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            )),
            "/prometheus" => {
                let metrics = self
                    .metrics
                    .as_ref()
                    .ok_or_else(|| ChainError::RouteNotFound(request.path.clone()))?;
                let text = metrics
                    .render()
                    .map_err(|e| ChainError::Internal(e.to_string()))?;
                Ok(GatewayResponse::new(200, self.id.clone())
                    .with_header("content-type", PROMETHEUS_CONTENT_TYPE)
                    .with_body(text.into_bytes()))
            }
            _ => Err(ChainError::RouteNotFound(request.path.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(path: &str) -> GatewayRequest {
        GatewayRequest::new("r1", path, HttpMethod::Get)
    }

    fn body(resp: &GatewayResponse) -> serde_json::Value {
        serde_json::from_slice(&resp.body).unwrap()
    }

    #[tokio::test]
    async fn health_is_up_with_or_without_prefix() {
        let b = ActuatorBackend::new("actuator");
        for path in ["/actuator/health", "/health", "/actuator/health/"] {
            let resp = b.forward(get(path)).await.unwrap();
            assert_eq!(resp.status, 200);
            assert_eq!(body(&resp), json!({"status": "UP"}));
        }
    }

    #[tokio::test]
    async fn info_reports_package() {
        let resp = ActuatorBackend::new("actuator")
            .forward(get("/actuator/info"))
            .await
            .unwrap();
        assert_eq!(body(&resp)["app"]["name"], "warden-gateway");
    }

    #[tokio::test]
    async fn prometheus_requires_metrics() {
        let without = ActuatorBackend::new("actuator");
        assert!(matches!(
            without.forward(get("/actuator/prometheus")).await,
            Err(ChainError::RouteNotFound(_))
        ));

        let with = ActuatorBackend::new("actuator").with_metrics(GatewayMetrics::new().unwrap());
        let resp = with.forward(get("/actuator/prometheus")).await.unwrap();
        assert_eq!(resp.header("content-type"), Some(PROMETHEUS_CONTENT_TYPE));
        assert!(String::from_utf8(resp.body).unwrap().contains("warden_requests_cancelled_total"));
    }

    #[tokio::test]
    async fn writes_and_unknown_endpoints_are_rejected() {
        let b = ActuatorBackend::new("actuator");
        let post = GatewayRequest::new("r1", "/actuator/health", HttpMethod::Post);
        assert!(matches!(b.forward(post).await, Err(ChainError::MethodNotAllowed(_))));
        assert!(matches!(
            b.forward(get("/actuator/env")).await,
            Err(ChainError::RouteNotFound(_))
        ));
    }
}
