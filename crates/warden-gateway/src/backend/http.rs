//! Remote HTTP backend.
//!
//! [`HttpBackend`] relays a request to `{base_url}{path}?{query}` and returns
//! the upstream response verbatim, including 4xx and 5xx statuses. Only
//! transport failures become [`ChainError`]s.

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, instrument};
use warden_kernel::gateway::{
    Backend, BackendConfig, ChainError, FilterResult, GatewayRequest, GatewayResponse,
};

/// Connection-scoped headers that must not be relayed in either direction.
const HOP_BY_HOP: &[&str] = &[
    "host",
    "content-length",
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "te",
    "trailer",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Proxies requests to one downstream HTTP service.
pub struct HttpBackend {
    id: String,
    base_url: String,
    client: Client,
}

impl HttpBackend {
    /// Create a backend sharing `client`'s connection pool.
    pub fn new(id: impl Into<String>, base_url: impl Into<String>, client: Client) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn from_config(config: &BackendConfig, client: Client) -> Self {
        Self::new(&config.id, &config.endpoint, client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, err: reqwest::Error) -> ChainError {
        if err.is_timeout() {
            ChainError::GatewayTimeout(self.id.clone())
        } else {
            ChainError::BadGateway {
                backend_id: self.id.clone(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn id(&self) -> &str {
        &self.id
    }

    #[instrument(skip(self, request), fields(backend = %self.id, path = %request.path))]
    async fn forward(&self, request: GatewayRequest) -> FilterResult {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        debug!(url = %url, method = request.method.as_str(), "forwarding to backend");

        let method = Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| ChainError::Internal(e.to_string()))?;
        let mut builder = self.client.request(method, &url);
        for (name, value) in &request.headers {
            if is_hop_by_hop(name) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let start = Instant::now();
        let upstream = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = upstream.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in upstream.headers() {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string(), v.to_string());
            }
        }

        let body = upstream
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(status, latency_ms, "backend responded");

        Ok(GatewayResponse {
            status,
            headers,
            body: body.to_vec(),
            backend_id: self.id.clone(),
            latency_ms,
        })
    }
}
