//! Terminal step of the filter chain: route lookup and backend dispatch.

use crate::backend::BackendRegistry;
use crate::identity::IdentityPropagator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use warden_kernel::gateway::{
    ChainError, FilterResult, Forwarder, GatewayConfig, GatewayContext, GatewayRouter,
};

/// Resolves the route, rewrites the request and hands it to the backend.
///
/// The outbound request is the inbound one with:
/// - client-supplied `X-User-*` headers removed,
/// - the route's extra headers and the chain's outbound headers applied,
/// - the path prefix-stripped as the route demands (query kept).
///
/// The backend call is bounded by the route timeout, else the backend
/// timeout, else the gateway default.
pub struct RouteForwarder {
    router: Arc<dyn GatewayRouter>,
    backends: Arc<BackendRegistry>,
    default_timeout: Duration,
    backend_timeouts: HashMap<String, Duration>,
}

impl RouteForwarder {
    pub fn new(
        router: Arc<dyn GatewayRouter>,
        backends: Arc<BackendRegistry>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            router,
            backends,
            default_timeout,
            backend_timeouts: HashMap::new(),
        }
    }

    /// Take the default and per-backend timeouts from `config`.
    pub fn from_config(
        config: &GatewayConfig,
        router: Arc<dyn GatewayRouter>,
        backends: Arc<BackendRegistry>,
    ) -> Self {
        let mut forwarder = Self::new(
            router,
            backends,
            Duration::from_millis(config.request_timeout_ms),
        );
        for backend in config.backends.iter().filter(|b| b.timeout_ms > 0) {
            forwarder = forwarder.with_backend_timeout(&backend.id, backend.timeout_ms);
        }
        forwarder
    }

    /// Builder: override the timeout for one backend.
    pub fn with_backend_timeout(mut self, backend_id: impl Into<String>, ms: u64) -> Self {
        self.backend_timeouts
            .insert(backend_id.into(), Duration::from_millis(ms));
        self
    }

    fn timeout_for(&self, backend_id: &str, route_timeout_ms: u64) -> Duration {
        if route_timeout_ms > 0 {
            return Duration::from_millis(route_timeout_ms);
        }
        self.backend_timeouts
            .get(backend_id)
            .copied()
            .unwrap_or(self.default_timeout)
    }
}

#[async_trait]
impl Forwarder for RouteForwarder {
    async fn forward(&self, ctx: GatewayContext) -> FilterResult {
        let GatewayContext {
            mut request,
            outbound_headers,
            ..
        } = ctx;

        let route = self
            .router
            .resolve(&request.path, request.method)
            .ok_or_else(|| ChainError::RouteNotFound(request.path.clone()))?;
        let backend = self
            .backends
            .lookup(&route.backend_id)
            .ok_or_else(|| ChainError::BackendUnavailable(route.backend_id.clone()))?;

        request
            .headers
            .retain(|name, _| !IdentityPropagator::is_identity_header(name));
        for (name, value) in &route.request_headers {
            request.headers.insert(name.to_ascii_lowercase(), value.clone());
        }
        request.headers.extend(outbound_headers);
        request.path = route.stripped_path;

        let timeout = self.timeout_for(&route.backend_id, route.timeout_ms);
        debug!(
            request_id = %request.id,
            route      = %route.route_id,
            backend    = %route.backend_id,
            path       = %request.path,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "dispatching to backend"
        );

        match tokio::time::timeout(timeout, backend.forward(request)).await {
            Ok(result) => result,
            Err(_) => Err(ChainError::GatewayTimeout(route.backend_id)),
        }
    }
}
