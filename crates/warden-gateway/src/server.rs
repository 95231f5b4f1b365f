//! Axum-based HTTP front end.
//!
//! [`GatewayServer`] assembles the filter chain from [`GatewaySettings`] and
//! mounts it as the fallback handler, so every method and path enters the
//! same pipeline:
//!
//! ```text
//! error-capture → auth-gate → identity-propagation → access-log → RouteForwarder → Backend
//! ```

use crate::access_log::{AccessLogRecorder, TracingSink};
use crate::auth::{PublicPathClassifier, TokenVerifier};
use crate::backend::BackendRegistry;
use crate::config::GatewaySettings;
use crate::error::GatewayResult;
use crate::filter::{
    AuthGateFilter, ErrorCaptureFilter, FilterPipeline, IdentityFilter, LoggingFilter,
};
use crate::forward::RouteForwarder;
use crate::metrics::GatewayMetrics;
use crate::response::ErrorResponder;
use crate::router::GlobRouter;
use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use warden_kernel::gateway::{
    ChainError, FilterDescriptor, FilterOrder, GatewayContext, GatewayRequest, GatewayResponse,
    HttpMethod,
};

/// Shared state injected into the handler via the [`State`] extractor.
#[derive(Clone)]
struct AppState {
    pipeline: Arc<FilterPipeline>,
}

/// Gateway server built from [`GatewaySettings`].
pub struct GatewayServer {
    settings: GatewaySettings,
}

impl GatewayServer {
    pub fn new(settings: GatewaySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Assemble the filter chain and its terminal forwarder.
    ///
    /// Fails on an unusable secret, an invalid route table or a backend that
    /// cannot be instantiated.
    pub fn build_pipeline(&self) -> GatewayResult<FilterPipeline> {
        let settings = &self.settings;
        let gateway_cfg = settings.gateway_config()?;

        let verifier = Arc::new(TokenVerifier::new(
            &settings.auth.secret,
            settings.auth.leeway_secs,
        )?);
        let public_paths = Arc::new(PublicPathClassifier::new(&gateway_cfg.public_paths)?);

        let metrics = GatewayMetrics::new()?;
        let recorder = AccessLogRecorder::new()
            .with_sink(Arc::new(TracingSink))
            .with_sink(Arc::new(metrics.clone()));

        let client = reqwest::Client::builder().build()?;
        let backends = BackendRegistry::from_configs(&gateway_cfg.backends, &client, Some(&metrics))?;
        let router = GlobRouter::from_config(&gateway_cfg)?;
        let forwarder =
            RouteForwarder::from_config(&gateway_cfg, Arc::new(router), Arc::new(backends));

        let order = &settings.filters;
        let filters = vec![
            FilterDescriptor::new(Arc::new(ErrorCaptureFilter::new()))
                .with_priority(FilterOrder(order.error_capture)),
            FilterDescriptor::new(Arc::new(
                AuthGateFilter::new(verifier, public_paths)
                    .with_public_identity(settings.auth.propagate_identity_on_public_paths),
            ))
            .with_priority(FilterOrder(order.auth_gate)),
            FilterDescriptor::new(Arc::new(IdentityFilter::new()))
                .with_priority(FilterOrder(order.identity_propagation)),
            FilterDescriptor::new(Arc::new(LoggingFilter::new(Arc::new(recorder))))
                .with_priority(FilterOrder(order.access_log)),
        ];

        let pipeline = FilterPipeline::new(filters, Arc::new(forwarder))?;
        info!(
            gateway = %gateway_cfg.id,
            routes = gateway_cfg.routes.len(),
            backends = gateway_cfg.backends.len(),
            chain = ?pipeline.descriptors().iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            "filter chain assembled"
        );
        Ok(pipeline)
    }

    /// Build the axum [`Router`]. Call [`start()`](Self::start) to bind and serve.
    pub fn build_app(&self) -> GatewayResult<Router> {
        let state = AppState {
            pipeline: Arc::new(self.build_pipeline()?),
        };
        Ok(Router::new().fallback(gateway_handler).with_state(state))
    }

    /// Bind to `0.0.0.0:{port}` and serve until the process exits.
    pub async fn start(self) -> GatewayResult<()> {
        let app = self.build_app()?;
        let addr = format!("0.0.0.0:{}", self.settings.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(addr = %addr, "Warden gateway listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Convert the inbound request, run the chain and convert the result back.
async fn gateway_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(http_method) = HttpMethod::from_str_ci(method.as_str()) else {
        return build_axum_response(ErrorResponder::from_error(&ChainError::MethodNotAllowed(
            method.to_string(),
        )));
    };

    // Keep the query string so it reaches the backend unchanged.
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let mut req = GatewayRequest::new(Uuid::new_v4().to_string(), path, http_method);
    for (name, value) in &headers {
        match value.to_str() {
            Ok(v) => req = req.with_header(name.as_str(), v),
            Err(_) => warn!(request_id = %req.id, header = %name, "dropping non-ASCII header value"),
        }
    }
    req = req.with_body(body.to_vec());

    build_axum_response(state.pipeline.handle(GatewayContext::new(req)).await)
}

fn build_axum_response(resp: GatewayResponse) -> Response {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    for (k, v) in &resp.headers {
        if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(k.as_bytes()), HeaderValue::from_str(v)) {
            builder = builder.header(name, value);
        }
    }
    builder
        .body(Body::from(resp.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
