//! Gateway error types for `warden-kernel`.
//!
//! Two families live here:
//!
//! - [`GatewayError`] covers failures detected at *startup*, before any
//!   request is served: bad path patterns, duplicate registrations, dangling
//!   backend references and unusable auth configuration.
//! - [`ChainError`] (with its [`AuthError`] subset) covers the per-request
//!   failures that flow through the filter chain and end up rendered by the
//!   error responder.

use thiserror::Error;

/// Startup / configuration error type for the gateway kernel contract.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GatewayError {
    // ── Identity ────────────────────────────────────────────────────────────
    /// The gateway configuration `id` field is empty or whitespace-only.
    #[error("gateway id cannot be empty")]
    EmptyGatewayId,

    // ── Paths ────────────────────────────────────────────────────────────────
    /// A path pattern is syntactically invalid.
    #[error("invalid path pattern '{0}': {1}")]
    InvalidPathPattern(String, String),

    // ── Routes ───────────────────────────────────────────────────────────────
    /// The configuration contains no routes.
    #[error("gateway config must define at least one route")]
    NoRoutes,

    /// A route `id` field is empty or whitespace-only.
    #[error("route id cannot be empty")]
    EmptyRouteId,

    /// A route with this id has already been registered.
    #[error("route '{0}' is already registered")]
    DuplicateRoute(String),

    /// A route references a backend id that is not present in the backend list.
    #[error("route '{0}' references unknown backend '{1}'")]
    UnknownBackend(String, String),

    // ── Backends ─────────────────────────────────────────────────────────────
    /// A backend `id` field is empty or whitespace-only.
    #[error("backend id cannot be empty")]
    EmptyBackendId,

    /// A backend with this id has already been registered.
    #[error("backend '{0}' is already registered")]
    DuplicateBackend(String),

    /// A backend endpoint URI is syntactically invalid.
    #[error("backend '{0}' has an invalid endpoint URI: {1}")]
    InvalidEndpoint(String, String),

    // ── Filters ──────────────────────────────────────────────────────────────
    /// Two filters were registered under the same name.
    #[error("filter '{0}' is registered more than once")]
    DuplicateFilter(String),

    // ── Auth ─────────────────────────────────────────────────────────────────
    /// The authentication configuration cannot be used.
    #[error("invalid authentication config: {0}")]
    InvalidAuthConfig(String),

    // ── Timeouts ─────────────────────────────────────────────────────────────
    /// `request_timeout_ms` is zero, which would reject every request.
    #[error("request timeout must be greater than 0 ms")]
    InvalidTimeout,
}

/// Why a bearer token was not accepted.
///
/// Deliberately coarse: callers learn *that* a token failed and whether it
/// merely expired, never which part of it was wrong.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
pub enum AuthError {
    /// No `Authorization` header, or one without the `Bearer ` scheme.
    #[error("Missing or invalid Authorization header")]
    Missing,
    /// Signature valid but `exp` is in the past.
    #[error("Token has expired")]
    Expired,
    /// Anything else: bad structure, bad signature, missing claims.
    #[error("Invalid token")]
    Invalid,
}

/// A request-time failure produced somewhere inside the filter chain.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChainError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No route matches the request path and method.
    #[error("no route matched '{0}'")]
    RouteNotFound(String),

    /// The inbound method is outside the set the gateway understands.
    #[error("method '{0}' is not supported")]
    MethodNotAllowed(String),

    /// The route targets a backend that is not registered or not accepting
    /// traffic.
    #[error("backend '{0}' is unavailable")]
    BackendUnavailable(String),

    /// The backend could not be reached or returned an unreadable response.
    #[error("backend '{backend_id}' request failed: {message}")]
    BadGateway { backend_id: String, message: String },

    /// The backend did not answer within the route timeout.
    #[error("backend '{0}' timed out")]
    GatewayTimeout(String),

    /// Any other fault. The message is diagnostic only and never rendered.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ChainError {
    /// HTTP status code this error is rendered with.
    pub fn status(&self) -> u16 {
        match self {
            ChainError::Auth(_) => 401,
            ChainError::RouteNotFound(_) => 404,
            ChainError::MethodNotAllowed(_) => 405,
            ChainError::BackendUnavailable(_) => 503,
            ChainError::BadGateway { .. } => 502,
            ChainError::GatewayTimeout(_) => 504,
            ChainError::Internal(_) => 500,
        }
    }

    /// Message that is safe to place in a response body.
    ///
    /// Backend and internal failures expose only a generic phrase; the full
    /// `Display` output is for logs.
    pub fn public_message(&self) -> String {
        match self {
            ChainError::Auth(e) => e.to_string(),
            ChainError::RouteNotFound(_) => "No route found".to_string(),
            ChainError::MethodNotAllowed(m) => format!("Method '{m}' is not supported"),
            ChainError::BackendUnavailable(_) => "Service unavailable".to_string(),
            ChainError::BadGateway { .. } => "Bad gateway".to_string(),
            ChainError::GatewayTimeout(_) => "Gateway timeout".to_string(),
            ChainError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
