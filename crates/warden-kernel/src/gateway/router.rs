//! Gateway router trait and configuration types.
//!
//! The [`GatewayRouter`] trait is the kernel-level abstraction for the route
//! table: it maps an inbound `(path, method)` to the backend that should serve
//! it. Routes are registered at startup and only read afterwards.

use super::error::GatewayError;
use super::path::PathPattern;
use super::types::{HttpMethod, RouteMatch};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Route configuration
// ─────────────────────────────────────────────────────────────────────────────

/// A single routing rule mapping a glob path pattern (+ optional method) to a
/// backend.
///
/// ```text
/// /auth/login          exact path
/// /api/users/**        the subtree below /api/users
/// /api/*/profile       one arbitrary segment
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Unique stable identifier for this route.
    pub id: String,
    /// Glob path pattern. Must begin with `/`.
    pub path_pattern: String,
    /// Accepted HTTP method; `None` accepts all methods.
    #[serde(default)]
    pub method: Option<HttpMethod>,
    /// Id of the backend this route forwards to.
    pub backend_id: String,
    /// Number of leading path segments removed before forwarding.
    #[serde(default)]
    pub strip_prefix: usize,
    /// Extra headers added to the forwarded request.
    #[serde(default)]
    pub request_headers: Vec<(String, String)>,
    /// Per-route request timeout in milliseconds (overrides gateway default).
    /// A value of `0` means "use the gateway default".
    #[serde(default)]
    pub timeout_ms: u64,
    /// Routing priority: higher values are evaluated first when multiple
    /// patterns match the same path.
    #[serde(default)]
    pub priority: i32,
}

impl RouteConfig {
    /// Create a minimal route with just id, path_pattern, and backend_id.
    pub fn new(
        id: impl Into<String>,
        path_pattern: impl Into<String>,
        backend_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            path_pattern: path_pattern.into(),
            method: None,
            backend_id: backend_id.into(),
            strip_prefix: 0,
            request_headers: Vec::new(),
            timeout_ms: 0,
            priority: 0,
        }
    }

    /// Builder: restrict to one HTTP method.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Builder: strip `count` leading segments before forwarding.
    pub fn with_strip_prefix(mut self, count: usize) -> Self {
        self.strip_prefix = count;
        self
    }

    /// Builder: add a header to every forwarded request.
    pub fn with_request_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.push((name.into(), value.into()));
        self
    }

    /// Builder: set a per-route timeout.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Builder: set routing priority (higher = evaluated first).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Parse the route's pattern into a [`PathPattern`].
    pub fn pattern(&self) -> Result<PathPattern, GatewayError> {
        PathPattern::parse(&self.path_pattern, self.method)
    }

    /// Basic sanity checks run during [`GatewayConfig::validate()`].
    ///
    /// [`GatewayConfig::validate()`]: super::validation::GatewayConfig::validate
    pub(crate) fn validate(&self) -> Result<(), GatewayError> {
        if self.id.trim().is_empty() {
            return Err(GatewayError::EmptyRouteId);
        }
        self.pattern().map(|_| ())
    }
}

/// Remove the first `count` non-empty segments from `path`.
///
/// The result always starts with `/`.
pub fn strip_segments(path: &str, count: usize) -> String {
    if count == 0 {
        return path.to_string();
    }
    let rest: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .skip(count)
        .collect();
    format!("/{}", rest.join("/"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Router trait
// ─────────────────────────────────────────────────────────────────────────────

/// Kernel contract for request routing.
///
/// The trait is intentionally synchronous: route lookups are pure string
/// matching with no I/O.
pub trait GatewayRouter: Send + Sync {
    /// Register a new route. Returns [`GatewayError::DuplicateRoute`] if a
    /// route with the same `id` is already registered, or
    /// [`GatewayError::InvalidPathPattern`] if its pattern does not parse.
    fn register(&mut self, route: RouteConfig) -> Result<(), GatewayError>;

    /// Resolve a request `(path, method)` to the best matching route.
    /// Returns `None` when no route matches.
    fn resolve(&self, path: &str, method: HttpMethod) -> Option<RouteMatch>;

    /// Return all registered routes in evaluation order.
    fn routes(&self) -> Vec<&RouteConfig>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_segments_removes_leading_parts() {
        assert_eq!(strip_segments("/api/v1/items/3", 1), "/v1/items/3");
        assert_eq!(strip_segments("/api/v1/items/3", 2), "/items/3");
        assert_eq!(strip_segments("/api", 1), "/");
        assert_eq!(strip_segments("/api", 5), "/");
        assert_eq!(strip_segments("/api/v1", 0), "/api/v1");
    }

    #[test]
    fn route_validation_rejects_bad_pattern() {
        let route = RouteConfig::new("bad", "/a/**/b", "svc");
        assert!(matches!(
            route.validate(),
            Err(GatewayError::InvalidPathPattern(..))
        ));
        assert_eq!(
            RouteConfig::new(" ", "/a", "svc").validate(),
            Err(GatewayError::EmptyRouteId)
        );
    }
}
