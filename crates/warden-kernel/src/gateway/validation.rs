//! Gateway configuration container and startup validation.
//!
//! [`GatewayConfig`] aggregates routes, backends and the public-path list and
//! exposes a single [`validate()`](GatewayConfig::validate) that checks every
//! structural invariant *before* any runtime resources are allocated.

use super::backend::BackendConfig;
use super::error::GatewayError;
use super::path::PathPatternConfig;
use super::router::RouteConfig;
use std::collections::HashSet;

/// Top-level gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Unique identifier for this gateway instance.
    pub id: String,
    /// All route definitions.
    pub routes: Vec<RouteConfig>,
    /// All registered backend descriptors.
    pub backends: Vec<BackendConfig>,
    /// Path/method combinations exempt from authentication.
    pub public_paths: Vec<PathPatternConfig>,
    /// Global default request timeout in milliseconds (must be > 0).
    pub request_timeout_ms: u64,
}

impl GatewayConfig {
    /// Construct a minimal config with only a gateway id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            routes: Vec::new(),
            backends: Vec::new(),
            public_paths: Vec::new(),
            request_timeout_ms: 30_000,
        }
    }

    /// Builder: add a route.
    pub fn with_route(mut self, route: RouteConfig) -> Self {
        self.routes.push(route);
        self
    }

    /// Builder: add a backend.
    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backends.push(backend);
        self
    }

    /// Builder: add a public path.
    pub fn with_public_path(mut self, public: PathPatternConfig) -> Self {
        self.public_paths.push(public);
        self
    }

    /// Builder: set the global request timeout.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = ms;
        self
    }

    /// Validate all structural invariants of this configuration.
    ///
    /// Returns the *first* detected [`GatewayError`]. Checks, in order:
    /// 1. Gateway id is non-empty.
    /// 2. At least one route is defined.
    /// 3. Global `request_timeout_ms` is non-zero.
    /// 4. Each backend is well-formed and ids are unique.
    /// 5. Each route is well-formed, ids are unique, and its backend exists.
    /// 6. Every public path pattern parses.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.id.trim().is_empty() {
            return Err(GatewayError::EmptyGatewayId);
        }

        if self.routes.is_empty() {
            return Err(GatewayError::NoRoutes);
        }

        if self.request_timeout_ms == 0 {
            return Err(GatewayError::InvalidTimeout);
        }

        let mut backend_ids: HashSet<&str> = HashSet::new();
        for backend in &self.backends {
            backend.validate()?;
            if !backend_ids.insert(backend.id.as_str()) {
                return Err(GatewayError::DuplicateBackend(backend.id.clone()));
            }
        }

        let mut route_ids: HashSet<&str> = HashSet::new();
        for route in &self.routes {
            route.validate()?;
            if !route_ids.insert(route.id.as_str()) {
                return Err(GatewayError::DuplicateRoute(route.id.clone()));
            }
            if !backend_ids.contains(route.backend_id.as_str()) {
                return Err(GatewayError::UnknownBackend(
                    route.id.clone(),
                    route.backend_id.clone(),
                ));
            }
        }

        for public in &self.public_paths {
            public.parse()?;
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
