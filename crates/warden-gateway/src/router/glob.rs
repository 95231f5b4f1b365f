//! Glob-pattern route table implementing [`GatewayRouter`].
//!
//! Routes are kept sorted by descending priority; routes sharing a priority
//! keep their registration order. Resolution is a linear scan returning the
//! first match, which is fine for the handful of routes a gateway carries
//! and trivially correct to verify.

use warden_kernel::gateway::{
    GatewayConfig, GatewayError, GatewayRouter, HttpMethod, PathPattern, RouteConfig, RouteMatch,
    strip_segments,
};

struct CompiledRoute {
    config: RouteConfig,
    pattern: PathPattern,
}

/// [`GatewayRouter`] backed by pre-parsed [`PathPattern`]s.
#[derive(Default)]
pub struct GlobRouter {
    routes: Vec<CompiledRoute>,
}

impl GlobRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every route of a validated gateway config.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut router = Self::new();
        for route in &config.routes {
            router.register(route.clone())?;
        }
        Ok(router)
    }
}

impl GatewayRouter for GlobRouter {
    fn register(&mut self, route: RouteConfig) -> Result<(), GatewayError> {
        if self.routes.iter().any(|r| r.config.id == route.id) {
            return Err(GatewayError::DuplicateRoute(route.id));
        }
        let pattern = route.pattern()?;
        let pos = self
            .routes
            .partition_point(|r| r.config.priority >= route.priority);
        self.routes.insert(pos, CompiledRoute { config: route, pattern });
        Ok(())
    }

    fn resolve(&self, path: &str, method: HttpMethod) -> Option<RouteMatch> {
        let route = self.routes.iter().find(|r| r.pattern.matches(path, method))?;
        Some(RouteMatch {
            route_id: route.config.id.clone(),
            backend_id: route.config.backend_id.clone(),
            stripped_path: strip_segments(path, route.config.strip_prefix),
            timeout_ms: route.config.timeout_ms,
            request_headers: route.config.request_headers.clone(),
        })
    }

    fn routes(&self) -> Vec<&RouteConfig> {
        self.routes.iter().map(|r| &r.config).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn router(routes: Vec<RouteConfig>) -> GlobRouter {
        let mut router = GlobRouter::new();
        for route in routes {
            router.register(route).unwrap();
        }
        router
    }

    #[test]
    fn exact_path_with_method() {
        let r = router(vec![
            RouteConfig::new("auth-login", "/auth/login", "auth")
                .with_method(HttpMethod::Post)
                .with_request_header("X-Gateway", "true"),
        ]);
        let m = r.resolve("/auth/login", HttpMethod::Post).unwrap();
        assert_eq!(m.route_id, "auth-login");
        assert_eq!(m.stripped_path, "/auth/login");
        assert_eq!(m.request_headers, vec![("X-Gateway".to_string(), "true".to_string())]);
        assert!(r.resolve("/auth/login", HttpMethod::Get).is_none());
    }

    #[test]
    fn subtree_route_with_prefix_strip() {
        let r = router(vec![
            RouteConfig::new("core", "/api/v1/**", "core").with_strip_prefix(2),
        ]);
        let m = r.resolve("/api/v1/orders/7", HttpMethod::Delete).unwrap();
        assert_eq!(m.backend_id, "core");
        assert_eq!(m.stripped_path, "/orders/7");

        let m = r.resolve("/api/v1", HttpMethod::Get).unwrap();
        assert_eq!(m.stripped_path, "/");
    }

    #[test]
    fn higher_priority_wins() {
        let r = router(vec![
            RouteConfig::new("catch-all", "/**", "fallback"),
            RouteConfig::new("users", "/api/users/**", "auth").with_priority(10),
        ]);
        assert_eq!(r.resolve("/api/users/1", HttpMethod::Get).unwrap().route_id, "users");
        assert_eq!(r.resolve("/other", HttpMethod::Get).unwrap().route_id, "catch-all");
        let ids: Vec<_> = r.routes().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["users", "catch-all"]);
    }

    #[test]
    fn equal_priority_keeps_registration_order() {
        let r = router(vec![
            RouteConfig::new("first", "/api/**", "a"),
            RouteConfig::new("second", "/api/**", "b"),
        ]);
        assert_eq!(r.resolve("/api/x", HttpMethod::Get).unwrap().route_id, "first");
    }

    #[test]
    fn duplicate_and_invalid_routes_are_rejected() {
        let mut r = router(vec![RouteConfig::new("a", "/a", "svc")]);
        assert!(matches!(
            r.register(RouteConfig::new("a", "/b", "svc")),
            Err(GatewayError::DuplicateRoute(_))
        ));
        assert!(matches!(
            r.register(RouteConfig::new("bad", "/a/**/b", "svc")),
            Err(GatewayError::InvalidPathPattern(_, _))
        ));
    }

    #[test]
    fn no_match_returns_none() {
        let r = router(vec![RouteConfig::new("a", "/a/*", "svc")]);
        assert!(r.resolve("/a/b/c", HttpMethod::Get).is_none());
        assert!(r.resolve("/nonexistent", HttpMethod::Get).is_none());
    }

    #[test]
    fn from_config_registers_all_routes() {
        let config = GatewayConfig::new("edge")
            .with_route(RouteConfig::new("a", "/a/**", "svc"))
            .with_route(RouteConfig::new("b", "/b/**", "svc"));
        let r = GlobRouter::from_config(&config).unwrap();
        assert_eq!(r.routes().len(), 2);
    }
}
