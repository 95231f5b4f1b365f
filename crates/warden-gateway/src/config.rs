//! Runtime settings for the gateway binary.
//!
//! Settings come from an optional file named by `WARDEN_CONFIG` (TOML, YAML
//! or JSON, `${VAR}` placeholders expanded) layered under `WARDEN_*`
//! environment variables, with `__` separating nested keys:
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `WARDEN_PORT` | `port` |
//! | `WARDEN_AUTH__SECRET` | `auth.secret` |
//! | `WARDEN_AUTH__LEEWAY_SECS` | `auth.leeway_secs` |
//! | `WARDEN_AUTH__PROPAGATE_IDENTITY_ON_PUBLIC_PATHS` | `auth.propagate_identity_on_public_paths` |
//! | `WARDEN_FILTERS__ACCESS_LOG` | `filters.access_log` |
//!
//! Every field has a default, so an empty environment yields the stock route
//! table and public-path list. The signing secret has no usable default and
//! must be supplied.

use crate::auth::PublicPathClassifier;
use crate::error::{GatewayImplError, GatewayResult};
use serde::{Deserialize, Serialize};
use warden_kernel::config::load_with_env;
use warden_kernel::gateway::{
    BackendConfig, FilterOrder, GatewayConfig, HttpMethod, PathPatternConfig, RouteConfig,
};

/// Environment variable naming the settings file.
pub const CONFIG_PATH_VAR: &str = "WARDEN_CONFIG";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "WARDEN";

pub const AUTH_BACKEND: &str = "auth-back-server";
pub const CORE_BACKEND: &str = "zeroq-back-service";
pub const ACTUATOR_BACKEND: &str = "actuator";

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS512 signing secret, at least 64 bytes.
    pub secret: String,
    /// Tolerated clock skew for `exp`, in seconds.
    pub leeway_secs: u64,
    /// Attach the identity of a valid token on public paths too.
    pub propagate_identity_on_public_paths: bool,
}

/// Priority of each built-in filter; lower runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub error_capture: i32,
    pub auth_gate: i32,
    pub identity_propagation: i32,
    pub access_log: i32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            error_capture: FilterOrder::ERROR_CAPTURE.0,
            auth_gate: FilterOrder::AUTH.0,
            identity_propagation: FilterOrder::IDENTITY.0,
            access_log: FilterOrder::LOGGING.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GatewaySettings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub gateway_id: String,
    pub port: u16,
    /// Default backend timeout in milliseconds.
    pub request_timeout_ms: u64,
    pub auth: AuthSettings,
    pub filters: FilterSettings,
    pub public_paths: Vec<PathPatternConfig>,
    pub backends: Vec<BackendConfig>,
    pub routes: Vec<RouteConfig>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            gateway_id: "warden".to_string(),
            port: 8000,
            request_timeout_ms: 30_000,
            auth: AuthSettings::default(),
            filters: FilterSettings::default(),
            public_paths: PublicPathClassifier::default_patterns(),
            backends: default_backends(),
            routes: default_routes(),
        }
    }
}

fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::http(AUTH_BACKEND, "http://localhost:8081"),
        BackendConfig::http(CORE_BACKEND, "http://localhost:8082"),
        BackendConfig::actuator(ACTUATOR_BACKEND),
    ]
}

fn default_routes() -> Vec<RouteConfig> {
    let auth_post = |id: &str, path: &str| {
        RouteConfig::new(id, path, AUTH_BACKEND).with_method(HttpMethod::Post)
    };
    vec![
        auth_post("auth-login", "/auth/login").with_request_header("X-Gateway", "true"),
        auth_post("auth-refresh", "/auth/refresh"),
        auth_post("auth-logout", "/auth/logout"),
        auth_post("auth-validate", "/auth/validate"),
        RouteConfig::new("auth-oauth2", "/oauth2/**", AUTH_BACKEND),
        RouteConfig::new("user-api-all", "/api/users/**", AUTH_BACKEND),
        RouteConfig::new("zeroq-back-service-api", "/api/v1/**", CORE_BACKEND),
        RouteConfig::new("actuator", "/actuator/**", ACTUATOR_BACKEND),
    ]
}

impl GatewaySettings {
    /// Load from `$WARDEN_CONFIG` (if set) and the environment.
    pub fn load() -> GatewayResult<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).ok();
        Self::load_from(path.as_deref())
    }

    /// Load from an explicit file (if any) and the environment.
    pub fn load_from(path: Option<&str>) -> GatewayResult<Self> {
        let settings: Self = load_with_env(path, ENV_PREFIX)?;
        settings.check()?;
        Ok(settings)
    }

    /// Checks not covered by [`GatewayConfig::validate`].
    pub fn check(&self) -> GatewayResult<()> {
        if self.port == 0 {
            return Err(GatewayImplError::InvalidSetting {
                key: "port".to_string(),
                message: "must be between 1 and 65535".to_string(),
            });
        }
        Ok(())
    }

    /// Build and validate the kernel gateway config.
    pub fn gateway_config(&self) -> GatewayResult<GatewayConfig> {
        let config = GatewayConfig {
            id: self.gateway_id.clone(),
            routes: self.routes.clone(),
            backends: self.backends.clone(),
            public_paths: self.public_paths.clone(),
            request_timeout_ms: self.request_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use warden_kernel::gateway::{BackendKind, GatewayError};

    #[test]
    fn defaults_reproduce_stock_gateway() {
        let s = GatewaySettings::default();
        assert_eq!(s.port, 8000);
        assert_eq!(s.filters.auth_gate, -200);
        assert!(!s.auth.propagate_identity_on_public_paths);

        let cfg = s.gateway_config().unwrap();
        let login = cfg.routes.iter().find(|r| r.id == "auth-login").unwrap();
        assert_eq!(login.method, Some(HttpMethod::Post));
        assert_eq!(
            login.request_headers,
            vec![("X-Gateway".to_string(), "true".to_string())]
        );
        assert!(cfg.backends.iter().any(|b| b.kind == BackendKind::Actuator));
        assert_eq!(cfg.public_paths.len(), 6);
    }

    #[test]
    fn file_overrides_selected_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("warden.toml");
        fs::write(
            &path,
            r#"
port = 9100
request_timeout_ms = 5000

[auth]
secret = "file-secret"
leeway_secs = 30

[filters]
access_log = -250

[[public_paths]]
pattern = "/status"
method = "GET"
"#,
        )
        .unwrap();

        let s = GatewaySettings::load_from(path.to_str()).unwrap();
        assert_eq!(s.port, 9100);
        assert_eq!(s.request_timeout_ms, 5000);
        assert_eq!(s.auth.secret, "file-secret");
        assert_eq!(s.auth.leeway_secs, 30);
        assert_eq!(s.filters.access_log, -250);
        assert_eq!(s.filters.auth_gate, -200);
        assert_eq!(
            s.public_paths,
            vec![PathPatternConfig::new("/status", Some(HttpMethod::Get))]
        );
        assert_eq!(s.routes.len(), default_routes().len());
    }

    #[test]
    fn zero_port_is_rejected() {
        let s = GatewaySettings {
            port: 0,
            ..GatewaySettings::default()
        };
        assert!(matches!(
            s.check(),
            Err(GatewayImplError::InvalidSetting { ref key, .. }) if key == "port"
        ));
    }

    #[test]
    fn broken_route_table_fails_validation() {
        let s = GatewaySettings {
            routes: vec![RouteConfig::new("r", "/x/**", "nowhere")],
            ..GatewaySettings::default()
        };
        assert!(matches!(
            s.gateway_config(),
            Err(GatewayImplError::Gateway(GatewayError::UnknownBackend(_, _)))
        ));
    }
}
