//! Request-admission gateway kernel contract.
//!
//! This module defines the *trait interfaces and configuration types* for the
//! Warden gateway. Concrete implementations live in
//! `warden-gateway`.
//!
//! # Architecture mapping
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              warden-kernel  (this module)                   │
//! │  PathPattern            GatewayFilter / Next / Forwarder    │
//! │  GatewayRouter trait    Backend trait                       │
//! │  GatewayContext         GatewayConfig + validate()          │
//! │  GatewayError / ChainError / AuthError                      │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │  depends on
//! ┌──────────────────────────▼──────────────────────────────────┐
//! │              warden-gateway  (runtime crate)                │
//! │  TokenVerifier  PublicPathClassifier  IdentityPropagator    │
//! │  AccessLogRecorder  ErrorResponder  FilterPipeline          │
//! │  GlobRouter  HttpBackend  ActuatorBackend  GatewayServer    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use warden_kernel::gateway::{
//!     BackendConfig, GatewayConfig, HttpMethod, PathPatternConfig, RouteConfig,
//! };
//!
//! let config = GatewayConfig::new("edge")
//!     .with_backend(BackendConfig::http("auth-back-server", "http://localhost:8081"))
//!     .with_route(
//!         RouteConfig::new("auth-login", "/auth/login", "auth-back-server")
//!             .with_method(HttpMethod::Post),
//!     )
//!     .with_public_path(PathPatternConfig::new("/auth/**", None));
//!
//! config.validate().expect("gateway config is valid");
//! ```

pub mod backend;
pub mod error;
pub mod filter;
pub mod path;
pub mod router;
pub mod validation;

// ── Flat re-exports ────────────────────────────────────────────────────────

pub use backend::{Backend, BackendConfig, BackendKind};
pub use error::{AuthError, ChainError, GatewayError};
pub use filter::{FilterDescriptor, FilterOrder, FilterResult, Forwarder, GatewayFilter, Next};
pub use path::{PathPattern, PathPatternConfig, normalize_path};
pub use router::{GatewayRouter, RouteConfig, strip_segments};
pub use validation::GatewayConfig;

// types module is pub so implementors in warden-gateway can use the structs
pub mod types;
pub use types::{GatewayContext, GatewayRequest, GatewayResponse, HttpMethod, Identity, RouteMatch};
