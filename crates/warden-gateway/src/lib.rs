//! `warden-gateway`: request-admission runtime for the Warden API gateway.
//!
//! This crate provides the concrete implementations of the gateway kernel
//! contracts defined in `warden-kernel::gateway`:
//!
//! | Kernel contract | Implementation |
//! |----------------|----------------|
//! | [`GatewayRouter`](gateway::GatewayRouter) | [`router::GlobRouter`] |
//! | [`Backend`](gateway::Backend) | [`backend::HttpBackend`], [`backend::ActuatorBackend`] |
//! | [`Forwarder`](gateway::Forwarder) | [`forward::RouteForwarder`] |
//! | [`GatewayFilter`](gateway::GatewayFilter) | [`filter::ErrorCaptureFilter`], [`filter::AuthGateFilter`], [`filter::IdentityFilter`], [`filter::LoggingFilter`] |
//!
//! The [`server::GatewayServer`] wires everything together into an axum HTTP
//! service.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use warden_gateway::config::GatewaySettings;
//! use warden_gateway::server::GatewayServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = GatewaySettings::load()?;
//!     GatewayServer::new(settings).start().await?;
//!     Ok(())
//! }
//! ```

pub mod access_log;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod filter;
pub mod forward;
pub mod identity;
pub mod metrics;
pub mod response;
pub mod router;
pub mod server;

// Re-export the kernel gateway types for convenience.
pub use warden_kernel::gateway;
