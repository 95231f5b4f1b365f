//! Startup error types for the gateway runtime.
//!
//! Request-time failures are [`ChainError`](warden_kernel::gateway::ChainError)
//! values rendered by the [`ErrorResponder`](crate::response::ErrorResponder);
//! everything here stops the process before it serves traffic.

use thiserror::Error;
use warden_kernel::config::ConfigError;
use warden_kernel::gateway::GatewayError;

/// Errors raised while assembling the gateway.
#[derive(Debug, Error)]
pub enum GatewayImplError {
    #[error("configuration could not be loaded: {0}")]
    Config(#[from] ConfigError),

    #[error("configuration is invalid: {0}")]
    Gateway(#[from] GatewayError),

    #[error("invalid setting '{key}': {message}")]
    InvalidSetting { key: String, message: String },

    #[error("metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("HTTP client could not be built: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GatewayResult<T> = Result<T, GatewayImplError>;
