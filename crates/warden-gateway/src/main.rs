//! Warden gateway entry point.
//!
//! Loads [`GatewaySettings`] from `$WARDEN_CONFIG` and `WARDEN_*` environment
//! variables (see [`warden_gateway::config`]) and serves the filter chain.
//! Log verbosity follows `RUST_LOG`, defaulting to `warden_gateway=info`.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use warden_gateway::config::GatewaySettings;
use warden_gateway::server::GatewayServer;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warden_gateway=info,warden_kernel=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = match GatewaySettings::load() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to load settings");
            std::process::exit(1);
        }
    };

    info!(
        gateway = %settings.gateway_id,
        port = settings.port,
        routes = settings.routes.len(),
        public_paths = settings.public_paths.len(),
        propagate_identity_on_public_paths = settings.auth.propagate_identity_on_public_paths,
        "Warden gateway configuration loaded"
    );

    if let Err(e) = GatewayServer::new(settings).start().await {
        error!(error = %e, "gateway stopped");
        std::process::exit(1);
    }
}
