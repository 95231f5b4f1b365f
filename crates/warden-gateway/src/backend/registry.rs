//! Backend id → implementation lookup.

use super::{ActuatorBackend, HttpBackend};
use crate::metrics::GatewayMetrics;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use warden_kernel::gateway::{Backend, BackendConfig, BackendKind, GatewayError};

/// Registered backends, keyed by id. Built at startup and read-only after.
#[derive(Default)]
pub struct BackendRegistry {
    store: HashMap<String, Arc<dyn Backend>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate every configured backend.
    ///
    /// HTTP backends share `client`; actuator backends export `metrics`.
    pub fn from_configs(
        configs: &[BackendConfig],
        client: &Client,
        metrics: Option<&GatewayMetrics>,
    ) -> Result<Self, GatewayError> {
        let mut registry = Self::new();
        for config in configs {
            let backend: Arc<dyn Backend> = match config.kind {
                BackendKind::Http => Arc::new(HttpBackend::from_config(config, client.clone())),
                BackendKind::Actuator => {
                    let actuator = ActuatorBackend::new(&config.id);
                    Arc::new(match metrics {
                        Some(m) => actuator.with_metrics(m.clone()),
                        None => actuator,
                    })
                }
                _ => {
                    return Err(GatewayError::InvalidEndpoint(
                        config.id.clone(),
                        "unsupported backend kind".to_string(),
                    ));
                }
            };
            registry.register(backend)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, backend: Arc<dyn Backend>) -> Result<(), GatewayError> {
        let id = backend.id().to_string();
        if self.store.contains_key(&id) {
            return Err(GatewayError::DuplicateBackend(id));
        }
        self.store.insert(id, backend);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<Arc<dyn Backend>> {
        self.store.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
