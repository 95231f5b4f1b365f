//! Global filter chain.
//!
//! Every request runs through the same statically ordered list of filters
//! before reaching the [`Forwarder`]:
//!
//! | Filter | Name | Default order |
//! |--------|------|---------------|
//! | [`ErrorCaptureFilter`] | `error-capture` | -300 |
//! | [`AuthGateFilter`] | `auth-gate` | -200 |
//! | [`IdentityFilter`] | `identity-propagation` | -150 |
//! | [`LoggingFilter`] | `access-log` | -100 |

mod auth;
mod error_capture;
mod identity;
mod logger;

pub use auth::AuthGateFilter;
pub use error_capture::ErrorCaptureFilter;
pub use identity::IdentityFilter;
pub use logger::LoggingFilter;

use crate::response::ErrorResponder;
use std::collections::HashSet;
use std::sync::Arc;
use warden_kernel::gateway::{
    FilterDescriptor, FilterResult, Forwarder, GatewayContext, GatewayError, GatewayResponse,
    Next,
};

/// Ordered list of filters wrapped around a terminal forwarder.
///
/// Descriptors are sorted by ascending priority (lowest value runs first and
/// wraps the most of the chain). The sort is stable, so filters sharing a
/// priority keep their registration order.
pub struct FilterPipeline {
    filters: Vec<FilterDescriptor>,
    terminal: Arc<dyn Forwarder>,
}

impl FilterPipeline {
    /// Build a pipeline from descriptors, sorted by priority.
    ///
    /// Filter names must be unique.
    pub fn new(
        mut filters: Vec<FilterDescriptor>,
        terminal: Arc<dyn Forwarder>,
    ) -> Result<Self, GatewayError> {
        let mut seen = HashSet::new();
        if let Some(dup) = filters.iter().find(|d| !seen.insert(d.name.clone())) {
            return Err(GatewayError::DuplicateFilter(dup.name.clone()));
        }
        filters.sort_by_key(|d| d.priority);
        Ok(Self { filters, terminal })
    }

    /// Descriptors in execution order.
    pub fn descriptors(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    /// Run the chain and return its raw result.
    pub async fn execute(&self, ctx: GatewayContext) -> FilterResult {
        Next::new(&self.filters, self.terminal.as_ref()).run(ctx).await
    }

    /// Run the chain, rendering any residual error as a JSON envelope.
    pub async fn handle(&self, ctx: GatewayContext) -> GatewayResponse {
        match self.execute(ctx).await {
            Ok(resp) => resp,
            Err(err) => ErrorResponder::from_error(&err),
        }
    }
}
