//! Forwards the authenticated identity as `X-User-*` headers.

use crate::identity::IdentityPropagator;
use async_trait::async_trait;
use warden_kernel::gateway::{FilterOrder, FilterResult, GatewayContext, GatewayFilter, Next};

/// Runs after the auth gate; a no-op for anonymous requests.
#[derive(Debug, Default)]
pub struct IdentityFilter;

impl IdentityFilter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GatewayFilter for IdentityFilter {
    fn name(&self) -> &str {
        "identity-propagation"
    }

    fn order(&self) -> FilterOrder {
        FilterOrder::IDENTITY
    }

    async fn filter(&self, mut ctx: GatewayContext, next: Next<'_>) -> FilterResult {
        if let Some(identity) = ctx.identity.clone() {
            IdentityPropagator::attach(&identity, &mut ctx);
        }
        next.run(ctx).await
    }
}
