//! Bearer-token authentication gate.
//!
//! Public paths pass straight through. Everything else must carry
//! `Authorization: Bearer <token>` with a valid HS512 token; otherwise the
//! chain is short-circuited with a 401 envelope and nothing downstream runs.

use crate::auth::{PublicPathClassifier, TokenVerifier};
use crate::response::ErrorResponder;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use warden_kernel::gateway::{
    ChainError, FilterOrder, FilterResult, GatewayContext, GatewayFilter, Next,
};

pub struct AuthGateFilter {
    verifier: Arc<TokenVerifier>,
    public_paths: Arc<PublicPathClassifier>,
    identify_public: bool,
}

impl AuthGateFilter {
    pub fn new(verifier: Arc<TokenVerifier>, public_paths: Arc<PublicPathClassifier>) -> Self {
        Self {
            verifier,
            public_paths,
            identify_public: false,
        }
    }

    /// Builder: on public paths, still attach the identity of a valid token.
    ///
    /// A missing or bad token on a public path is ignored either way.
    pub fn with_public_identity(mut self, enabled: bool) -> Self {
        self.identify_public = enabled;
        self
    }
}

#[async_trait]
impl GatewayFilter for AuthGateFilter {
    fn name(&self) -> &str {
        "auth-gate"
    }

    fn order(&self) -> FilterOrder {
        FilterOrder::AUTH
    }

    async fn filter(&self, mut ctx: GatewayContext, next: Next<'_>) -> FilterResult {
        let authorization = ctx.request.header("authorization");

        if self.public_paths.is_public(&ctx.request.path, ctx.request.method) {
            if self.identify_public {
                if let Ok(claims) = self.verifier.authenticate(authorization) {
                    ctx.identity = Some(claims.into_identity());
                }
            }
            debug!(
                request_id = %ctx.request.id,
                path       = %ctx.request.path,
                identified = ctx.identity.is_some(),
                "public path, authentication skipped"
            );
            return next.run(ctx).await;
        }

        match self.verifier.authenticate(authorization) {
            Ok(claims) => {
                debug!(
                    request_id = %ctx.request.id,
                    subject    = claims.subject(),
                    "request authenticated"
                );
                ctx.identity = Some(claims.into_identity());
                next.run(ctx).await
            }
            Err(err) => {
                warn!(
                    request_id = %ctx.request.id,
                    method     = ctx.request.method.as_str(),
                    path       = %ctx.request.path,
                    reason     = %err,
                    "rejected request"
                );
                Ok(ErrorResponder::from_error(&ChainError::Auth(err)))
            }
        }
    }
}
