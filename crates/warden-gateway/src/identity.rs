//! Identity propagation to backends.
//!
//! Backends never see the bearer token's claims directly; they read the
//! authenticated user from three forwarding headers:
//!
//! | Header | Value |
//! |--------|-------|
//! | `X-User-Name` | subject, percent-encoded UTF-8 |
//! | `X-User-Id` | numeric user id, or empty |
//! | `X-User-Role` | role, or empty |

use warden_kernel::gateway::{GatewayContext, Identity};

pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Every header owned by the propagator. Inbound copies are discarded before
/// forwarding.
pub const IDENTITY_HEADERS: [&str; 3] = [USER_NAME_HEADER, USER_ID_HEADER, USER_ROLE_HEADER];

/// Writes identity forwarding headers onto a request context.
pub struct IdentityPropagator;

impl IdentityPropagator {
    /// Record `identity` as outbound headers on `ctx`.
    pub fn attach(identity: &Identity, ctx: &mut GatewayContext) {
        ctx.set_outbound_header(
            USER_NAME_HEADER,
            urlencoding::encode(&identity.subject).into_owned(),
        );
        ctx.set_outbound_header(
            USER_ID_HEADER,
            identity.user_id.map(|id| id.to_string()).unwrap_or_default(),
        );
        ctx.set_outbound_header(USER_ROLE_HEADER, identity.role.clone().unwrap_or_default());
    }

    /// `true` for headers only the propagator may set.
    pub fn is_identity_header(name: &str) -> bool {
        IDENTITY_HEADERS
            .iter()
            .any(|h| h.eq_ignore_ascii_case(name))
    }
}
