//! HS512 bearer-token verification.
//!
//! The decoding key is derived once from the configured secret and shared
//! read-only by every request. Failures collapse into three [`AuthError`]
//! categories so that callers cannot probe which check rejected a token.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use std::fmt;
use warden_kernel::gateway::{AuthError, GatewayError, Identity};

/// HS512 needs a key at least as long as its 512-bit digest.
pub const MIN_SECRET_BYTES: usize = 64;

const BEARER_PREFIX: &str = "Bearer ";

/// Verified token payload.
///
/// Only [`TokenVerifier`] can produce one; there is no public constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    subject: String,
    user_id: Option<i64>,
    role: Option<String>,
    expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Convert into the request identity carried on the context.
    pub fn into_identity(self) -> Identity {
        Identity {
            subject: self.subject,
            user_id: self.user_id,
            role: self.role,
        }
    }
}

/// Wire shape of the token payload.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default, rename = "userId")]
    user_id: Option<i64>,
    #[serde(default)]
    role: Option<String>,
    exp: i64,
}

/// Stateless verifier for HS512-signed bearer tokens.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Derive the verification key from `secret`.
    ///
    /// `leeway_secs` is the tolerated clock skew when checking `exp`.
    pub fn new(secret: &str, leeway_secs: u64) -> Result<Self, GatewayError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(GatewayError::InvalidAuthConfig(format!(
                "signing secret must be at least {MIN_SECRET_BYTES} bytes for HS512, got {}",
                secret.len()
            )));
        }

        let mut validation = Validation::new(Algorithm::HS512);
        validation.algorithms = vec![Algorithm::HS512];
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Verify a raw token (without the `Bearer ` prefix).
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::Invalid);
        }

        let data = decode::<RawClaims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid,
            }
        })?;
        let raw = data.claims;

        let subject = raw
            .sub
            .filter(|s| !s.trim().is_empty())
            .ok_or(AuthError::Invalid)?;
        let expires_at = DateTime::from_timestamp(raw.exp, 0).ok_or(AuthError::Invalid)?;

        Ok(Claims {
            subject,
            user_id: raw.user_id,
            role: raw.role,
            expires_at,
        })
    }

    /// Verify the value of an `Authorization` header.
    ///
    /// A missing header or one without the `Bearer ` scheme fails with
    /// [`AuthError::Missing`] before any cryptographic work.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        let token = authorization
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(AuthError::Missing)?;
        self.verify(token)
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &"HS512")
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}
