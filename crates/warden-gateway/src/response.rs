//! Uniform JSON error responses.
//!
//! Every failure path in the gateway ends here, so clients always see the
//! same envelope:
//!
//! ```json
//! {"error": "Token has expired", "status": 401}
//! ```

use serde::Serialize;
use warden_kernel::gateway::{ChainError, GatewayResponse};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "error")]
    pub message: String,
    pub status: u16,
}

/// Renders [`ErrorEnvelope`]s as complete gateway responses.
pub struct ErrorResponder;

impl ErrorResponder {
    /// Build a JSON error response with the given message and status.
    pub fn respond(message: impl Into<String>, status: u16) -> GatewayResponse {
        let envelope = ErrorEnvelope {
            message: message.into(),
            status,
        };
        let body = serde_json::to_vec(&envelope).unwrap_or_else(|_| b"{}".to_vec());
        GatewayResponse::new(status, "")
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    /// Render a chain error with its status and public message.
    pub fn from_error(err: &ChainError) -> GatewayResponse {
        Self::respond(err.public_message(), err.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_kernel::gateway::AuthError;

    #[test]
    fn envelope_shape() {
        let resp = ErrorResponder::respond("Invalid token", 401);
        assert_eq!(resp.status, 401);
        assert_eq!(resp.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Invalid token", "status": 401}));
    }

    #[test]
    fn messages_are_json_escaped() {
        let resp = ErrorResponder::respond("quote \" and \\ backslash", 400);
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body["error"], "quote \" and \\ backslash");
    }

    #[test]
    fn chain_errors_use_public_message() {
        let resp = ErrorResponder::from_error(&ChainError::Internal("stack trace here".into()));
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body["status"], 500);
        assert_eq!(body["error"], "Internal server error");

        let resp = ErrorResponder::from_error(&AuthError::Expired.into());
        assert_eq!(resp.status, 401);
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body["error"], "Token has expired");
    }
}
