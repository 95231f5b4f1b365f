//! Core data types for the gateway kernel contract.
//!
//! These types are shared across all gateway traits
//! ([`GatewayRouter`](super::router::GatewayRouter),
//! [`GatewayFilter`](super::filter::GatewayFilter),
//! [`Backend`](super::backend::Backend))
//! and carry no runtime dependencies beyond `serde` and `std`.

use super::path::normalize_path;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// HTTP primitives
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP method, covering the standard verbs used in REST and proxy scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Case-insensitive parse from a string slice.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    /// Return the standard uppercase string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / Response
// ─────────────────────────────────────────────────────────────────────────────

/// An inbound request flowing through the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    /// Unique identifier for correlating this request across logs.
    pub id: String,
    /// Request path without the query string, e.g. `/api/users/42`.
    pub path: String,
    /// Raw query string (without the leading `?`), if any.
    pub query: Option<String>,
    /// HTTP method.
    pub method: HttpMethod,
    /// HTTP headers (header names are lowercased).
    pub headers: HashMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl GatewayRequest {
    /// Construct a minimal request with the given id, path, and method.
    ///
    /// A `?query` suffix on `path` is split off into [`query`](Self::query),
    /// and dot segments in the remaining path are resolved with
    /// [`normalize_path`].
    pub fn new(id: impl Into<String>, path: impl Into<String>, method: HttpMethod) -> Self {
        let path = path.into();
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (normalize_path(p).into_owned(), Some(q.to_string())),
            None => (normalize_path(&path).into_owned(), None),
        };
        Self {
            id: id.into(),
            path,
            query,
            method,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Builder helper: attach a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into().to_lowercase(), value.into());
        self
    }

    /// Builder helper: set the body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Path plus `?query` when a query string is present.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) if !q.is_empty() => format!("{}?{}", self.path, q),
            _ => self.path.clone(),
        }
    }
}

/// An outbound response produced by a backend (or the error responder) and
/// returned through the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// HTTP status code (100–599).
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
    /// Id of the backend that generated this response; empty for responses
    /// synthesized by the gateway itself.
    pub backend_id: String,
    /// Round-trip latency in milliseconds (gateway → backend → gateway).
    pub latency_ms: u64,
}

impl GatewayResponse {
    /// Construct a minimal response.
    pub fn new(status: u16, backend_id: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
            backend_id: backend_id.into(),
            latency_ms: 0,
        }
    }

    /// Builder helper: attach a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into().to_lowercase(), value.into());
        self
    }

    /// Builder helper: set the body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Route match
// ─────────────────────────────────────────────────────────────────────────────

/// The result of a successful route lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMatch {
    /// Id of the matched route.
    pub route_id: String,
    /// Id of the backend this route targets.
    pub backend_id: String,
    /// Request path after the route's prefix stripping.
    pub stripped_path: String,
    /// Configured timeout for this route in milliseconds (`0` = default).
    pub timeout_ms: u64,
    /// Extra headers the route adds to the forwarded request.
    pub request_headers: Vec<(String, String)>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// The authenticated principal of a single request.
///
/// Produced by the authentication gate from verified token claims, or handed
/// in by an upstream authentication layer. Never outlives its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Display name / token subject. May contain non-ASCII characters.
    pub subject: String,
    /// Numeric user id, when the issuer provides one.
    pub user_id: Option<i64>,
    /// Role name, when the issuer provides one.
    pub role: Option<String>,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            user_id: None,
            role: None,
        }
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request context
// ─────────────────────────────────────────────────────────────────────────────

/// Per-request context that flows through the filter chain.
///
/// The context is moved into each filter together with the continuation, so
/// it is owned by exactly one in-flight request at any time. Filters read
/// decisions made upstream (e.g. the identity set by the auth gate) directly
/// from here; there is no ambient state.
#[derive(Debug, Clone)]
pub struct GatewayContext {
    /// The inbound request.
    pub request: GatewayRequest,
    /// Identity resolved by the auth gate; `None` for anonymous requests.
    pub identity: Option<Identity>,
    /// Headers to attach to the forwarded request (names lowercased).
    pub outbound_headers: HashMap<String, String>,
}

impl GatewayContext {
    /// Create a fresh context from an inbound request.
    pub fn new(request: GatewayRequest) -> Self {
        Self {
            request,
            identity: None,
            outbound_headers: HashMap::new(),
        }
    }

    /// Queue a header for the forwarded request, replacing any previous value.
    pub fn set_outbound_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.outbound_headers
            .insert(name.into().to_lowercase(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_split_from_path() {
        let req = GatewayRequest::new("r1", "/api/users?page=2&size=10", HttpMethod::Get);
        assert_eq!(req.path, "/api/users");
        assert_eq!(req.query.as_deref(), Some("page=2&size=10"));
        assert_eq!(req.path_and_query(), "/api/users?page=2&size=10");
    }

    #[test]
    fn dot_segments_are_resolved_before_the_query() {
        let req = GatewayRequest::new("r1", "/oauth2/%2e%2e/api/users/42?x=../y", HttpMethod::Get);
        assert_eq!(req.path, "/api/users/42");
        assert_eq!(req.query.as_deref(), Some("x=../y"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = GatewayRequest::new("r1", "/", HttpMethod::Get)
            .with_header("Authorization", "Bearer abc");
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
        assert_eq!(req.header("AUTHORIZATION"), Some("Bearer abc"));
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!(HttpMethod::from_str_ci("post"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::from_str_ci("TRACE"), None);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
