//! Glob-style path patterns.
//!
//! Patterns are `/`-delimited. Each segment is one of:
//!
//! ```text
//! users   literal, must equal the path segment exactly
//! *       exactly one arbitrary segment
//! **      zero or more remaining segments; only allowed as the last segment
//! ```
//!
//! Matching is a single left-to-right walk over the path with no
//! backtracking, so its cost is bounded by the pattern length regardless of
//! the input. Empty segments (leading, trailing or doubled slashes) are
//! ignored on both sides.
//!
//! Request paths are run through [`normalize_path`] before they are matched
//! or forwarded, so `.` and `..` segments (raw or percent-encoded) are
//! resolved once and every later stage sees the same path. A dot segment
//! that still reaches the matcher never matches.

use super::error::GatewayError;
use super::types::HttpMethod;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DotSegment {
    Current,
    Parent,
}

/// Classify `.`, `..` and their `%2e` spellings, as URL parsers do.
fn dot_segment(segment: &str) -> Option<DotSegment> {
    if segment.is_empty() || segment.len() > 6 {
        return None;
    }
    match segment.to_ascii_lowercase().replace("%2e", ".").as_str() {
        "." => Some(DotSegment::Current),
        ".." => Some(DotSegment::Parent),
        _ => None,
    }
}

/// Resolve dot segments in a request path.
///
/// `\` is treated as `/`, matching how backends' URL parsers read it.
/// `..` never climbs above the root. A trailing dot segment leaves a
/// trailing slash. Paths without dot segments are returned unchanged.
///
/// ```
/// use warden_kernel::gateway::normalize_path;
///
/// assert_eq!(normalize_path("/oauth2/../api/users/42"), "/api/users/42");
/// assert_eq!(normalize_path("/oauth2/%2E%2e/api"), "/api");
/// assert_eq!(normalize_path("/api/users/"), "/api/users/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let has_dots = path
        .split(['/', '\\'])
        .any(|segment| dot_segment(segment).is_some());
    if !has_dots && !path.contains('\\') {
        return Cow::Borrowed(path);
    }

    let unified = path.replace('\\', "/");
    let segments: Vec<&str> = unified
        .strip_prefix('/')
        .unwrap_or(&unified)
        .split('/')
        .collect();

    let mut resolved: Vec<&str> = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        match dot_segment(segment) {
            Some(kind) => {
                if kind == DotSegment::Parent {
                    resolved.pop();
                }
                if last {
                    resolved.push("");
                }
            }
            None => resolved.push(segment),
        }
    }
    Cow::Owned(format!("/{}", resolved.join("/")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Single,
    Tail,
}

/// A parsed `(pattern, optional method)` pair.
///
/// `method == None` matches any method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pattern: String,
    method: Option<HttpMethod>,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern, rejecting anything the matcher cannot evaluate
    /// unambiguously.
    pub fn parse(pattern: &str, method: Option<HttpMethod>) -> Result<Self, GatewayError> {
        let invalid = |reason: &str| {
            GatewayError::InvalidPathPattern(pattern.to_string(), reason.to_string())
        };

        if !pattern.starts_with('/') {
            return Err(invalid("pattern must start with '/'"));
        }

        let mut segments = Vec::new();
        let mut parts = pattern.split('/').filter(|s| !s.is_empty()).peekable();
        while let Some(part) = parts.next() {
            let segment = match part {
                "**" if parts.peek().is_some() => {
                    return Err(invalid("'**' must be the last segment"));
                }
                "**" => Segment::Tail,
                "*" => Segment::Single,
                p if p.contains('*') => {
                    return Err(invalid("wildcards must occupy a whole segment"));
                }
                p => Segment::Literal(p.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            method,
            segments,
        })
    }

    /// Pattern text as configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Method restriction, if any.
    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    /// `true` if `path` matches the pattern and `method` satisfies the
    /// method restriction.
    pub fn matches(&self, path: &str, method: HttpMethod) -> bool {
        if self.method.is_some_and(|m| m != method) {
            return false;
        }
        self.matches_path(path)
    }

    /// Path-only match, ignoring the method restriction.
    pub fn matches_path(&self, path: &str) -> bool {
        if path.split(['/', '\\']).any(|s| dot_segment(s).is_some()) {
            return false;
        }
        let mut parts = path.split('/').filter(|s| !s.is_empty());
        for segment in &self.segments {
            match segment {
                Segment::Tail => return true,
                Segment::Single => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(lit) => match parts.next() {
                    Some(part) if part == lit => {}
                    _ => return false,
                },
            }
        }
        parts.next().is_none()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method {
            Some(m) => write!(f, "{m} {}", self.pattern),
            None => f.write_str(&self.pattern),
        }
    }
}

/// Unparsed `(pattern, method)` pair as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPatternConfig {
    pub pattern: String,
    #[serde(default)]
    pub method: Option<HttpMethod>,
}

impl PathPatternConfig {
    pub fn new(pattern: impl Into<String>, method: Option<HttpMethod>) -> Self {
        Self {
            pattern: pattern.into(),
            method,
        }
    }

    pub fn parse(&self) -> Result<PathPattern, GatewayError> {
        PathPattern::parse(&self.pattern, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(pattern: &str) -> PathPattern {
        PathPattern::parse(pattern, None).unwrap()
    }

    #[test]
    fn double_star_matches_any_tail() {
        let pat = p("/auth/**");
        assert!(pat.matches_path("/auth/login"));
        assert!(pat.matches_path("/auth/oauth/callback/google"));
        assert!(pat.matches_path("/auth"));
        assert!(!pat.matches_path("/authx/login"));
        assert!(!pat.matches_path("/api/auth/login"));
    }

    #[test]
    fn single_star_matches_exactly_one_segment() {
        let pat = p("/auth/*");
        assert!(pat.matches_path("/auth/login"));
        assert!(!pat.matches_path("/auth/a/b"));
        assert!(!pat.matches_path("/auth"));
    }

    #[test]
    fn literal_requires_full_consumption() {
        let pat = p("/api/users");
        assert!(pat.matches_path("/api/users"));
        assert!(pat.matches_path("/api/users/"));
        assert!(!pat.matches_path("/api/users/42"));
        assert!(!pat.matches_path("/api"));
    }

    #[test]
    fn star_in_the_middle() {
        let pat = p("/api/*/profile");
        assert!(pat.matches_path("/api/42/profile"));
        assert!(!pat.matches_path("/api/42/settings"));
        assert!(!pat.matches_path("/api/profile"));
    }

    #[test]
    fn method_restriction_applies() {
        let pat = PathPattern::parse("/api/users", Some(HttpMethod::Post)).unwrap();
        assert!(pat.matches("/api/users", HttpMethod::Post));
        assert!(!pat.matches("/api/users", HttpMethod::Get));

        let any = p("/api/users");
        assert!(any.matches("/api/users", HttpMethod::Delete));
    }

    #[test]
    fn segments_are_not_prefixes() {
        let pat = p("/.well-known/**");
        assert!(pat.matches_path("/.well-known/openid-configuration"));
        assert!(!pat.matches_path("/.well-knownx"));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        for bad in ["/a/**/b", "/a*", "/a/b*c", "api/users", ""] {
            assert!(
                matches!(
                    PathPattern::parse(bad, None),
                    Err(GatewayError::InvalidPathPattern(..))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn dot_segments_never_match() {
        let pat = p("/oauth2/**");
        for path in [
            "/oauth2/../api/users/42",
            "/oauth2/%2e%2e/api/users/42",
            "/oauth2/.%2E/api",
            "/oauth2/./callback",
            "/oauth2/..\\api",
        ] {
            assert!(!pat.matches_path(path), "{path} should not match");
        }
        assert!(pat.matches_path("/oauth2/..hidden"));
    }

    #[test]
    fn normalize_resolves_dot_segments() {
        let cases = [
            ("/oauth2/../api/users/42", "/api/users/42"),
            ("/oauth2/%2e%2e/api/users/42", "/api/users/42"),
            ("/oauth2/%2E./api", "/api"),
            ("/a/./b", "/a/b"),
            ("/a/b/..", "/a/"),
            ("/../../etc", "/etc"),
            ("/..", "/"),
            ("/a\\..\\b", "/b"),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_path(raw), expected, "normalizing {raw}");
        }
    }

    #[test]
    fn normalize_leaves_clean_paths_alone() {
        for path in ["/api/users/", "/.well-known/jwks.json", "/a//b", "/oauth2/..hidden"] {
            assert!(matches!(normalize_path(path), Cow::Borrowed(p) if p == path));
        }
    }

    #[test]
    fn adversarial_paths_do_not_explode() {
        let pat = p("/a/*/*/*/**");
        let long = "/a".to_string() + &"/x".repeat(10_000);
        assert!(pat.matches_path(&long));
        let pat = p("/a/*/*/*/b");
        assert!(!pat.matches_path(&long));
    }
}
