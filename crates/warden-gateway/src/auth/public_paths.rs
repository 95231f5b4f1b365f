//! Classification of requests that bypass authentication.

use warden_kernel::gateway::{GatewayError, HttpMethod, PathPattern, PathPatternConfig};

/// Immutable list of path/method patterns exempt from authentication.
///
/// Patterns are parsed once at construction; lookups are lock-free and
/// allocation-free.
#[derive(Debug, Clone)]
pub struct PublicPathClassifier {
    patterns: Vec<PathPattern>,
}

impl PublicPathClassifier {
    /// Parse every configured entry, failing on the first invalid pattern.
    pub fn new(entries: &[PathPatternConfig]) -> Result<Self, GatewayError> {
        let patterns = entries
            .iter()
            .map(PathPatternConfig::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The stock public surface: login/token endpoints, OAuth2 callbacks,
    /// discovery documents, the actuator and user sign-up.
    pub fn default_patterns() -> Vec<PathPatternConfig> {
        vec![
            PathPatternConfig::new("/auth/**", None),
            PathPatternConfig::new("/oauth2/**", None),
            PathPatternConfig::new("/login/**", None),
            PathPatternConfig::new("/.well-known/**", None),
            PathPatternConfig::new("/actuator/**", None),
            PathPatternConfig::new("/api/users", Some(HttpMethod::Post)),
        ]
    }

    /// `true` if any pattern accepts `(path, method)`.
    pub fn is_public(&self, path: &str, method: HttpMethod) -> bool {
        self.patterns.iter().any(|p| p.matches(path, method))
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> PublicPathClassifier {
        PublicPathClassifier::new(&PublicPathClassifier::default_patterns()).unwrap()
    }

    #[test]
    fn auth_subtree_is_public_for_any_method() {
        let c = stock();
        assert!(c.is_public("/auth/login", HttpMethod::Post));
        assert!(c.is_public("/auth/refresh", HttpMethod::Get));
        assert!(c.is_public("/auth", HttpMethod::Get));
        assert!(c.is_public("/actuator/health", HttpMethod::Get));
        assert!(c.is_public("/.well-known/openid-configuration", HttpMethod::Get));
    }

    #[test]
    fn user_signup_is_public_only_for_post() {
        let c = stock();
        assert!(c.is_public("/api/users", HttpMethod::Post));
        assert!(!c.is_public("/api/users", HttpMethod::Get));
        assert!(!c.is_public("/api/users/42", HttpMethod::Post));
    }

    #[test]
    fn lookalike_prefixes_are_protected() {
        let c = stock();
        assert!(!c.is_public("/authx/login", HttpMethod::Post));
        assert!(!c.is_public("/api/v1/orders", HttpMethod::Get));
        assert!(!c.is_public("/", HttpMethod::Get));
    }

    #[test]
    fn empty_list_protects_everything() {
        let c = PublicPathClassifier::new(&[]).unwrap();
        assert!(!c.is_public("/auth/login", HttpMethod::Post));
        assert!(c.patterns().is_empty());
    }

    #[test]
    fn invalid_entry_fails_construction() {
        let entries = vec![PathPatternConfig::new("/a/**/b", None)];
        assert!(matches!(
            PublicPathClassifier::new(&entries),
            Err(GatewayError::InvalidPathPattern(_, _))
        ));
    }
}
