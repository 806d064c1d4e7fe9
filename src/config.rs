//! Cookie configuration and engine constants.

/// Name of the cookie carrying the session identifier.
pub const COOKIE_NAME: &str = "GSESSIONID";

/// Directory holding session storage files. Fixed by design; callers
/// needing a different location should wrap the engine, not reconfigure it.
pub(crate) const SESSION_DIR: &str = "/tmp";

/// Prefix of every session storage file name.
pub(crate) const FILE_PREFIX: &str = "gosession_";

/// Length of a session identifier in hex characters (128 bits).
pub(crate) const ID_LENGTH: usize = 32;

/// Cookie attributes applied to every cookie written for a session.
///
/// Captured once at session creation and reused verbatim on later cookie
/// writes so attributes stay consistent across create/destroy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieOptions {
    /// Cookie `Path` attribute (omitted when empty).
    pub path: String,
    /// Cookie `Domain` attribute (omitted when empty).
    pub domain: String,
    /// Cookie `Max-Age` in seconds: 0 = unset, negative = expire now.
    pub max_age: i32,
    /// Cookie `Secure` attribute.
    pub secure: bool,
    /// Cookie `HttpOnly` attribute.
    pub http_only: bool,
}

impl CookieOptions {
    /// Create options with all attributes unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cookie path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the cookie domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the cookie max-age in seconds.
    pub fn with_max_age(mut self, seconds: i32) -> Self {
        self.max_age = seconds;
        self
    }

    /// Mark the cookie `Secure`.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Mark the cookie `HttpOnly`.
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let options = CookieOptions::new()
            .with_path("/app")
            .with_domain("example.com")
            .with_max_age(3600)
            .with_secure(true)
            .with_http_only(true);

        assert_eq!(options.path, "/app");
        assert_eq!(options.domain, "example.com");
        assert_eq!(options.max_age, 3600);
        assert!(options.secure);
        assert!(options.http_only);
    }

    #[test]
    fn test_defaults_are_unset() {
        let options = CookieOptions::default();
        assert!(options.path.is_empty());
        assert!(options.domain.is_empty());
        assert_eq!(options.max_age, 0);
        assert!(!options.secure);
        assert!(!options.http_only);
    }
}
