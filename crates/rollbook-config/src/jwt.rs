use std::env;
use std::fmt;

pub const DEFAULT_SECRET: &str = "rollbook-dev-secret-change-me";
/// Token lifetime. Not configurable from the environment.
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
pub const DEFAULT_ISSUER: &str = "rollbook";

/// Signing settings for the token service.
///
/// Rotating `secret` invalidates every token already issued.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_seconds: i64,
    pub issuer: String,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string()),
            ttl_seconds: TOKEN_TTL_SECONDS,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
        }
    }

    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: TOKEN_TTL_SECONDS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    /// Overrides the lifetime. Tests use this to mint already-expired tokens.
    pub fn with_ttl(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_day_long_tokens() {
        let config = JwtConfig::new("s3cret");
        assert_eq!(config.ttl_seconds, 86_400);
        assert_eq!(config.issuer, "rollbook");
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn test_from_env_uses_fixed_lifetime() {
        assert_eq!(JwtConfig::from_env().ttl_seconds, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", JwtConfig::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
