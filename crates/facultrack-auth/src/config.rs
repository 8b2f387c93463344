//! Authentication configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration for reviewer credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HS256 secret used to sign and verify credentials.
    pub jwt_secret: String,
    /// Credential lifetime in seconds (default: 3600 = 1 hour).
    pub credential_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
}

impl AuthConfig {
    /// Longest credential lifetime accepted at startup (7 days).
    pub const MAX_CREDENTIAL_LIFETIME_SECS: u64 = 7 * 24 * 3600;

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            credential_lifetime_secs: 3600,
            jwt_issuer: "facultrack".into(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("credential_lifetime_secs", &self.credential_lifetime_secs)
            .field("jwt_issuer", &self.jwt_issuer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lifetime_is_one_hour() {
        assert_eq!(AuthConfig::default().credential_lifetime_secs, 3600);
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = AuthConfig::with_secret("hunter2-hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
