//! Layered server configuration loaded with figment.
//!
//! Sources (in priority order, highest wins):
//! 1. Environment variables (`FACULTRACK_*` prefix, `__` as separator)
//! 2. `facultrack.toml` in the working directory
//! 3. Built-in defaults
//!
//! `FACULTRACK_AUTH__JWT_SECRET` maps to `auth.jwt_secret`,
//! `FACULTRACK_DB__URL` to `db.url`, and so on.

use std::path::PathBuf;

use facultrack_auth::AuthConfig;
use facultrack_db::DbConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE: &str = "facultrack.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("auth.jwt_secret must be set (FACULTRACK_AUTH__JWT_SECRET)")]
    MissingJwtSecret,

    #[error("auth.credential_lifetime_secs must be greater than zero")]
    ZeroCredentialLifetime,

    #[error("auth.credential_lifetime_secs must be at most {max}, got {actual}")]
    CredentialLifetimeTooLong { max: u64, actual: u64 },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from `facultrack.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.env` file from the working directory first, if present.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let local_path = PathBuf::from(CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("FACULTRACK_").split("__"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.auth.credential_lifetime_secs == 0 {
            return Err(ConfigError::ZeroCredentialLifetime);
        }
        if self.auth.credential_lifetime_secs > AuthConfig::MAX_CREDENTIAL_LIFETIME_SECS {
            return Err(ConfigError::CredentialLifetimeTooLong {
                max: AuthConfig::MAX_CREDENTIAL_LIFETIME_SECS,
                actual: self.auth.credential_lifetime_secs,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_secret_are_rejected() {
        figment::Jail::expect_with(|_jail| {
            let err = ServerConfig::load().unwrap_err();
            assert!(matches!(err, ConfigError::MissingJwtSecret));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_nested_fields() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FACULTRACK_AUTH__JWT_SECRET", "from-env");
            jail.set_env("FACULTRACK_DB__NAMESPACE", "staging");
            jail.set_env("FACULTRACK_HTTP__BIND_ADDR", "127.0.0.1:9000");

            let config = ServerConfig::load().unwrap();
            assert_eq!(config.auth.jwt_secret, "from-env");
            assert_eq!(config.auth.credential_lifetime_secs, 3600);
            assert_eq!(config.db.namespace, "staging");
            assert_eq!(config.db.database, "main");
            assert_eq!(config.http.bind_addr, "127.0.0.1:9000");
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_layered_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [auth]
                jwt_secret = "from-file"
                credential_lifetime_secs = 1800

                [db]
                url = "db.internal:8000"
                "#,
            )?;
            jail.set_env("FACULTRACK_AUTH__JWT_SECRET", "from-env");

            let config = ServerConfig::load().unwrap();
            assert_eq!(config.auth.jwt_secret, "from-env");
            assert_eq!(config.auth.credential_lifetime_secs, 1800);
            assert_eq!(config.db.url, "db.internal:8000");
            Ok(())
        });
    }

    #[test]
    fn zero_lifetime_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FACULTRACK_AUTH__JWT_SECRET", "s");
            jail.set_env("FACULTRACK_AUTH__CREDENTIAL_LIFETIME_SECS", "0");
            let err = ServerConfig::load().unwrap_err();
            assert!(matches!(err, ConfigError::ZeroCredentialLifetime));
            Ok(())
        });
    }

    #[test]
    fn oversized_lifetime_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FACULTRACK_AUTH__JWT_SECRET", "s");
            jail.set_env("FACULTRACK_AUTH__CREDENTIAL_LIFETIME_SECS", "31536000");
            let err = ServerConfig::load().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::CredentialLifetimeTooLong {
                    actual: 31_536_000,
                    ..
                }
            ));
            Ok(())
        });
    }

    #[test]
    fn one_week_lifetime_is_accepted() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FACULTRACK_AUTH__JWT_SECRET", "s");
            jail.set_env("FACULTRACK_AUTH__CREDENTIAL_LIFETIME_SECS", "604800");
            let config = ServerConfig::load().unwrap();
            assert_eq!(
                config.auth.credential_lifetime_secs,
                AuthConfig::MAX_CREDENTIAL_LIFETIME_SECS
            );
            Ok(())
        });
    }
}
