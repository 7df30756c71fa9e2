//! Configuration types for axum-helpers.
//!
//! These implement the `FromEnv` trait from `core_config`, like
//! `ServerConfig` does.

use core_config::{ConfigError, FromEnv, env_or_default};

/// HTTP Basic credentials accepted by the API.
///
/// Loaded from environment variables:
/// - `BASIC_AUTH_USER` (default: `admin`)
/// - `BASIC_AUTH_PASSWORD` (default: `admin`)
///
/// # Example
///
/// ```ignore
/// use axum_helpers::BasicAuthConfig;
/// use core_config::FromEnv;
///
/// // From environment variables
/// let config = BasicAuthConfig::from_env()?;
///
/// // Manual construction (for testing)
/// let config = BasicAuthConfig::new("ops", "s3cret");
/// ```
#[derive(Clone)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

impl BasicAuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for BasicAuthConfig {
    fn default() -> Self {
        Self::new("admin", "admin")
    }
}

// Never print the password
impl std::fmt::Debug for BasicAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl FromEnv for BasicAuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let username = env_or_default("BASIC_AUTH_USER", "admin");
        let password = env_or_default("BASIC_AUTH_PASSWORD", "admin");

        if username.is_empty() || username.contains(':') {
            return Err(ConfigError::ParseError {
                key: "BASIC_AUTH_USER".to_string(),
                details: "must be non-empty and must not contain ':'".to_string(),
            });
        }

        Ok(Self { username, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_config_defaults() {
        temp_env::with_vars(
            [
                ("BASIC_AUTH_USER", None::<&str>),
                ("BASIC_AUTH_PASSWORD", None::<&str>),
            ],
            || {
                let config = BasicAuthConfig::from_env().unwrap();
                assert_eq!(config.username, "admin");
                assert_eq!(config.password, "admin");
            },
        );
    }

    #[test]
    fn test_basic_auth_config_from_env() {
        temp_env::with_vars(
            [
                ("BASIC_AUTH_USER", Some("ops")),
                ("BASIC_AUTH_PASSWORD", Some("s3cret")),
            ],
            || {
                let config = BasicAuthConfig::from_env().unwrap();
                assert_eq!(config.username, "ops");
                assert_eq!(config.password, "s3cret");
            },
        );
    }

    #[test]
    fn test_basic_auth_config_rejects_colon_in_user() {
        temp_env::with_var("BASIC_AUTH_USER", Some("a:b"), || {
            let err = BasicAuthConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("BASIC_AUTH_USER"));
        });
    }

    #[test]
    fn test_debug_hides_password() {
        let config = BasicAuthConfig::new("admin", "hunter2");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
