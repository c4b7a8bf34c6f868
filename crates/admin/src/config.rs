//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TOYSHOP_ADMIN_USERNAME` - Shared admin username
//! - `TOYSHOP_ADMIN_PASSWORD` - Shared admin password
//!
//! ## Optional
//! - `TOYSHOP_MAX_DEVICES` - Devices allowed to be logged in at once (default: 5)

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use toyshop_core::MAX_AUTH_DEVICES;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin console configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// The single shared login
    pub credentials: AdminCredentials,
    /// Maximum number of devices on the login allow-list
    pub max_devices: usize,
}

/// The shared admin username and password.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Admin username
    pub username: String,
    /// Admin password
    pub password: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AdminCredentials {
    /// Create a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Whether the given pair matches exactly.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password.expose_secret() == password
    }
}

impl AdminConfig {
    /// Create a configuration with the default device limit.
    #[must_use]
    pub const fn new(credentials: AdminCredentials) -> Self {
        Self {
            credentials,
            max_devices: MAX_AUTH_DEVICES,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let username = get_required_env("TOYSHOP_ADMIN_USERNAME")?;
        let password = get_required_secret("TOYSHOP_ADMIN_PASSWORD")?;
        let max_devices = parse_max_devices(
            &get_env_or_default("TOYSHOP_MAX_DEVICES", &MAX_AUTH_DEVICES.to_string()),
            "TOYSHOP_MAX_DEVICES",
        )?;

        Ok(Self {
            credentials: AdminCredentials { username, password },
            max_devices,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required, non-empty environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a device limit, which must be at least one.
fn parse_max_devices(value: &str, var_name: &str) -> Result<usize, ConfigError> {
    let max = value
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if max == 0 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_match_exactly() {
        let credentials = AdminCredentials::new("admin", "s3cret-pass");
        assert!(credentials.matches("admin", "s3cret-pass"));
        assert!(!credentials.matches("admin", "s3cret-pas"));
        assert!(!credentials.matches("Admin", "s3cret-pass"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = AdminCredentials::new("admin", "super_secret_password");
        let debug_output = format!("{credentials:?}");

        assert!(debug_output.contains("admin"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_password"));
    }

    #[test]
    fn test_parse_max_devices() {
        assert_eq!(parse_max_devices("5", "TEST_VAR").unwrap(), 5);
        assert_eq!(parse_max_devices(" 3 ", "TEST_VAR").unwrap(), 3);
        assert!(matches!(
            parse_max_devices("0", "TEST_VAR"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_max_devices("many", "TEST_VAR").is_err());
    }

    #[test]
    fn test_new_uses_default_device_limit() {
        let config = AdminConfig::new(AdminCredentials::new("admin", "pw"));
        assert_eq!(config.max_devices, 5);
    }
}
