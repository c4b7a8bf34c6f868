//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TOYSHOP_WHATSAPP_NUMBER` - Shop phone number for checkout links
//!   (default: 00962791417774)
//! - `TOYSHOP_CURRENCY_SYMBOL` - Symbol used when formatting prices (default: $)

use thiserror::Error;

use toyshop_core::DEFAULT_CURRENCY_SYMBOL;

const DEFAULT_WHATSAPP_NUMBER: &str = "00962791417774";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone, Default)]
pub struct StorefrontConfig {
    /// Checkout link configuration
    pub checkout: CheckoutConfig,
}

/// WhatsApp checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Phone number the order message is sent to (digits only, optionally
    /// prefixed with `+`)
    pub whatsapp_number: String,
    /// Currency symbol for prices in the order message
    pub currency_symbol: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            checkout: CheckoutConfig::from_env()?,
        })
    }
}

impl CheckoutConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let whatsapp_number =
            get_env_or_default("TOYSHOP_WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER);
        validate_phone_number(&whatsapp_number, "TOYSHOP_WHATSAPP_NUMBER")?;

        Ok(Self {
            whatsapp_number,
            currency_symbol: get_env_or_default("TOYSHOP_CURRENCY_SYMBOL", DEFAULT_CURRENCY_SYMBOL),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a phone number can be used in a click-to-chat link.
fn validate_phone_number(number: &str, var_name: &str) -> Result<(), ConfigError> {
    let digits = number.strip_prefix('+').unwrap_or(number);
    if digits.is_empty() {
        return Err(ConfigError::MissingEnvVar(var_name.to_string()));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "phone number must contain only digits".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_checkout_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.checkout.whatsapp_number, "00962791417774");
        assert_eq!(config.checkout.currency_symbol, "$");
    }

    #[test]
    fn test_validate_phone_number_accepts_digits() {
        assert!(validate_phone_number("00962791417774", "TEST_VAR").is_ok());
        assert!(validate_phone_number("+15551234567", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_validate_phone_number_rejects_formatting() {
        let result = validate_phone_number("555-1234", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_validate_phone_number_rejects_empty() {
        let result = validate_phone_number("+", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }
}
