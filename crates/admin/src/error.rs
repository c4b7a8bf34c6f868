//! Unified error handling for admin.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::services::auth::{AuthError, INVALID_CREDENTIALS_MESSAGE};
use crate::services::products::ProductError;

/// Application-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Login or logout failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Product change was rejected.
    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credentials did not match.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// Rejected login with wrong credentials.
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
    }

    /// Message suitable for showing inline in the admin console.
    ///
    /// Storage and configuration details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Product(ProductError::Storage(_)) => {
                "Something went wrong saving your changes. Please try again.".to_string()
            }
            Self::Auth(err) => err.user_facing_message(),
            Self::Product(ProductError::Validation(errors)) => errors.to_string(),
            Self::Product(ProductError::NotFound(_)) => "Product not found".to_string(),
            Self::Config(_) => "The admin console is not configured correctly.".to_string(),
            Self::Unauthorized(message) => message.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
