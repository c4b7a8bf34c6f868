//! Unified storefront error type.
//!
//! Every storefront operation failure converts into `AppError`, which knows
//! which message is safe to show a shopper.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Cart mutation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout link could not be built.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Message suitable for showing inline to the shopper.
    ///
    /// Storage and configuration details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Cart(CartError::Storage(_)) => {
                "Something went wrong saving your cart. Please try again.".to_string()
            }
            Self::Config(_) => "The shop is not configured correctly.".to_string(),
            Self::Cart(CartError::InsufficientStock { available, .. }) => {
                format!("Not enough inventory available (only {available} left).")
            }
            Self::Cart(err) => capitalize(&err.to_string()),
            Self::Checkout(CheckoutError::EmptyCart) => "Your cart is empty".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Checkout error: cannot check out an empty cart");
    }

    #[test]
    fn test_user_messages_hide_storage_details() {
        let err = AppError::Storage(RepositoryError::Backend("disk on fire".to_string()));
        assert!(!err.user_message().contains("disk on fire"));
    }

    #[test]
    fn test_user_message_for_stock() {
        let err = AppError::from(CartError::InsufficientStock {
            requested: 4,
            available: 3,
        });
        assert_eq!(err.user_message(), "Not enough inventory available (only 3 left).");

        let err = AppError::from(CartError::InvalidQuantity);
        assert_eq!(err.user_message(), "Quantity must be at least 1");
    }
}
