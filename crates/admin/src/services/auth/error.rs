//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Message shown when the credentials do not match.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The device allow-list is full and this device is not on it.
    #[error("device limit of {max} reached")]
    DeviceLimitReached {
        /// Allow-list capacity.
        max: usize,
    },

    /// Username or password left blank.
    #[error("username and password are required")]
    MissingCredentials,

    /// Repository/storage error.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl AuthError {
    /// Message to show at the login form.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::DeviceLimitReached { max } => format!(
                "Maximum number of devices ({max}) reached. Please log out from another device."
            ),
            Self::MissingCredentials => "Username and password are required".to_string(),
            Self::Storage(_) => "Login failed. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_limit_message() {
        let err = AuthError::DeviceLimitReached { max: 5 };
        assert_eq!(
            err.user_facing_message(),
            "Maximum number of devices (5) reached. Please log out from another device."
        );
    }

    #[test]
    fn test_storage_message_hides_details() {
        let err = AuthError::Storage(RepositoryError::Backend("disk full".to_string()));
        assert!(!err.user_facing_message().contains("disk"));
    }
}
