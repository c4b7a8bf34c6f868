//! Command implementations.
//!
//! Each command opens what it needs from a [`Context`], performs one
//! operation, and prints the result.

pub mod admin;
pub mod shop;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use toyshop_admin::services::auth::{AuthError, AuthService, ScreenSize, StaticFingerprint};
use toyshop_admin::services::products::{ProductError, ProductService};
use toyshop_admin::{AdminConfig, config::ConfigError as AdminConfigError};
use toyshop_core::StorageError;
use toyshop_storefront::config::ConfigError as StorefrontConfigError;
use toyshop_storefront::services::{CartError, CheckoutError};
use toyshop_storefront::{Storefront, StorefrontConfig};

use crate::store::FileStore;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Storefront operation failed.
    #[error(transparent)]
    Storefront(#[from] toyshop_storefront::AppError),

    /// Admin operation failed.
    #[error(transparent)]
    Admin(#[from] toyshop_admin::AppError),

    /// The command needs an admin login on this device.
    #[error("not logged in")]
    NotLoggedIn,

    /// Bad command-line input.
    #[error("{0}")]
    InvalidInput(String),

    /// A file named on the command line could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be encoded, or an input file was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Message to print for the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storefront(e) => e.user_message(),
            Self::Admin(e) => e.user_message(),
            Self::NotLoggedIn => "Please log in first: toyshop login -u <username> -p <password>".to_string(),
            Self::InvalidInput(_) | Self::ReadFile { .. } | Self::Json(_) => self.to_string(),
        }
    }
}

// Lift library errors through their crate's `AppError`.
macro_rules! via_app_error {
    ($app:ty => $($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for CommandError {
                fn from(err: $err) -> Self {
                    <$app>::from(err).into()
                }
            }
        )+
    };
}

via_app_error!(toyshop_storefront::AppError => CartError, CheckoutError, StorefrontConfigError);
via_app_error!(toyshop_admin::AppError => AuthError, ProductError, AdminConfigError);

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        toyshop_storefront::AppError::from(err).into()
    }
}

/// Shared state for one invocation.
#[derive(Debug)]
pub struct Context {
    store: FileStore,
}

impl Context {
    /// Open the data file.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if the data file exists but cannot be read.
    pub fn open(data_file: &Path) -> Result<Self, CommandError> {
        Ok(Self {
            store: FileStore::open(data_file)?,
        })
    }

    /// The storefront view of the data file.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if the storefront configuration is invalid.
    pub fn storefront(&self) -> Result<Storefront<FileStore>, CommandError> {
        let config = StorefrontConfig::from_env()?;
        Ok(Storefront::load(config, self.store.clone()))
    }

    /// The admin login service for this device.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if the admin configuration is missing.
    pub fn auth(&self) -> Result<AuthService<FileStore>, CommandError> {
        let config = AdminConfig::from_env()?;
        Ok(AuthService::new(
            config,
            self.store.clone(),
            Arc::new(fingerprint()),
        ))
    }

    /// Product management, after checking this device is logged in.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::NotLoggedIn` if it is not.
    pub fn admin_products(&self) -> Result<ProductService<FileStore>, CommandError> {
        if !self.auth()?.is_authenticated() {
            tracing::warn!("admin command rejected: not logged in");
            return Err(CommandError::NotLoggedIn);
        }
        Ok(ProductService::new(self.store.clone()))
    }
}

/// This terminal's fingerprint: the configured user agent (or the CLI's
/// name, version, and OS) and the terminal size if the shell exports it.
fn fingerprint() -> StaticFingerprint {
    let user_agent = std::env::var("TOYSHOP_USER_AGENT").unwrap_or_else(|_| {
        format!(
            "{}/{} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        )
    });
    let dimension = |key: &str| -> u32 {
        std::env::var(key)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    };
    StaticFingerprint::new(
        user_agent,
        ScreenSize {
            width: dimension("COLUMNS"),
            height: dimension("LINES"),
        },
    )
}
