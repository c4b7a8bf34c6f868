//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Shared-credential login gated by a device allow-list
//! - `dashboard` - Inventory and catalog statistics
//! - `products` - Validated product CRUD

pub mod auth;
pub mod dashboard;
pub mod products;

pub use auth::{AuthError, AuthService, Clock, FingerprintProvider, SystemClock};
pub use dashboard::{CategoryBreakdown, DashboardStats, InventorySummary};
pub use products::{ProductError, ProductService};
