//! Admin access to local key/value storage.
//!
//! # Keys
//!
//! - `products` - the whole catalog, rewritten on every change
//! - `isAuthenticated` - admin login flag
//! - `deviceId` - this installation's fingerprint
//! - `authDevices` - login allow-list
//!
//! Every write to a list is a whole-document read-modify-write through
//! [`toyshop_core::JsonStore::apply`].

pub mod devices;
pub mod products;
pub mod session;

pub use devices::DeviceRepository;
pub use products::ProductRepository;
pub use session::SessionRepository;
pub use toyshop_core::StorageError as RepositoryError;
