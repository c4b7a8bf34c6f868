//! Domain models for admin.

pub mod product_draft;

pub use product_draft::{DraftField, FieldError, ProductDraft, ValidationErrors};
