//! # Field Catalog & Resolver
//!
//! Turns raw records into display strings for bound items.
//!
//! ```text
//! raw record JSON ──► BindingContext::from_record ──► resolve(path, ctx) ──► String
//!                                                          │
//!                         FieldCatalog::display_name ◄─────┘ (fallback label)
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Bindable field list for the editor |
//! | [`context`] | Per-record flattened lookup map |
//! | [`resolve`] | Path → string with fallback chain |
//! | [`path`] | Legacy custom-field path normalization |
//! | [`transform`] | Upper/lower/capitalize |

pub mod catalog;
pub mod context;
pub mod path;
pub mod resolve;
pub mod transform;

pub use catalog::{CustomFieldSetting, FieldCatalog, FieldOption};
pub use context::BindingContext;
pub use path::normalize_field_path;
pub use resolve::{display_string, resolve};
pub use transform::text_transform;
