//! # Cardpress - ID Card Layout and Rendering
//!
//! Cardpress models identification-card templates (a FRONT face and an
//! optional BACK face of positioned items), binds them to person records,
//! and renders them for editing, preview, bitmap capture and duplex print.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cardpress::{
//!     FaceKind, Template,
//!     document::{BoundLabel, FixedText, ItemKind},
//!     fields::BindingContext,
//!     print::{PrintRecord, compose_pages},
//!     render::{RenderContext, Renderer},
//!     fields::FieldCatalog,
//! };
//! use std::sync::Arc;
//! # async fn example() -> Result<(), cardpress::CardError> {
//!
//! let mut template = Template::new("Visitor badge");
//! template.front.add(ItemKind::BoundLabel(BoundLabel::new("FullName")));
//! template.front.add(ItemKind::FixedText(FixedText::new("VISITOR")));
//!
//! let record = serde_json::json!({"Employee": {"Name": "Ada", "SurName": "Lovelace"}});
//! let ctx = BindingContext::from_record(&record);
//!
//! let renderer = Renderer::new(
//!     Arc::new(FieldCatalog::standard(None)),
//!     Arc::new(RenderContext::new("https://cards.example.com", None)?),
//! );
//! let pages = compose_pages(&renderer, &[PrintRecord::new(template, Some(ctx))]).await;
//! println!("{}", pages.to_html());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`units`] | mm/px conversion and the persisted 2x scale |
//! | [`document`] | Template, faces, items and their JSON form |
//! | [`fields`] | Field catalog, binding context and path resolution |
//! | [`placement`] | Selection, drag and keyboard nudging |
//! | [`render`] | Live, preview and capture targets |
//! | [`print`] | Page sequences for duplex print |
//! | [`store`] | Template storage and record sources |
//! | [`config`] | Engine configuration (CLI flags / env) |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod config;
pub mod document;
pub mod error;
pub mod fields;
pub mod placement;
pub mod print;
pub mod render;
pub mod server;
pub mod store;
pub mod units;

// Re-exports for convenience
pub use document::{Face, FaceKind, Item, ItemId, ItemKind, Side, Template};
pub use error::CardError;
pub use render::Renderer;
