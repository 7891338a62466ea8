//! # External Collaborators
//!
//! The engine itself never performs I/O beyond image fetching. Records and
//! templates come from the two traits here, with an HTTP/file-backed and an
//! in-memory implementation of each.
//!
//! | Trait | Implementations |
//! |-------|-----------------|
//! | [`RecordSource`] | [`HttpRecordSource`], [`MemoryRecordSource`] |
//! | [`TemplateStore`] | [`FileTemplateStore`], [`MemoryTemplateStore`] |

pub mod records;
pub mod templates;

pub use records::{HttpRecordSource, MemoryRecordSource, RecordSource};
pub use templates::{FileTemplateStore, MemoryTemplateStore, TemplateStore, TemplateSummary};
