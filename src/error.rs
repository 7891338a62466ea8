//! # Error Types
//!
//! This module defines error types used throughout the cardpress library.
//!
//! Per-record data problems are never errors: the resolver and renderer
//! degrade to empty strings and placeholders instead. The variants here cover
//! the remaining hard failures (bad template files, rejected saves, storage
//! and transport problems).

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CardError>;

/// Main error type for cardpress operations
#[derive(Debug, Error)]
pub enum CardError {
    /// A persisted template could not be parsed or violates the face invariants
    #[error("Template error: {0}")]
    Template(String),

    /// Saving a template whose faces carry no items at all
    #[error("Template has no items on any face")]
    EmptyTemplate,

    /// Saving a template without a name
    #[error("Template name is required")]
    MissingName,

    /// A template id that the store does not know
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The record-fetch collaborator failed (network, HTTP status, bad JSON)
    #[error("Record fetch error: {0}")]
    Record(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),

    /// Transport-level errors (server bind, serve loop)
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CardError {
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    pub fn record(msg: impl Into<String>) -> Self {
        Self::Record(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert!(CardError::template("x").to_string().starts_with("Template error:"));
        assert!(CardError::record("x").to_string().starts_with("Record fetch error:"));
        assert_eq!(
            CardError::MissingName.to_string(),
            "Template name is required"
        );
    }

    #[test]
    fn test_io_from() {
        let err: CardError = std::io::Error::other("disk gone").into();
        assert!(err.to_string().contains("disk gone"));
    }
}
