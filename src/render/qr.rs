//! QR symbol generation.
//!
//! Symbols use error-correction level M and a one-module quiet zone. The
//! encoder needs a non-empty payload, so callers substitute a single space
//! for empty values before encoding.

use qrcode::{EcLevel, QrCode};
use serde::Serialize;
use thiserror::Error;

/// Quiet-zone width in modules.
pub const QR_MARGIN: usize = 1;

/// Payload used when the bound value is empty.
pub const EMPTY_PAYLOAD: &str = " ";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QrError {
    #[error("QR encoding failed: {0}")]
    Encode(String),
    #[error("QR encoder task aborted: {0}")]
    Aborted(String),
}

/// Encoded symbol as a square grid of modules, quiet zone included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrSymbol {
    size: usize,
    #[serde(skip)]
    modules: Vec<bool>,
}

impl QrSymbol {
    /// Encode synchronously.
    pub fn encode(data: &str) -> Result<Self, QrError> {
        let data = if data.is_empty() { EMPTY_PAYLOAD } else { data };
        let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
            .map_err(|e| QrError::Encode(e.to_string()))?;
        let width = code.width();
        let size = width + QR_MARGIN * 2;
        let mut modules = vec![false; size * size];
        for y in 0..width {
            for x in 0..width {
                if code[(x, y)] == qrcode::Color::Dark {
                    modules[(y + QR_MARGIN) * size + x + QR_MARGIN] = true;
                }
            }
        }
        Ok(Self { size, modules })
    }

    /// Encode on the blocking pool.
    pub async fn encode_async(data: String) -> Result<Self, QrError> {
        tokio::task::spawn_blocking(move || Self::encode(&data))
            .await
            .map_err(|e| QrError::Aborted(e.to_string()))?
    }

    /// Side length in modules, quiet zone included.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.modules[y * self.size + x]
    }

    /// Standalone SVG scaled to its container.
    pub fn to_svg(&self) -> String {
        let n = self.size;
        let mut path = String::new();
        for y in 0..n {
            for x in 0..n {
                if self.is_dark(x, y) {
                    path.push_str(&format!("M{} {}h1v1h-1z", x, y));
                }
            }
        }
        format!(
            concat!(
                r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {n} {n}" "##,
                r##"width="100%" height="100%" preserveAspectRatio="none" shape-rendering="crispEdges">"##,
                r##"<rect width="{n}" height="{n}" fill="#ffffff"/>"##,
                r##"<path d="{path}" fill="#000000"/></svg>"##
            ),
            n = n,
            path = path
        )
    }
}

/// Text shown in place of a symbol that could not be encoded.
pub fn placeholder_text(value: &str) -> String {
    format!("QR: {}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_with_margin() {
        let symbol = QrSymbol::encode("EMP-0042").unwrap();
        // Version 1 is 21 modules; plus one module each side
        assert_eq!(symbol.size(), 23);
        for i in 0..symbol.size() {
            assert!(!symbol.is_dark(i, 0));
            assert!(!symbol.is_dark(0, i));
        }
        // Finder pattern corner
        assert!(symbol.is_dark(1, 1));
    }

    #[test]
    fn test_empty_payload_substituted() {
        let symbol = QrSymbol::encode("").unwrap();
        assert_eq!(symbol, QrSymbol::encode(" ").unwrap());
    }

    #[test]
    fn test_oversized_payload_fails() {
        let data = "x".repeat(5000);
        assert!(matches!(QrSymbol::encode(&data), Err(QrError::Encode(_))));
    }

    #[test]
    fn test_svg() {
        let svg = QrSymbol::encode("A").unwrap().to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 23 23""#));
        assert!(svg.contains("M1 1h1v1h-1z"));
    }

    #[tokio::test]
    async fn test_encode_async() {
        let symbol = QrSymbol::encode_async("async".into()).await.unwrap();
        assert_eq!(symbol, QrSymbol::encode("async").unwrap());
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder_text("123"), "QR: 123");
    }
}
