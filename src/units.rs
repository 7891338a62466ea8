//! # Coordinate & Unit Conversion
//!
//! Card geometry is stored in millimetres. The interactive canvas and the
//! capture bitmap work in pixels at 96 DPI multiplied by a fixed display
//! scale of 2.
//!
//! ## Calculations
//!
//! ```text
//! px_per_mm = 96 / 25.4 ≈ 3.7795
//! canvas px = mm × px_per_mm × DISPLAY_SCALE
//!
//! For a CR80 card (53.98 × 85.6 mm):
//!   canvas = 408 × 647 px
//! ```
//!
//! ## Persisted scale
//!
//! Font sizes, label box widths and image sizes are persisted at twice the
//! value the editor shows. [`to_ui`] and [`to_persisted`] apply that factor at
//! the editing boundary and [`persisted_to_mm`] yields the physical size the
//! renderers draw. Nothing else in the crate touches the factor.

/// Pixels per millimetre at 96 DPI.
pub const PX_PER_MM_96DPI: f64 = 96.0 / 25.4;

/// Fixed display scale of the editing canvas.
pub const DISPLAY_SCALE: f64 = 2.0;

/// Pixels per millimetre on the editing canvas and in captured bitmaps.
pub const PX_PER_MM: f64 = PX_PER_MM_96DPI * DISPLAY_SCALE;

/// Factor between persisted size fields and the values shown in the editor.
pub const PERSISTED_SCALE: f64 = 2.0;

/// Convert millimetres to canvas pixels.
pub fn mm_to_px(mm: f64) -> f64 {
    mm * PX_PER_MM
}

/// Convert canvas pixels to millimetres.
pub fn px_to_mm(px: f64) -> f64 {
    px / PX_PER_MM
}

/// Persisted size field → value shown in the editor.
pub fn to_ui(persisted: f64) -> f64 {
    persisted / PERSISTED_SCALE
}

/// Value typed into the editor → persisted size field.
pub fn to_persisted(ui: f64) -> f64 {
    ui * PERSISTED_SCALE
}

/// Persisted size field → physical millimetres on the printed card.
pub fn persisted_to_mm(persisted: f64) -> f64 {
    to_ui(persisted)
}

/// Format a millimetre value for CSS (`12.5mm`), trimming float noise.
pub fn css_mm(mm: f64) -> String {
    let rounded = (mm * 1000.0).round() / 1000.0;
    format!("{}mm", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * a.abs().max(1.0)
    }

    #[test]
    fn test_round_trips() {
        for x in [0.0, 0.5, 1.0, 3.0, 53.98, 85.6, 1234.5678, 1e6] {
            assert!(close(mm_to_px(px_to_mm(x)), x), "px round trip for {}", x);
            assert!(close(px_to_mm(mm_to_px(x)), x), "mm round trip for {}", x);
        }
    }

    #[test]
    fn test_known_values() {
        assert!(close(mm_to_px(25.4), 192.0));
        assert!(close(px_to_mm(192.0), 25.4));
        assert_eq!(mm_to_px(0.0), 0.0);
    }

    #[test]
    fn test_persisted_scale() {
        assert_eq!(to_ui(16.0), 8.0);
        assert_eq!(to_persisted(8.0), 16.0);
        assert_eq!(to_persisted(to_ui(7.3)), 7.3);
        assert_eq!(persisted_to_mm(50.0), 25.0);
    }

    #[test]
    fn test_css_mm() {
        assert_eq!(css_mm(10.0), "10mm");
        assert_eq!(css_mm(4.25), "4.25mm");
        assert_eq!(css_mm(0.1 + 0.2), "0.3mm");
    }
}
