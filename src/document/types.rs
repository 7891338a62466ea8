//! Item payload types for the card document model.
//!
//! All types derive `Serialize + Deserialize` so the same structs are the
//! Rust API and the persisted JSON form.
//!
//! Each payload implements [`ItemMeta`] to declare its display label and
//! editor default. Size fields marked "persisted 2×" hold twice the value the
//! editor shows; use the accessor methods (which go through [`crate::units`])
//! instead of reading them raw when drawing.

use serde::{Deserialize, Serialize};

use crate::units;

/// Metadata that every item payload must provide.
///
/// The label and editor default live next to each struct definition, so
/// adding a new item type is self-contained: implement this trait and the
/// compiler will point at the remaining exhaustive matches in `ItemKind`.
pub trait ItemMeta: Sized {
    /// Human-readable display label (e.g. "Bound Label", "QR Code").
    fn label() -> &'static str;

    /// Starter value used when the editor adds a new item of this type.
    fn editor_default() -> Self;
}

// ============================================================================
// STYLE
// ============================================================================

/// Text case transformation applied at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    #[serde(alias = "uppercase")]
    Upper,
    #[serde(alias = "lowercase")]
    Lower,
    Capitalize,
}

/// Horizontal alignment of a label inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Font weight of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weight {
    #[default]
    Normal,
    Bold,
}

impl Weight {
    pub fn as_css(self) -> &'static str {
        match self {
            Weight::Normal => "normal",
            Weight::Bold => "bold",
        }
    }
}

/// How an image fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

impl ImageFit {
    pub fn as_css(self) -> &'static str {
        match self {
            ImageFit::Cover => "cover",
            ImageFit::Contain => "contain",
            ImageFit::Fill => "fill",
        }
    }
}

fn default_color() -> String {
    "#000000".into()
}

fn default_font_size() -> f64 {
    8.0
}

fn default_font_family() -> String {
    "Arial".into()
}

fn default_box_width() -> f64 {
    80.0
}

/// Text style shared by fixed text and bound labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// CSS hex color, `#rrggbb` or `#rgb`.
    #[serde(default = "default_color")]
    pub color: String,
    /// Font size in mm, persisted 2×.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub text_transform: TextTransform,
    /// Label box width in mm, persisted 2×.
    #[serde(default = "default_box_width", rename = "width")]
    pub box_width: f64,
    #[serde(default)]
    pub align: Align,
    #[serde(default, rename = "fontWeight")]
    pub weight: Weight,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: default_color(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            text_transform: TextTransform::None,
            box_width: default_box_width(),
            align: Align::Left,
            weight: Weight::Normal,
        }
    }
}

impl Style {
    /// Font size as shown in the editor.
    pub fn ui_font_size(&self) -> f64 {
        units::to_ui(self.font_size)
    }

    /// Set the font size from an editor value.
    pub fn set_ui_font_size(&mut self, value: f64) {
        self.font_size = units::to_persisted(value);
    }

    /// Box width as shown in the editor.
    pub fn ui_box_width(&self) -> f64 {
        units::to_ui(self.box_width)
    }

    /// Set the box width from an editor value.
    pub fn set_ui_box_width(&mut self, value: f64) {
        self.box_width = units::to_persisted(value);
    }

    /// Physical font size on the card.
    pub fn font_size_mm(&self) -> f64 {
        units::persisted_to_mm(self.font_size)
    }

    /// Physical label box width on the card.
    pub fn box_width_mm(&self) -> f64 {
        units::persisted_to_mm(self.box_width)
    }

    /// Parse `color` into RGB. Malformed colors fall back to black.
    pub fn rgb(&self) -> [u8; 3] {
        parse_hex_color(&self.color).unwrap_or([0, 0, 0])
    }
}

/// Parse `#rrggbb` / `#rgb` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    match digits.as_slice() {
        [r, g, b] => Some([r * 17, g * 17, b * 17]),
        [r1, r2, g1, g2, b1, b2] => Some([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2]),
        _ => None,
    }
}

// ============================================================================
// ITEM PAYLOADS
// ============================================================================

/// Static text typed by the template author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FixedText {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: Style,
}

impl ItemMeta for FixedText {
    fn label() -> &'static str { "Text" }
    fn editor_default() -> Self {
        Self { text: "Text".into(), ..Default::default() }
    }
}

impl FixedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Single-line label bound to a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BoundLabel {
    #[serde(default)]
    pub field_path: String,
    #[serde(default)]
    pub style: Style,
}

impl ItemMeta for BoundLabel {
    fn label() -> &'static str { "Field" }
    fn editor_default() -> Self {
        Self { field_path: "FullName".into(), ..Default::default() }
    }
}

impl BoundLabel {
    pub fn new(field_path: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            ..Default::default()
        }
    }
}

fn default_image_width() -> f64 {
    50.0
}

fn default_image_height() -> f64 {
    60.0
}

/// Photo looked up from the record's picture id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicImage {
    #[serde(default)]
    pub field_path: String,
    /// Width in mm, persisted 2×.
    #[serde(default = "default_image_width")]
    pub width: f64,
    /// Height in mm, persisted 2×.
    #[serde(default = "default_image_height")]
    pub height: f64,
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default)]
    pub corner_radius: f64,
}

impl Default for DynamicImage {
    fn default() -> Self {
        Self {
            field_path: String::new(),
            width: default_image_width(),
            height: default_image_height(),
            fit: ImageFit::Cover,
            corner_radius: 0.0,
        }
    }
}

impl ItemMeta for DynamicImage {
    fn label() -> &'static str { "Photo" }
    fn editor_default() -> Self {
        Self { field_path: "Employee.PictureID".into(), ..Default::default() }
    }
}

impl DynamicImage {
    /// Physical (width, height) on the card.
    pub fn size_mm(&self) -> (f64, f64) {
        (
            units::persisted_to_mm(self.width),
            units::persisted_to_mm(self.height),
        )
    }
}

/// Image embedded in the template itself (logo, signature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedImage {
    /// Inline `data:` URI.
    #[serde(default)]
    pub image: String,
    /// Width in mm, persisted 2×.
    #[serde(default = "default_image_width")]
    pub width: f64,
    /// Height in mm, persisted 2×.
    #[serde(default = "default_image_height")]
    pub height: f64,
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default)]
    pub corner_radius: f64,
}

impl Default for FixedImage {
    fn default() -> Self {
        Self {
            image: String::new(),
            width: default_image_width(),
            height: default_image_height(),
            fit: ImageFit::Contain,
            corner_radius: 0.0,
        }
    }
}

impl ItemMeta for FixedImage {
    fn label() -> &'static str { "Image" }
    fn editor_default() -> Self {
        Self::default()
    }
}

impl FixedImage {
    /// Physical (width, height) on the card.
    pub fn size_mm(&self) -> (f64, f64) {
        (
            units::persisted_to_mm(self.width),
            units::persisted_to_mm(self.height),
        )
    }
}

fn default_barcode_size() -> f64 {
    40.0
}

/// QR symbol encoding a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barcode {
    #[serde(default)]
    pub field_path: String,
    /// Width in mm, persisted 2×.
    #[serde(default = "default_barcode_size")]
    pub width: f64,
    /// Height in mm, persisted 2×.
    #[serde(default = "default_barcode_size")]
    pub height: f64,
}

impl Default for Barcode {
    fn default() -> Self {
        Self {
            field_path: String::new(),
            width: default_barcode_size(),
            height: default_barcode_size(),
        }
    }
}

impl ItemMeta for Barcode {
    fn label() -> &'static str { "QR Code" }
    fn editor_default() -> Self {
        Self { field_path: "CardCode".into(), ..Default::default() }
    }
}

impl Barcode {
    pub fn new(field_path: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            ..Default::default()
        }
    }

    /// Physical (width, height) on the card.
    pub fn size_mm(&self) -> (f64, f64) {
        (
            units::persisted_to_mm(self.width),
            units::persisted_to_mm(self.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex_color("#fff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("00ff00"), Some([0, 255, 0]));
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_style_defaults_from_empty_json() {
        let style: Style = serde_json::from_str("{}").unwrap();
        assert_eq!(style, Style::default());
    }

    #[test]
    fn test_style_ui_boundary() {
        let mut style = Style::default();
        style.set_ui_font_size(5.0);
        assert_eq!(style.font_size, 10.0);
        assert_eq!(style.ui_font_size(), 5.0);
        assert_eq!(style.font_size_mm(), 5.0);
        style.set_ui_box_width(30.0);
        assert_eq!(style.box_width, 60.0);
    }

    #[test]
    fn test_style_json_keys() {
        let json = r##"{"color":"#112233","fontSize":12,"fontFamily":"Verdana",
            "textTransform":"uppercase","width":40,"align":"center","fontWeight":"bold"}"##;
        let style: Style = serde_json::from_str(json).unwrap();
        assert_eq!(style.text_transform, TextTransform::Upper);
        assert_eq!(style.align, Align::Center);
        assert_eq!(style.weight, Weight::Bold);
        assert_eq!(style.box_width, 40.0);
        assert_eq!(style.rgb(), [0x11, 0x22, 0x33]);
    }

    #[test]
    fn test_image_size_mm() {
        let img = DynamicImage { width: 40.0, height: 50.0, ..Default::default() };
        assert_eq!(img.size_mm(), (20.0, 25.0));
    }
}
