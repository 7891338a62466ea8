//! Raster painter for the capture target.
//!
//! Paints a [`LiveFace`] onto an RGBA canvas at canvas resolution
//! (96 DPI × display scale). Images arrive already decoded; anything the
//! caller could not load is simply left out, matching a broken image in
//! the editor.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;

use super::font::GlyphCache;
use super::images::{ImageSrc, data_uri};
use super::qr::{QrSymbol, placeholder_text};
use super::{Content, LiveFace, LiveNode, LINE_HEIGHT};
use crate::document::{Align, ImageFit, Style, Weight, parse_hex_color};
use crate::error::{CardError, Result};
use crate::units::mm_to_px;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AVATAR_BG: Rgba<u8> = Rgba([228, 230, 235, 255]);
const AVATAR_FG: Rgba<u8> = Rgba([176, 181, 189, 255]);
const PLACEHOLDER_INK: Rgba<u8> = Rgba([153, 153, 153, 255]);

/// Placeholder text size in mm.
const PLACEHOLDER_TEXT_MM: f64 = 2.0;

// ============================================================================
// BITMAP
// ============================================================================

/// A captured face.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Neutral stand-in for a face whose capture failed: light grey with
    /// a border and a diagonal cross.
    pub fn placeholder(width: u32, height: u32) -> Self {
        let (w, h) = (width.max(1), height.max(1));
        let mut image = RgbaImage::from_pixel(w, h, Rgba([240, 240, 240, 255]));
        for x in 0..w {
            image.put_pixel(x, 0, PLACEHOLDER_INK);
            image.put_pixel(x, h - 1, PLACEHOLDER_INK);
        }
        for y in 0..h {
            image.put_pixel(0, y, PLACEHOLDER_INK);
            image.put_pixel(w - 1, y, PLACEHOLDER_INK);
        }
        let steps = w.max(h);
        for i in 0..steps {
            let x = (i as u64 * w as u64 / steps as u64) as u32;
            let y = (i as u64 * h as u64 / steps as u64) as u32;
            image.put_pixel(x, y, PLACEHOLDER_INK);
            image.put_pixel(w - 1 - x, y, PLACEHOLDER_INK);
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// PNG-encoded bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| CardError::Image(format!("PNG encoding failed: {}", e)))?;
        Ok(buf.into_inner())
    }

    /// `data:image/png;base64,...` form, usable as a print page image.
    pub fn to_data_uri(&self) -> Result<String> {
        Ok(data_uri("image/png", &self.to_png()?))
    }
}

// ============================================================================
// PAINTER
// ============================================================================

/// Decoded images for a paint pass, keyed by node index.
pub type NodeImages = HashMap<usize, DynamicImage>;

/// Paint `face` onto a fresh white canvas.
pub fn paint(face: &LiveFace, background: Option<&DynamicImage>, images: &NodeImages) -> Bitmap {
    let (w, h) = face.pixel_size();
    let mut canvas = RgbaImage::from_pixel(w, h, WHITE);

    match (&face.background, background) {
        (_, Some(img)) => {
            let fitted = img.resize_to_fill(w, h, FilterType::Triangle).to_rgba8();
            blit(&mut canvas, &fitted, 0, 0);
        }
        (Some(ImageSrc::Avatar), None) => paint_avatar(&mut canvas, 0, 0, w, h),
        _ => {}
    }

    for (index, node) in face.nodes.iter().enumerate() {
        paint_node(&mut canvas, node, images.get(&index));
    }
    Bitmap::new(canvas)
}

fn paint_node(canvas: &mut RgbaImage, node: &LiveNode, image: Option<&DynamicImage>) {
    let x = node.x.round() as i64;
    let y = node.y.round() as i64;
    let w = node.width.round().max(1.0) as u32;
    let h = node.height.round().max(1.0) as u32;

    match &node.content {
        Content::Text { text, style } => paint_text(canvas, text, style, x, y, w, h),
        Content::Image {
            src,
            fit,
            corner_radius,
        } => {
            let radius = mm_to_px(*corner_radius);
            match (image, src) {
                (Some(img), _) => {
                    let (fitted, dx, dy) = fit_image(img, w, h, *fit);
                    let mask = RoundedBox { w, h, radius };
                    blit_masked(canvas, &fitted, x + dx as i64, y + dy as i64, dx, dy, &mask);
                }
                (None, ImageSrc::Avatar) => paint_avatar(canvas, x, y, w, h),
                (None, _) => {}
            }
        }
        Content::Qr {
            symbol: Some(symbol),
            ..
        } => paint_qr(canvas, symbol, x, y, w, h),
        Content::Qr {
            value,
            symbol: None,
        } => paint_qr_placeholder(canvas, value, x, y, w, h),
    }
}

fn put(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// Source-over blend of `color` onto the canvas.
fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let alpha = color[3] as u32;
    if alpha == 0 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        dst[c] = ((color[c] as u32 * alpha + dst[c] as u32 * (255 - alpha)) / 255) as u8;
    }
    dst[3] = 255;
}

fn blit(canvas: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    for (sx, sy, px) in src.enumerate_pixels() {
        blend(canvas, x + sx as i64, y + sy as i64, *px);
    }
}

/// Rounded-rectangle clip in box-local coordinates.
struct RoundedBox {
    w: u32,
    h: u32,
    radius: f64,
}

impl RoundedBox {
    fn contains(&self, x: u32, y: u32) -> bool {
        let r = self.radius.min(self.w as f64 / 2.0).min(self.h as f64 / 2.0);
        if r <= 0.0 {
            return x < self.w && y < self.h;
        }
        let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
        let cx = px.clamp(r, self.w as f64 - r);
        let cy = py.clamp(r, self.h as f64 - r);
        (px - cx).powi(2) + (py - cy).powi(2) <= r * r
    }
}

/// Blit `src` at (x, y) whose top-left sits at (ox, oy) inside the item box.
fn blit_masked(canvas: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64, ox: u32, oy: u32, mask: &RoundedBox) {
    for (sx, sy, px) in src.enumerate_pixels() {
        if mask.contains(ox + sx, oy + sy) {
            blend(canvas, x + sx as i64, y + sy as i64, *px);
        }
    }
}

/// Scale `img` into a w×h box; returns the scaled image and its offset in
/// the box.
fn fit_image(img: &DynamicImage, w: u32, h: u32, fit: ImageFit) -> (RgbaImage, u32, u32) {
    match fit {
        ImageFit::Fill => (img.resize_exact(w, h, FilterType::Triangle).to_rgba8(), 0, 0),
        ImageFit::Cover => (img.resize_to_fill(w, h, FilterType::Triangle).to_rgba8(), 0, 0),
        ImageFit::Contain => {
            let scaled = img.resize(w, h, FilterType::Triangle).to_rgba8();
            let dx = w.saturating_sub(scaled.width()) / 2;
            let dy = h.saturating_sub(scaled.height()) / 2;
            (scaled, dx, dy)
        }
    }
}

fn paint_text(canvas: &mut RgbaImage, text: &str, style: &Style, x: i64, y: i64, w: u32, h: u32) {
    let font_px = mm_to_px(style.font_size_mm()).round().max(2.0) as usize;
    let [r, g, b] = parse_hex_color(&style.color).unwrap_or([0, 0, 0]);
    let ink = Rgba([r, g, b, 255]);
    let bold = style.weight == Weight::Bold;
    draw_line(canvas, text, font_px, ink, bold, style.align, x, y, w, h);
}

/// Single clipped line, vertically centred in the line box.
#[allow(clippy::too_many_arguments)]
fn draw_line(
    canvas: &mut RgbaImage,
    text: &str,
    font_px: usize,
    ink: Rgba<u8>,
    bold: bool,
    align: Align,
    x: i64,
    y: i64,
    w: u32,
    h: u32,
) {
    let mut glyphs = GlyphCache::new(font_px);
    let text_w = glyphs.measure(text) as i64;
    let box_w = w as i64;
    let offset = match align {
        Align::Left => 0,
        Align::Center => (box_w - text_w) / 2,
        Align::Right => box_w - text_w,
    }
    .max(0);
    let top = y + ((h as i64 - glyphs.cell_height() as i64) / 2).max(0);
    let embolden = if bold { (font_px / 12).max(1) as i64 } else { 0 };

    let mut pen = x + offset;
    for ch in text.chars() {
        let glyph = glyphs.glyph(ch);
        for gy in 0..glyph.height {
            for gx in 0..glyph.width {
                if !glyph.bits[gy * glyph.width + gx] {
                    continue;
                }
                for extra in 0..=embolden {
                    let px = pen + gx as i64 + extra;
                    if px >= x && px < x + box_w {
                        put(canvas, px, top + gy as i64, ink);
                    }
                }
            }
        }
        pen += glyph.width as i64;
        if pen >= x + box_w {
            break;
        }
    }
}

fn paint_qr(canvas: &mut RgbaImage, symbol: &QrSymbol, x: i64, y: i64, w: u32, h: u32) {
    let n = symbol.size() as u64;
    for by in 0..h {
        for bx in 0..w {
            let mx = (bx as u64 * n / w as u64) as usize;
            let my = (by as u64 * n / h as u64) as usize;
            let color = if symbol.is_dark(mx, my) {
                Rgba([0, 0, 0, 255])
            } else {
                WHITE
            };
            put(canvas, x + bx as i64, y + by as i64, color);
        }
    }
}

fn paint_qr_placeholder(canvas: &mut RgbaImage, value: &str, x: i64, y: i64, w: u32, h: u32) {
    let (w64, h64) = (w as i64, h as i64);
    for i in 0..w64.max(h64) {
        if (i / 4) % 2 == 1 {
            continue;
        }
        if i < w64 {
            put(canvas, x + i, y, PLACEHOLDER_INK);
            put(canvas, x + i, y + h64 - 1, PLACEHOLDER_INK);
        }
        if i < h64 {
            put(canvas, x, y + i, PLACEHOLDER_INK);
            put(canvas, x + w64 - 1, y + i, PLACEHOLDER_INK);
        }
    }
    let font_px = mm_to_px(PLACEHOLDER_TEXT_MM).round() as usize;
    let line_h = (font_px as f64 * LINE_HEIGHT).round() as u32;
    draw_line(
        canvas,
        &placeholder_text(value),
        font_px,
        PLACEHOLDER_INK,
        false,
        Align::Left,
        x + 2,
        y + 2,
        w.saturating_sub(4),
        line_h.min(h),
    );
}

/// Procedural version of the bundled avatar SVG (100×120 viewBox).
fn paint_avatar(canvas: &mut RgbaImage, x: i64, y: i64, w: u32, h: u32) {
    let sx = w as f64 / 100.0;
    let sy = h as f64 / 120.0;
    for by in 0..h {
        for bx in 0..w {
            let vx = (bx as f64 + 0.5) / sx;
            let vy = (by as f64 + 0.5) / sy;
            let head = (vx - 50.0).powi(2) + (vy - 44.0).powi(2) <= 22.0 * 22.0;
            let body = vy >= 78.0 && ((vx - 50.0) / 40.0).powi(2) + ((vy - 120.0) / 42.0).powi(2) <= 1.0;
            let color = if head || body { AVATAR_FG } else { AVATAR_BG };
            put(canvas, x + bx as i64, y + by as i64, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FaceKind, ItemId};

    fn face(nodes: Vec<LiveNode>) -> LiveFace {
        LiveFace {
            kind: FaceKind::Front,
            width: 100.0,
            height: 60.0,
            background: None,
            nodes,
        }
    }

    fn node(content: Content, x: f64, y: f64, w: f64, h: f64) -> LiveNode {
        LiveNode {
            item: ItemId::from("n"),
            x,
            y,
            width: w,
            height: h,
            selected: false,
            content,
        }
    }

    fn is_white(p: &Rgba<u8>) -> bool {
        p.0 == [255, 255, 255, 255]
    }

    #[test]
    fn test_blank_face_is_white() {
        let bitmap = paint(&face(vec![]), None, &NodeImages::new());
        assert_eq!((bitmap.width(), bitmap.height()), (100, 60));
        assert!(bitmap.as_image().pixels().all(is_white));
    }

    #[test]
    fn test_text_is_clipped_to_box() {
        let style = Style {
            font_size: 8.0,
            color: "#ff0000".into(),
            ..Style::default()
        };
        let text = node(
            Content::Text {
                text: "WWWWWWWWWWWWWWWW".into(),
                style,
            },
            10.0,
            10.0,
            30.0,
            40.0,
        );
        let bitmap = paint(&face(vec![text]), None, &NodeImages::new());
        let img = bitmap.as_image();
        assert!(img.pixels().any(|p| p.0 == [255, 0, 0, 255]));
        for (x, _, p) in img.enumerate_pixels() {
            if !is_white(p) {
                assert!((10..40).contains(&x), "ink outside box at x={}", x);
            }
        }
    }

    #[test]
    fn test_qr_paints_modules() {
        let symbol = QrSymbol::encode("QR").unwrap();
        let qr = node(
            Content::Qr {
                value: "QR".into(),
                symbol: Some(symbol),
            },
            0.0,
            0.0,
            46.0,
            46.0,
        );
        let bitmap = paint(&face(vec![qr]), None, &NodeImages::new());
        let img = bitmap.as_image();
        // Quiet zone is white, finder pattern corner is black
        assert!(is_white(img.get_pixel(0, 0)));
        assert_eq!(img.get_pixel(3, 3).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_image_fit_and_radius() {
        let red = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let image = node(
            Content::Image {
                src: ImageSrc::Url("/x.png".into()),
                fit: ImageFit::Fill,
                corner_radius: 2.0,
            },
            20.0,
            10.0,
            40.0,
            40.0,
        );
        let mut images = NodeImages::new();
        images.insert(0, red);
        let bitmap = paint(&face(vec![image]), None, &images);
        let img = bitmap.as_image();
        assert_eq!(img.get_pixel(40, 30).0, [255, 0, 0, 255]);
        // Rounded corner stays white
        assert!(is_white(img.get_pixel(20, 10)));
    }

    #[test]
    fn test_avatar_painted_without_image() {
        let avatar = node(
            Content::Image {
                src: ImageSrc::Avatar,
                fit: ImageFit::Cover,
                corner_radius: 0.0,
            },
            0.0,
            0.0,
            50.0,
            60.0,
        );
        let bitmap = paint(&face(vec![avatar]), None, &NodeImages::new());
        assert_eq!(bitmap.as_image().get_pixel(1, 1).0, AVATAR_BG.0);
        assert_eq!(bitmap.as_image().get_pixel(25, 22).0, AVATAR_FG.0);
    }

    #[test]
    fn test_png_export() {
        let bitmap = Bitmap::placeholder(8, 4);
        let png = bitmap.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert!(bitmap.to_data_uri().unwrap().starts_with("data:image/png;base64,"));
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }
}
