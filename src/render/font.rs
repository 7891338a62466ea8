//! Glyph generation for raster capture.
//!
//! Uses the Spleen 12x24 bitmap font, scaled nearest-neighbour to the
//! requested pixel height. Glyph cells are half as wide as they are tall.

use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;

const SRC_W: usize = 12;
const SRC_H: usize = 24;

/// One scaled glyph; `bits` is row-major, `true` = ink.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub width: usize,
    pub height: usize,
    pub bits: Vec<bool>,
}

/// Glyphs for one pixel size, generated on first use.
pub struct GlyphCache {
    height: usize,
    glyphs: HashMap<char, Glyph>,
}

impl GlyphCache {
    /// Cache producing glyphs `height` pixels tall (minimum 2).
    pub fn new(height: usize) -> Self {
        Self {
            height: height.max(2),
            glyphs: HashMap::new(),
        }
    }

    pub fn cell_width(&self) -> usize {
        (self.height / 2).max(1)
    }

    pub fn cell_height(&self) -> usize {
        self.height
    }

    /// Advance width of `text` in pixels.
    pub fn measure(&self, text: &str) -> usize {
        text.chars().count() * self.cell_width()
    }

    pub fn glyph(&mut self, ch: char) -> &Glyph {
        let (w, h) = (self.cell_width(), self.height);
        self.glyphs
            .entry(ch)
            .or_insert_with(|| generate_glyph(ch, w, h))
    }
}

fn generate_glyph(ch: char, width: usize, height: usize) -> Glyph {
    let mut glyph = Glyph {
        width,
        height,
        bits: vec![false; width * height],
    };
    if ch.is_whitespace() {
        return glyph;
    }

    let mut src = vec![false; SRC_W * SRC_H];
    let utf8 = ch.to_string();
    let found = match PSF2Font::new(FONT_12X24).ok() {
        Some(mut font) => match font.glyph_for_utf8(utf8.as_bytes()) {
            Some(spleen_glyph) => {
                for (row_y, row) in spleen_glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if row_y < SRC_H && col_x < SRC_W {
                            src[row_y * SRC_W + col_x] = on;
                        }
                    }
                }
                true
            }
            None => false,
        },
        None => false,
    };

    if found {
        scale_bitmap(&src, SRC_W, SRC_H, &mut glyph.bits, width, height);
    } else {
        draw_box(&mut glyph.bits, width, height);
    }
    glyph
}

/// Nearest-neighbour scale from src dimensions to dst dimensions.
fn scale_bitmap(src: &[bool], src_w: usize, src_h: usize, dst: &mut [bool], dst_w: usize, dst_h: usize) {
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            let sy = dy * src_h / dst_h;
            if let (Some(s), Some(d)) = (src.get(sy * src_w + sx), dst.get_mut(dy * dst_w + dx)) {
                *d = *s;
            }
        }
    }
}

/// Outline box for characters the font lacks.
fn draw_box(bits: &mut [bool], width: usize, height: usize) {
    if width == 0 || height == 0 {
        return;
    }
    for x in 0..width {
        bits[x] = true;
        bits[(height - 1) * width + x] = true;
    }
    for y in 0..height {
        bits[y * width] = true;
        bits[y * width + width - 1] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_has_ink() {
        let mut cache = GlyphCache::new(24);
        let glyph = cache.glyph('A');
        assert_eq!((glyph.width, glyph.height), (12, 24));
        assert!(glyph.bits.iter().any(|&b| b));
    }

    #[test]
    fn test_scaled_glyph() {
        let mut cache = GlyphCache::new(48);
        let glyph = cache.glyph('H').clone();
        assert_eq!(glyph.bits.len(), 24 * 48);
        assert!(glyph.bits.iter().any(|&b| b));
        assert_eq!(cache.measure("Hi!"), 72);
    }

    #[test]
    fn test_space_is_blank() {
        let mut cache = GlyphCache::new(16);
        assert!(cache.glyph(' ').bits.iter().all(|&b| !b));
    }
}
