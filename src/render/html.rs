//! Preview/print target: static markup positioned in mm.
//!
//! Output targets print media, so every length is written in CSS `mm`
//! straight from the document model with no pixel conversion.

use super::qr::placeholder_text;
use super::{Content, PreparedFace, PreparedItem, LINE_HEIGHT};
use crate::document::Style;
use crate::units::css_mm;

/// Markup for one face: a relatively positioned container holding
/// absolutely positioned items in paint order.
pub fn face_markup(face: &PreparedFace) -> String {
    let mut style = format!(
        "position:relative;overflow:hidden;width:{};height:{};background-color:#ffffff;",
        css_mm(face.width),
        css_mm(face.height)
    );
    if let Some(background) = &face.background {
        style.push_str(&format!(
            "background-image:url('{}');background-size:cover;background-position:center;",
            escape_attr(&css_url(&background.to_markup_src()))
        ));
    }

    let mut out = format!(
        r#"<div class="card-face" data-face="{}" style="{}">"#,
        face.kind.as_str(),
        style
    );
    for item in &face.items {
        out.push_str(&item_markup(item));
    }
    out.push_str("</div>");
    out
}

/// Markup for a single item.
pub fn item_markup(item: &PreparedItem) -> String {
    let position = format!(
        "position:absolute;top:{};left:{};",
        css_mm(item.top),
        css_mm(item.left)
    );
    let id = escape_attr(item.id.as_str());

    match &item.content {
        Content::Text { text, style } => format!(
            r#"<div class="card-item card-text" data-item="{}" style="{}{}">{}</div>"#,
            id,
            position,
            text_css(style, item.width),
            escape_html(text)
        ),
        Content::Image {
            src,
            fit,
            corner_radius,
        } => format!(
            r#"<img class="card-item card-image" data-item="{}" src="{}" alt="" style="{}width:{};height:{};object-fit:{};border-radius:{};">"#,
            id,
            escape_attr(&src.to_markup_src()),
            position,
            css_mm(item.width),
            css_mm(item.height),
            fit.as_css(),
            css_mm(*corner_radius)
        ),
        Content::Qr {
            symbol: Some(symbol),
            ..
        } => format!(
            r#"<div class="card-item card-qr" data-item="{}" style="{}width:{};height:{};">{}</div>"#,
            id,
            position,
            css_mm(item.width),
            css_mm(item.height),
            symbol.to_svg()
        ),
        Content::Qr {
            value,
            symbol: None,
        } => format!(
            r#"<div class="card-item card-qr-placeholder" data-item="{}" style="{}width:{};height:{};box-sizing:border-box;border:0.2mm dashed #999999;font-size:2mm;overflow:hidden;word-break:break-all;">{}</div>"#,
            id,
            position,
            css_mm(item.width),
            css_mm(item.height),
            escape_html(&placeholder_text(value))
        ),
    }
}

fn text_css(style: &Style, width: f64) -> String {
    format!(
        "width:{};font-size:{};line-height:{};color:{};font-family:'{}';font-weight:{};text-align:{};white-space:nowrap;overflow:hidden;",
        css_mm(width),
        css_mm(style.font_size_mm()),
        LINE_HEIGHT,
        css_color(&style.color),
        css_font_family(&style.font_family),
        style.weight.as_css(),
        style.align.as_css()
    )
}

/// Percent-encode the characters that could end a quoted CSS `url()`.
fn css_url(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for c in src.chars() {
        match c {
            '\'' => out.push_str("%27"),
            '"' => out.push_str("%22"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '\\' => out.push_str("%5C"),
            c if c.is_whitespace() || c.is_control() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", b));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Normalized `#rrggbb`; anything unparseable renders black.
fn css_color(color: &str) -> String {
    let [r, g, b] = crate::document::parse_hex_color(color).unwrap_or([0, 0, 0]);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Font family safe to place inside single quotes in a style attribute.
fn css_font_family(family: &str) -> String {
    family
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '<' | '>' | '\\' | '&'))
        .collect()
}

/// Escape text content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value (double- or single-quoted).
pub fn escape_attr(s: &str) -> String {
    escape_html(s).replace('"', "&quot;").replace('\'', "&#39;")
}
