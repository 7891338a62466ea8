//! # Print Composer
//!
//! Orders rendered faces of many records into a duplex-correct page
//! sequence and wraps it in a printable HTML document.
//!
//! ```text
//! record 1 ─► FRONT(1), BACK(1)
//! record 2 ─► FRONT(2)            (single-sided: no BACK page)
//! record 3 ─► FRONT(3), BACK(3)
//! ```
//!
//! Duplex printers pair pages strictly by position, so the order is never
//! rearranged and no page break follows the last page.
//!
//! The image-only mode ([`compose_image_pages`]) reprints bitmaps produced by
//! [`capture_batch`] without touching templates or records again.

use tracing::info;

use crate::document::{DEFAULT_HEIGHT_MM, DEFAULT_WIDTH_MM, FaceKind, Template};
use crate::fields::BindingContext;
use crate::render::html::escape_attr;
use crate::render::{Bitmap, Renderer};
use crate::units::css_mm;

/// Delay between opening the print dialog and closing the window.
pub const PRINT_CLOSE_DELAY_MS: u32 = 500;

/// One record to print: its template and binding context.
#[derive(Debug, Clone)]
pub struct PrintRecord {
    pub template: Template,
    pub context: Option<BindingContext>,
}

impl PrintRecord {
    pub fn new(template: Template, context: Option<BindingContext>) -> Self {
        Self { template, context }
    }
}

/// One printed page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Index of the source record; `None` for image-only pages.
    pub record: Option<usize>,
    pub face: Option<FaceKind>,
    pub width: f64,
    pub height: f64,
    /// Inner markup of the page.
    pub body: String,
}

/// Ordered pages, ready to print.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSequence {
    pages: Vec<Page>,
}

/// Duplex page order: (record index, face) for every page.
pub fn page_order<'a>(templates: impl IntoIterator<Item = &'a Template>) -> Vec<(usize, FaceKind)> {
    templates
        .into_iter()
        .enumerate()
        .flat_map(|(index, template)| {
            template
                .faces()
                .into_iter()
                .map(move |(kind, _)| (index, kind))
        })
        .collect()
}

/// Render every record's faces as HTML pages in duplex order.
pub async fn compose_pages(renderer: &Renderer, records: &[PrintRecord]) -> PageSequence {
    let mut pages = Vec::new();
    for (index, kind) in page_order(records.iter().map(|r| &r.template)) {
        let record = &records[index];
        let Some(face) = record.template.face(kind) else {
            continue;
        };
        let body = renderer
            .preview_markup(kind, face, record.context.as_ref())
            .await;
        pages.push(Page {
            record: Some(index),
            face: Some(kind),
            width: face.width,
            height: face.height,
            body,
        });
    }
    info!(records = records.len(), pages = pages.len(), "composed print pages");
    PageSequence { pages }
}

/// One page per pre-rasterized image (URL or `data:` URI), in order.
pub fn compose_image_pages(images: &[String], width: f64, height: f64) -> PageSequence {
    let pages = images
        .iter()
        .map(|src| Page {
            record: None,
            face: None,
            width,
            height,
            body: format!(
                r#"<img class="print-image" src="{}" alt="" style="display:block;width:100%;height:100%;">"#,
                escape_attr(src)
            ),
        })
        .collect();
    PageSequence { pages }
}

/// A captured face from [`capture_batch`].
#[derive(Debug, Clone)]
pub struct CapturedFace {
    pub record: usize,
    pub face: FaceKind,
    /// Physical page size in mm.
    pub width: f64,
    pub height: f64,
    pub bitmap: Bitmap,
}

/// Capture every record's faces in duplex order.
///
/// Strictly sequential: each capture completes before the next starts, so
/// at most one offscreen bitmap is being produced at a time.
pub async fn capture_batch(renderer: &Renderer, records: &[PrintRecord]) -> Vec<CapturedFace> {
    let mut out = Vec::new();
    for (index, kind) in page_order(records.iter().map(|r| &r.template)) {
        let record = &records[index];
        let Some(face) = record.template.face(kind) else {
            continue;
        };
        let bitmap = renderer
            .capture_face(kind, face, record.context.as_ref())
            .await;
        out.push(CapturedFace {
            record: index,
            face: kind,
            width: face.width,
            height: face.height,
            bitmap,
        });
    }
    info!(records = records.len(), faces = out.len(), "captured print batch");
    out
}

impl PageSequence {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Standalone print document.
    ///
    /// `@page` takes the first page's size. Every page but the last carries a
    /// page break. The embedded script opens the print dialog on load and
    /// closes the window shortly after.
    pub fn to_html(&self) -> String {
        let (width, height) = self
            .pages
            .first()
            .map(|p| (p.width, p.height))
            .unwrap_or((DEFAULT_WIDTH_MM, DEFAULT_HEIGHT_MM));

        let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Print</title>\n<style>\n");
        out.push_str(&format!(
            "@page {{ size: {} {}; margin: 0; }}\n",
            css_mm(width),
            css_mm(height)
        ));
        out.push_str("html, body { margin: 0; padding: 0; }\n");
        out.push_str(".print-page { position: relative; overflow: hidden; }\n");
        out.push_str("</style>\n</head>\n<body>\n");

        let last = self.pages.len().saturating_sub(1);
        for (i, page) in self.pages.iter().enumerate() {
            let brk = if i < last { "page-break-after:always;" } else { "" };
            let face = page
                .face
                .map(|f| format!(r#" data-face="{}""#, f.as_str()))
                .unwrap_or_default();
            out.push_str(&format!(
                "<div class=\"print-page\"{} style=\"width:{};height:{};{}\">{}</div>\n",
                face,
                css_mm(page.width),
                css_mm(page.height),
                brk,
                page.body
            ));
        }

        out.push_str(&format!(
            "<script>window.addEventListener('load', function () {{ window.print(); setTimeout(function () {{ window.close(); }}, {}); }});</script>\n",
            PRINT_CLOSE_DELAY_MS
        ));
        out.push_str("</body>\n</html>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FixedText, ItemKind, Side};
    use crate::fields::FieldCatalog;
    use crate::render::RenderContext;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn template(name: &str, side: Side) -> Template {
        let mut t = Template::new(name);
        t.front.add(ItemKind::FixedText(FixedText::new(format!("{} front", name))));
        t.set_side(side);
        if let Some(back) = t.back_mut() {
            back.add(ItemKind::FixedText(FixedText::new(format!("{} back", name))));
        }
        t
    }

    fn renderer() -> Renderer {
        let context = RenderContext::new("http://127.0.0.1:9", None).unwrap();
        Renderer::new(Arc::new(FieldCatalog::standard(None)), Arc::new(context))
    }

    #[test]
    fn test_duplex_order() {
        let a = template("a", Side::Multi);
        let b = template("b", Side::Single);
        let c = template("c", Side::Multi);
        assert_eq!(
            page_order([&a, &b, &c]),
            vec![
                (0, FaceKind::Front),
                (0, FaceKind::Back),
                (1, FaceKind::Front),
                (2, FaceKind::Front),
                (2, FaceKind::Back),
            ]
        );
    }

    #[tokio::test]
    async fn test_compose_pages() {
        let records = vec![
            PrintRecord::new(template("a", Side::Multi), None),
            PrintRecord::new(template("b", Side::Single), None),
        ];
        let pages = compose_pages(&renderer(), &records).await;
        let faces: Vec<_> = pages.pages().iter().map(|p| (p.record, p.face)).collect();
        assert_eq!(
            faces,
            vec![
                (Some(0), Some(FaceKind::Front)),
                (Some(0), Some(FaceKind::Back)),
                (Some(1), Some(FaceKind::Front)),
            ]
        );
        assert!(pages.pages()[1].body.contains("a back"));

        let html = pages.to_html();
        assert_eq!(html.matches("class=\"print-page\"").count(), 3);
        assert_eq!(html.matches("page-break-after:always").count(), 2);
        let last = html.rfind("class=\"print-page\"").unwrap();
        assert!(!html[last..].contains("page-break-after"));
        assert!(html.contains("@page { size: 53.98mm 85.6mm; margin: 0; }"));
        assert!(html.contains("window.print()"));
        assert!(html.contains("}, 500);"));
    }

    #[test]
    fn test_image_pages() {
        let images = vec!["data:image/png;base64,AA".to_string(), "/c/2.png".to_string()];
        let pages = compose_image_pages(&images, 53.98, 85.6);
        assert_eq!(pages.len(), 2);
        assert!(pages.pages()[0].body.contains(r#"src="data:image/png;base64,AA""#));
        assert_eq!(pages.to_html().matches("page-break-after:always").count(), 1);
    }

    #[test]
    fn test_empty_sequence() {
        let html = PageSequence::default().to_html();
        assert!(!html.contains("print-page\""));
        assert!(html.contains("@page"));
    }

    #[tokio::test]
    async fn test_capture_batch_order() {
        let records = vec![
            PrintRecord::new(template("a", Side::Single), None),
            PrintRecord::new(template("b", Side::Multi), None),
        ];
        let captured = capture_batch(&renderer(), &records).await;
        let order: Vec<_> = captured.iter().map(|c| (c.record, c.face)).collect();
        assert_eq!(
            order,
            vec![(0, FaceKind::Front), (1, FaceKind::Front), (1, FaceKind::Back)]
        );
        assert!(captured.iter().all(|c| c.bitmap.width() == 408));
    }
}
