//! # Rendering Pipeline
//!
//! Turns a [`Face`] plus an optional [`BindingContext`] into one of three
//! outputs:
//!
//! ```text
//!                          ┌──► LiveFace   (px nodes for the editing canvas)
//! Face + context ─► prepare┼──► markup     (mm-positioned HTML for preview/print)
//!                          └──► Bitmap     (rasterized capture)
//! ```
//!
//! Every target consumes the same [`PreparedFace`], so field resolution, QR
//! encoding and image addressing happen once per face and the three outputs
//! cannot disagree about content.
//!
//! ## Modules
//!
//! - [`context`]: shared HTTP client, picture URL template and app origin
//! - [`images`]: picture URLs, avatar placeholder, `data:` URIs, origins
//! - [`qr`]: QR symbol encoding (EC level M, margin 1)
//! - [`live`]: pixel-space nodes driven by the placement engine
//! - [`html`]: static markup for preview and print
//! - [`font`]: Spleen glyphs for raster text
//! - [`raster`]: bitmap painter and [`Bitmap`]
//! - [`capture`]: cross-origin inlining, rasterizer retry, placeholders

pub mod capture;
pub mod context;
pub mod font;
pub mod html;
pub mod images;
pub mod live;
pub mod qr;
pub mod raster;

pub use capture::{CanvasRasterizer, CaptureError, Rasterize};
pub use context::RenderContext;
pub use images::ImageSrc;
pub use live::{LiveFace, LiveNode};
pub use qr::{QrError, QrSymbol};
pub use raster::Bitmap;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::document::{Face, FaceKind, ImageFit, Item, ItemId, ItemKind, Style};
use crate::fields::{BindingContext, FieldCatalog, resolve, text_transform};

/// Line box height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// Output flavour requested from [`Renderer::render_face`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTarget {
    Live,
    Preview,
    Capture,
}

/// Result of [`Renderer::render_face`].
#[derive(Debug, Clone)]
pub enum RenderOutput {
    Live(LiveFace),
    Markup(String),
    Bitmap(Bitmap),
}

/// Resolved visual content of one item.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Final display string (transform applied) in its style.
    Text { text: String, style: Style },
    Image {
        src: ImageSrc,
        fit: ImageFit,
        corner_radius: f64,
    },
    /// `symbol` is `None` when the encoder rejected `value`.
    Qr { value: String, symbol: Option<QrSymbol> },
}

/// One item, resolved and sized in mm.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedItem {
    pub id: ItemId,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub content: Content,
}

/// One face with every item resolved, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFace {
    pub kind: FaceKind,
    pub width: f64,
    pub height: f64,
    pub background: Option<ImageSrc>,
    pub items: Vec<PreparedItem>,
}

/// Renders faces for all targets.
///
/// Cheap to clone; the catalog, context and rasterizer are shared.
#[derive(Clone)]
pub struct Renderer {
    catalog: Arc<FieldCatalog>,
    context: Arc<RenderContext>,
    rasterizer: Arc<dyn Rasterize>,
}

impl Renderer {
    /// Renderer using the built-in [`CanvasRasterizer`].
    pub fn new(catalog: Arc<FieldCatalog>, context: Arc<RenderContext>) -> Self {
        let rasterizer = Arc::new(CanvasRasterizer::new(
            context.http_client.clone(),
            context.app_origin.clone(),
        ));
        Self {
            catalog,
            context,
            rasterizer,
        }
    }

    /// Swap the rasterizer used by the capture target.
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterize>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub(crate) fn rasterizer(&self) -> &dyn Rasterize {
        self.rasterizer.as_ref()
    }

    /// Render one face for `target`.
    pub async fn render_face(
        &self,
        kind: FaceKind,
        face: &Face,
        ctx: Option<&BindingContext>,
        target: RenderTarget,
    ) -> RenderOutput {
        let prepared = self.prepare_face(kind, face, ctx).await;
        match target {
            RenderTarget::Live => RenderOutput::Live(LiveFace::from_prepared(prepared, None)),
            RenderTarget::Preview => RenderOutput::Markup(html::face_markup(&prepared)),
            RenderTarget::Capture => {
                let live = LiveFace::from_prepared(prepared, None);
                RenderOutput::Bitmap(self.capture(&live).await)
            }
        }
    }

    /// Live nodes for the editing canvas with `selected` highlighted.
    pub async fn live_face(
        &self,
        kind: FaceKind,
        face: &Face,
        ctx: Option<&BindingContext>,
        selected: Option<&ItemId>,
    ) -> LiveFace {
        LiveFace::from_prepared(self.prepare_face(kind, face, ctx).await, selected)
    }

    /// Static preview markup for one face.
    pub async fn preview_markup(
        &self,
        kind: FaceKind,
        face: &Face,
        ctx: Option<&BindingContext>,
    ) -> String {
        html::face_markup(&self.prepare_face(kind, face, ctx).await)
    }

    /// Resolve every item of `face`.
    ///
    /// QR symbols are awaited item by item, so the returned face is complete.
    pub async fn prepare_face(
        &self,
        kind: FaceKind,
        face: &Face,
        ctx: Option<&BindingContext>,
    ) -> PreparedFace {
        let mut items = Vec::with_capacity(face.items.len());
        for item in &face.items {
            items.push(self.prepare_item(item, ctx).await);
        }
        PreparedFace {
            kind,
            width: face.width,
            height: face.height,
            background: face
                .background
                .as_deref()
                .filter(|b| !b.trim().is_empty())
                .map(ImageSrc::from_source),
            items,
        }
    }

    /// Resolve a single item.
    pub async fn prepare_item(&self, item: &Item, ctx: Option<&BindingContext>) -> PreparedItem {
        let (width, mut height) = item.kind.size_mm();
        let content = match &item.kind {
            ItemKind::FixedText(t) => Content::Text {
                text: text_transform(&t.text, t.style.text_transform),
                style: t.style.clone(),
            },
            ItemKind::BoundLabel(b) => {
                let text = self.label_text(&b.field_path, ctx);
                Content::Text {
                    text: text_transform(&text, b.style.text_transform),
                    style: b.style.clone(),
                }
            }
            ItemKind::DynamicImage(d) => Content::Image {
                src: self.picture_source(&d.field_path, ctx),
                fit: d.fit,
                corner_radius: d.corner_radius,
            },
            ItemKind::FixedImage(f) => Content::Image {
                src: ImageSrc::from_source(&f.image),
                fit: f.fit,
                corner_radius: f.corner_radius,
            },
            ItemKind::Barcode(b) => {
                let value = barcode_value(&b.field_path, ctx);
                let symbol = match QrSymbol::encode_async(value.clone()).await {
                    Ok(symbol) => Some(symbol),
                    Err(e) => {
                        warn!(item = %item.id, error = %e, "QR encoding rejected, using placeholder");
                        None
                    }
                };
                Content::Qr { value, symbol }
            }
        };
        if matches!(content, Content::Text { .. }) {
            height *= LINE_HEIGHT;
        }
        PreparedItem {
            id: item.id.clone(),
            top: item.top,
            left: item.left,
            width,
            height,
            content,
        }
    }

    /// Bound label text: resolved value, else catalog display name, else the
    /// raw path.
    fn label_text(&self, path: &str, ctx: Option<&BindingContext>) -> String {
        let value = resolve(path, ctx);
        if !value.is_empty() {
            return value;
        }
        match self.catalog.display_name(path) {
            Some(name) => name.to_string(),
            None => {
                debug!(path, "no value or display name, showing raw path");
                path.to_string()
            }
        }
    }

    /// Picture URL for a record, or the avatar when unresolved.
    fn picture_source(&self, path: &str, ctx: Option<&BindingContext>) -> ImageSrc {
        let id = images::picture_path_candidates(path)
            .iter()
            .map(|candidate| resolve(candidate, ctx))
            .find(|v| !v.is_empty());
        match id {
            Some(id) => self.context.pictures.source_for(&id),
            None => ImageSrc::Avatar,
        }
    }
}

/// QR payload: resolved value, else the literal path, else a single space.
fn barcode_value(path: &str, ctx: Option<&BindingContext>) -> String {
    let value = resolve(path, ctx);
    if !value.is_empty() {
        value
    } else if !path.trim().is_empty() {
        path.to_string()
    } else {
        qr::EMPTY_PAYLOAD.to_string()
    }
}
