//! Capture target: rasterize a live face into a [`Bitmap`].
//!
//! ```text
//! LiveFace ─► clone ─► inline cross-origin images (concurrent, best-effort)
//!                          │
//!                          ▼
//!                     rasterize ──Ok──────────────────────────► Bitmap
//!                          │ Err(Tainted)
//!                          ▼
//!              strip cross-origin images ─► rasterize ──Ok────► Bitmap
//!                                               │ Err
//!                                               ▼
//!                                       placeholder bitmap
//! ```
//!
//! A capture never fails. Per-image fetch errors are logged and swallowed,
//! and a face whose rasterization fails twice is replaced by a placeholder
//! so one bad face cannot abort a print batch.

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::images::{ImageSrc, absolute_url, data_uri, decode_data_uri, is_cross_origin};
use super::raster::{self, Bitmap, NodeImages};
use super::{Content, LiveFace, Renderer};
use crate::document::{Face, FaceKind};
use crate::fields::BindingContext;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// A cross-origin image reached the canvas.
    #[error("canvas tainted by cross-origin image {0}")]
    Tainted(String),
    #[error("rasterization failed: {0}")]
    Failed(String),
}

/// Turns a live face into pixels.
#[async_trait]
pub trait Rasterize: Send + Sync {
    async fn rasterize(&self, face: &LiveFace) -> Result<Bitmap, CaptureError>;
}

/// Built-in rasterizer.
///
/// Same-origin and inline images are decoded and painted; a cross-origin
/// URL taints the canvas and fails the pass.
pub struct CanvasRasterizer {
    client: reqwest::Client,
    origin: Option<Url>,
}

impl CanvasRasterizer {
    pub fn new(client: reqwest::Client, origin: Option<Url>) -> Self {
        Self { client, origin }
    }

    /// Decode an image source. `Ok(None)` means "nothing to paint".
    async fn load(&self, src: &ImageSrc) -> Result<Option<image::DynamicImage>, CaptureError> {
        let bytes = match src {
            ImageSrc::Avatar => return Ok(None),
            ImageSrc::Inline(uri) => match decode_data_uri(uri) {
                Some((_, bytes)) => bytes,
                None => {
                    debug!("malformed data URI skipped");
                    return Ok(None);
                }
            },
            ImageSrc::Url(url) => {
                if is_cross_origin(url, self.origin.as_ref()) {
                    return Err(CaptureError::Tainted(url.clone()));
                }
                let Some(absolute) = absolute_url(url, self.origin.as_ref()) else {
                    debug!(url = %url, "relative image URL without an origin skipped");
                    return Ok(None);
                };
                match fetch_bytes(&self.client, absolute.as_str()).await {
                    Ok((_, bytes)) => bytes,
                    Err(e) => {
                        warn!(url = %url, error = %e, "image fetch failed");
                        return Ok(None);
                    }
                }
            }
        };
        match image::load_from_memory(&bytes) {
            Ok(img) => Ok(Some(img)),
            Err(e) => {
                debug!(error = %e, "undecodable image skipped");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Rasterize for CanvasRasterizer {
    async fn rasterize(&self, face: &LiveFace) -> Result<Bitmap, CaptureError> {
        let background = match &face.background {
            Some(src) => self.load(src).await?,
            None => None,
        };
        let mut images = NodeImages::new();
        for (index, node) in face.nodes.iter().enumerate() {
            if let Content::Image { src, .. } = &node.content
                && let Some(img) = self.load(src).await?
            {
                images.insert(index, img);
            }
        }
        let face = face.clone();
        tokio::task::spawn_blocking(move || raster::paint(&face, background.as_ref(), &images))
            .await
            .map_err(|e| CaptureError::Failed(e.to_string()))
    }
}

// ============================================================================
// CROSS-ORIGIN HANDLING
// ============================================================================

/// Where an image sits in the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Background,
    Node(usize),
}

fn image_slot_mut(face: &mut LiveFace, slot: Slot) -> Option<&mut ImageSrc> {
    match slot {
        Slot::Background => face.background.as_mut(),
        Slot::Node(i) => match face.nodes.get_mut(i).map(|n| &mut n.content) {
            Some(Content::Image { src, .. }) => Some(src),
            _ => None,
        },
    }
}

fn cross_origin_slots(face: &LiveFace, origin: Option<&Url>) -> Vec<(Slot, String)> {
    let mut slots = Vec::new();
    if let Some(ImageSrc::Url(url)) = &face.background
        && is_cross_origin(url, origin)
    {
        slots.push((Slot::Background, url.clone()));
    }
    for (i, node) in face.nodes.iter().enumerate() {
        if let Content::Image {
            src: ImageSrc::Url(url),
            ..
        } = &node.content
            && is_cross_origin(url, origin)
        {
            slots.push((Slot::Node(i), url.clone()));
        }
    }
    slots
}

/// Replace every cross-origin image with an inline `data:` URI.
///
/// All fetches run concurrently and are joined before returning. A failed
/// fetch leaves the original URL in place. Returns how many were inlined.
pub async fn inline_cross_origin_images(
    client: &reqwest::Client,
    origin: Option<&Url>,
    face: &mut LiveFace,
) -> usize {
    let mut tasks = JoinSet::new();
    for (slot, url) in cross_origin_slots(face, origin) {
        let client = client.clone();
        tasks.spawn(async move {
            let result = fetch_bytes(&client, &url).await;
            (slot, url, result)
        });
    }

    let mut inlined = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((slot, _, Ok((mime, bytes)))) => {
                if let Some(src) = image_slot_mut(face, slot) {
                    *src = ImageSrc::Inline(data_uri(&mime, &bytes));
                    inlined += 1;
                }
            }
            Ok((_, url, Err(e))) => {
                warn!(url = %url, error = %e, "cross-origin image inlining failed, keeping original URL");
            }
            Err(e) => warn!(error = %e, "image inlining task aborted"),
        }
    }
    inlined
}

/// Drop every remaining cross-origin image. Returns how many were removed.
pub fn strip_cross_origin_images(face: &mut LiveFace, origin: Option<&Url>) -> usize {
    let mut removed = 0;
    if let Some(ImageSrc::Url(url)) = &face.background
        && is_cross_origin(url, origin)
    {
        face.background = None;
        removed += 1;
    }
    let before = face.nodes.len();
    face.nodes.retain(|node| {
        !matches!(&node.content, Content::Image { src: ImageSrc::Url(url), .. } if is_cross_origin(url, origin))
    });
    removed + before - face.nodes.len()
}

/// GET `url` without credentials; returns (mime, body).
async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<(String, Vec<u8>), reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| {
            let path = Url::parse(url).map(|u| u.path().to_string()).unwrap_or_default();
            mime_guess::from_path(path).first_or_octet_stream().to_string()
        });
    let bytes = response.bytes().await?;
    Ok((mime, bytes.to_vec()))
}

// ============================================================================
// RENDERER ENTRY POINTS
// ============================================================================

impl Renderer {
    /// Rasterize a live face. Never fails; see the module docs.
    pub async fn capture(&self, live: &LiveFace) -> Bitmap {
        let origin = self.context().app_origin.as_ref();
        let mut subtree = live.clone();
        let inlined = inline_cross_origin_images(&self.context().http_client, origin, &mut subtree).await;
        debug!(face = %live.kind, inlined, "capturing face");

        match self.rasterizer().rasterize(&subtree).await {
            Ok(bitmap) => bitmap,
            Err(CaptureError::Tainted(url)) => {
                warn!(face = %live.kind, url = %url, "canvas tainted, retrying without cross-origin images");
                strip_cross_origin_images(&mut subtree, origin);
                match self.rasterizer().rasterize(&subtree).await {
                    Ok(bitmap) => bitmap,
                    Err(e) => placeholder_for(live, &e),
                }
            }
            Err(e) => placeholder_for(live, &e),
        }
    }

    /// Prepare and capture one face. The capture starts only after every
    /// QR symbol on the face has been encoded.
    pub async fn capture_face(
        &self,
        kind: FaceKind,
        face: &Face,
        ctx: Option<&BindingContext>,
    ) -> Bitmap {
        let live = self.live_face(kind, face, ctx, None).await;
        self.capture(&live).await
    }
}

fn placeholder_for(live: &LiveFace, error: &CaptureError) -> Bitmap {
    warn!(face = %live.kind, error = %error, "capture failed, substituting placeholder");
    let (w, h) = live.pixel_size();
    Bitmap::placeholder(w, h)
}
