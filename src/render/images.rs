//! Image addressing: picture URLs, the avatar fallback, `data:` URIs and
//! origin checks.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use serde::Serialize;

/// Picture id field spellings accepted interchangeably.
pub const PICTURE_ID_ALIASES: &[&str] = &["PictureID", "PictureId"];

/// Bundled avatar shown when a record has no picture.
pub const AVATAR_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 120">"##,
    r##"<rect width="100" height="120" fill="#e4e6eb"/>"##,
    r##"<circle cx="50" cy="44" r="22" fill="#b0b5bd"/>"##,
    r##"<path d="M10 120c0-26 18-42 40-42s40 16 40 42z" fill="#b0b5bd"/>"##,
    "</svg>"
);

/// Where an image node gets its pixels from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "src", rename_all = "snake_case")]
pub enum ImageSrc {
    /// Remote or relative URL.
    Url(String),
    /// Inline `data:` URI.
    Inline(String),
    /// Bundled avatar placeholder.
    Avatar,
}

impl ImageSrc {
    /// Classify a stored source string. Empty means avatar.
    pub fn from_source(src: &str) -> Self {
        let src = src.trim();
        if src.is_empty() {
            ImageSrc::Avatar
        } else if src.starts_with("data:") {
            ImageSrc::Inline(src.to_string())
        } else {
            ImageSrc::Url(src.to_string())
        }
    }

    /// Value for an `src` / `url()` attribute.
    pub fn to_markup_src(&self) -> String {
        match self {
            ImageSrc::Url(u) | ImageSrc::Inline(u) => u.clone(),
            ImageSrc::Avatar => avatar_data_uri(),
        }
    }
}

/// `data:image/svg+xml;base64,...` form of [`AVATAR_SVG`].
pub fn avatar_data_uri() -> String {
    data_uri("image/svg+xml", AVATAR_SVG.as_bytes())
}

/// Build a base64 `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Decode a `data:` URI into (mime, bytes). Supports base64 and plain
/// (percent-free) payloads.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let (mime, is_base64) = match meta.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (meta, false),
    };
    let mime = if mime.is_empty() { "text/plain" } else { mime };
    let bytes = if is_base64 {
        STANDARD.decode(payload.trim()).ok()?
    } else {
        payload.as_bytes().to_vec()
    };
    Some((mime.to_string(), bytes))
}

/// Builds `{base}/images/{id}` URLs.
#[derive(Debug, Clone)]
pub struct PictureUrls {
    base: String,
}

impl PictureUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Source for a resolved picture id; empty ids fall back to the avatar.
    pub fn source_for(&self, picture_id: &str) -> ImageSrc {
        let id = picture_id.trim();
        if id.is_empty() {
            ImageSrc::Avatar
        } else {
            ImageSrc::Url(format!("{}/images/{}", self.base, urlencoding::encode(id)))
        }
    }
}

/// Field paths to try for a picture id: the bound path, then its
/// `PictureID`/`PictureId` alias.
pub fn picture_path_candidates(path: &str) -> Vec<String> {
    let mut out = vec![path.to_string()];
    for (i, alias) in PICTURE_ID_ALIASES.iter().enumerate() {
        if let Some(prefix) = path.strip_suffix(alias) {
            let other = PICTURE_ID_ALIASES[1 - i];
            out.push(format!("{}{}", prefix, other));
        }
    }
    out
}

/// Whether `src` would be fetched from a different origin than `origin`.
///
/// Relative URLs and `data:` URIs are same-origin. With no configured origin
/// every absolute http(s) URL counts as cross-origin.
pub fn is_cross_origin(src: &str, origin: Option<&Url>) -> bool {
    let Ok(url) = Url::parse(src) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    match origin {
        Some(origin) => url.origin() != origin.origin(),
        None => true,
    }
}

/// Resolve a possibly relative URL against the app origin.
pub fn absolute_url(src: &str, origin: Option<&Url>) -> Option<Url> {
    match Url::parse(src) {
        Ok(url) => Some(url),
        Err(_) => origin.and_then(|o| o.join(src).ok()),
    }
}
