//! Render context: shared resources the pipeline needs beyond the template
//! and the record.
//!
//! Constructed once per process (server lifetime, CLI run) and shared by
//! every render. Preparation only reads the picture URL template; the
//! capture target uses the HTTP client and the origin.

use reqwest::Url;
use std::time::Duration;

use super::images::PictureUrls;
use crate::error::{CardError, Result};

/// Timeout for a single image fetch during capture.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared resources available to every render.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// HTTP client for image fetches. Has no cookie store, so requests
    /// never carry credentials.
    pub http_client: reqwest::Client,
    /// Builds `{base}/images/{id}` picture URLs.
    pub pictures: PictureUrls,
    /// Origin the rendered card is hosted on. Images elsewhere are
    /// cross-origin for capture.
    pub app_origin: Option<Url>,
}

impl RenderContext {
    /// Create a context for the given picture base URL and app origin.
    pub fn new(image_base_url: &str, app_origin: Option<&str>) -> Result<Self> {
        let app_origin = app_origin
            .filter(|o| !o.trim().is_empty())
            .map(|o| {
                Url::parse(o.trim())
                    .map_err(|e| CardError::Config(format!("invalid app origin {:?}: {}", o, e)))
            })
            .transpose()?;
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("cardpress/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| CardError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            pictures: PictureUrls::new(image_base_url),
            app_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parses_origin() {
        let ctx = RenderContext::new("/", Some("https://app.example.com/editor")).unwrap();
        assert_eq!(
            ctx.app_origin.unwrap().origin().ascii_serialization(),
            "https://app.example.com"
        );
        assert!(RenderContext::new("/", Some("")).unwrap().app_origin.is_none());
    }

    #[test]
    fn test_invalid_origin() {
        assert!(matches!(
            RenderContext::new("/", Some("not a url")),
            Err(CardError::Config(_))
        ));
    }
}
