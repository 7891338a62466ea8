//! Engine configuration.
//!
//! Every setting is a `clap` argument with a `CARDPRESS_*` environment
//! fallback, so the same struct serves the CLI, the server and (through
//! [`Default`]) library callers and tests.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::fields::FieldCatalog;
use crate::render::{RenderContext, Renderer};
use crate::store::{FileTemplateStore, HttpRecordSource, RecordSource};

pub const DEFAULT_IMAGE_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Base URL for picture lookups (`{base}/images/{id}`)
    #[arg(long, env = "CARDPRESS_IMAGE_BASE_URL", default_value = DEFAULT_IMAGE_BASE_URL)]
    pub image_base_url: String,

    /// Origin the cards are served from; other origins are cross-origin for capture
    #[arg(long, env = "CARDPRESS_APP_ORIGIN")]
    pub app_origin: Option<String>,

    /// JSON list of custom-field settings (falls back to 20 generic slots)
    #[arg(long, env = "CARDPRESS_CUSTOM_FIELDS", value_name = "FILE")]
    pub custom_fields: Option<PathBuf>,

    /// Directory for saved templates
    #[arg(long, env = "CARDPRESS_TEMPLATES_DIR", default_value = DEFAULT_TEMPLATES_DIR)]
    pub templates_dir: PathBuf,

    /// Base URL of the record service (`{url}/records/{id}`)
    #[arg(long, env = "CARDPRESS_RECORD_API_URL")]
    pub record_api_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            app_origin: None,
            custom_fields: None,
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            record_api_url: None,
        }
    }
}

impl EngineConfig {
    /// Field catalog, built once from the custom-field settings.
    pub fn catalog(&self) -> FieldCatalog {
        FieldCatalog::from_settings_file(self.custom_fields.as_deref())
    }

    pub fn render_context(&self) -> Result<RenderContext> {
        RenderContext::new(&self.image_base_url, self.app_origin.as_deref())
    }

    /// Renderer over a freshly built catalog and context.
    pub fn renderer(&self) -> Result<Renderer> {
        let catalog = self.catalog();
        info!(fields = catalog.len(), "field catalog built");
        Ok(Renderer::new(
            Arc::new(catalog),
            Arc::new(self.render_context()?),
        ))
    }

    pub fn template_store(&self) -> FileTemplateStore {
        FileTemplateStore::new(&self.templates_dir)
    }

    /// HTTP record source, when a record service is configured.
    pub fn record_source(&self, client: reqwest::Client) -> Option<Arc<dyn RecordSource>> {
        self.record_api_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(|url| Arc::new(HttpRecordSource::new(client, url)) as Arc<dyn RecordSource>)
    }
}
