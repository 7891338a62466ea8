//! Server state and configuration.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::render::Renderer;
use crate::store::{RecordSource, TemplateStore};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    pub engine: EngineConfig,
}

/// Application state shared across handlers.
pub struct AppState {
    pub renderer: Renderer,
    pub templates: Arc<dyn TemplateStore>,
    /// Record service; requests may also carry records inline.
    pub records: Option<Arc<dyn RecordSource>>,
}

impl AppState {
    /// Build the renderer, template store and record source from config.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let renderer = config.engine.renderer()?;
        let records = config
            .engine
            .record_source(renderer.context().http_client.clone());
        Ok(Self {
            templates: Arc::new(config.engine.template_store()),
            records,
            renderer,
        })
    }

    /// State over explicit parts.
    pub fn from_parts(
        renderer: Renderer,
        templates: Arc<dyn TemplateStore>,
        records: Option<Arc<dyn RecordSource>>,
    ) -> Self {
        Self {
            renderer,
            templates,
            records,
        }
    }
}
