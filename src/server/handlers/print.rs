//! Print handlers: duplex HTML for many records, or image-only reprints.

use axum::{Json, extract::State, response::Html};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::super::state::AppState;
use super::{ApiError, RecordRefs, TemplateRef, api_error};
use crate::document::{DEFAULT_HEIGHT_MM, DEFAULT_WIDTH_MM};
use crate::print::{PrintRecord, capture_batch, compose_image_pages, compose_pages};

/// Body of POST /api/print.
#[derive(Debug, Deserialize)]
pub struct PrintRequest {
    #[serde(flatten)]
    pub template: TemplateRef,
    #[serde(flatten)]
    pub records: RecordRefs,
    /// Rasterize each face first and print the bitmaps.
    #[serde(default)]
    pub rasterize: bool,
}

/// Handle POST /api/print - print document for every record.
///
/// With no records the unbound template is printed once.
pub async fn print(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PrintRequest>,
) -> Result<Html<String>, ApiError> {
    let template = req.template.resolve(&state).await?;
    let contexts = req.records.contexts(&state).await?;
    let records: Vec<PrintRecord> = if contexts.is_empty() {
        vec![PrintRecord::new(template, None)]
    } else {
        contexts
            .into_iter()
            .map(|ctx| PrintRecord::new(template.clone(), Some(ctx)))
            .collect()
    };
    info!(records = records.len(), rasterize = req.rasterize, "print requested");

    let pages = if req.rasterize {
        let captured = capture_batch(&state.renderer, &records).await;
        let (width, height) = captured
            .first()
            .map(|c| (c.width, c.height))
            .unwrap_or((DEFAULT_WIDTH_MM, DEFAULT_HEIGHT_MM));
        let images = captured
            .iter()
            .map(|c| c.bitmap.to_data_uri())
            .collect::<Result<Vec<_>, _>>()
            .map_err(api_error)?;
        compose_image_pages(&images, width, height)
    } else {
        compose_pages(&state.renderer, &records).await
    };
    Ok(Html(pages.to_html()))
}

fn default_width() -> f64 {
    DEFAULT_WIDTH_MM
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT_MM
}

/// Body of POST /api/print/images.
#[derive(Debug, Deserialize)]
pub struct ImagePrintRequest {
    /// Bitmaps as URLs or `data:` URIs, in page order.
    pub images: Vec<String>,
    /// Page width in mm.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Page height in mm.
    #[serde(default = "default_height")]
    pub height: f64,
}

/// Handle POST /api/print/images - reprint prior captures, one per page.
pub async fn print_images(Json(req): Json<ImagePrintRequest>) -> Html<String> {
    info!(pages = req.images.len(), "image-only print requested");
    Html(compose_image_pages(&req.images, req.width, req.height).to_html())
}
