//! Catalog handlers for the editor's field and item-type pickers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::document::{Item, ItemTypeMeta, default_item, item_types};
use crate::fields::FieldOption;

use super::super::state::AppState;

/// Handle GET /api/fields - list bindable fields.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<FieldOption>> {
    Json(state.renderer.catalog().options().to_vec())
}

/// Handle GET /api/item-types - list item types with labels.
pub async fn item_type_list() -> Json<Vec<ItemTypeMeta>> {
    Json(item_types())
}

/// Handle GET /api/item-types/:name/default - a new item with editor defaults.
pub async fn default_for(Path(name): Path<String>) -> Result<Json<Item>, (StatusCode, String)> {
    default_item(&name)
        .map(|kind| Json(Item::new(kind)))
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown item type: {}", name)))
}
