//! Template save/load handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tracing::info;

use super::super::state::AppState;
use super::{ApiError, api_error};
use crate::document::Template;
use crate::store::TemplateSummary;

/// Handle GET /api/templates - list stored templates.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TemplateSummary>>, ApiError> {
    state.templates.list().await.map(Json).map_err(api_error)
}

/// Handle GET /api/templates/:id - load one template.
pub async fn load(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Template>, ApiError> {
    state.templates.load(&id).await.map(Json).map_err(api_error)
}

/// Handle POST /api/templates - validate and save.
///
/// Unnamed or item-less templates are rejected with 400 before the store
/// is called.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(template): Json<Template>,
) -> Result<Json<TemplateSummary>, ApiError> {
    template.validate_for_save().map_err(api_error)?;
    let summary = state.templates.save(&template).await.map_err(api_error)?;
    info!(id = %summary.id, items = summary.item_count, "template saved via API");
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::handlers::test_support::{badge, state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_save_then_load() {
        let state = state();
        let template = badge();
        let Json(summary) = save(State(state.clone()), Json(template.clone())).await.unwrap();
        assert_eq!(summary.id, template.id);

        let Json(loaded) = load(State(state.clone()), Path(template.id.clone())).await.unwrap();
        assert_eq!(loaded, template);

        let Json(listed) = list(State(state)).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_empty_and_unnamed() {
        let state = state();
        let err = save(State(state.clone()), Json(Template::new("Blank"))).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let mut unnamed = badge();
        unnamed.name.clear();
        let err = save(State(state.clone()), Json(unnamed)).await.unwrap_err();
        assert_eq!(err, (StatusCode::BAD_REQUEST, "Template name is required".to_string()));

        assert!(list(State(state)).await.unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn test_save_template_without_id() {
        let state = state();
        let template: Template = serde_json::from_value(serde_json::json!({
            "name": "New badge",
            "SIDE": "SINGLE",
            "FRONT": {"width": 53.98, "height": 85.6, "items": {
                "a": {"type": "fixed_text", "top": 0, "left": 0, "text": "VISITOR"}
            }}
        }))
        .unwrap();
        let Json(summary) = save(State(state.clone()), Json(template)).await.unwrap();
        assert!(!summary.id.is_empty());

        let Json(loaded) = load(State(state), Path(summary.id.clone())).await.unwrap();
        assert_eq!(loaded.name, "New badge");
        assert_eq!(loaded.item_count(), 1);
    }

    #[tokio::test]
    async fn test_load_missing() {
        let err = load(State(state()), Path("missing".into())).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }
}
