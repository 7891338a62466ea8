//! Preview and capture handlers for a single face.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::super::state::AppState;
use super::{ApiError, RecordRefs, TemplateRef, api_error};
use crate::document::{FaceKind, Template};
use crate::fields::BindingContext;

fn default_face() -> FaceKind {
    FaceKind::Front
}

/// Body of the preview and capture endpoints.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(flatten)]
    pub template: TemplateRef,
    /// Inline record; omitted renders the unbound template.
    #[serde(default)]
    pub record: Option<Value>,
    #[serde(default, alias = "recordId")]
    pub record_id: Option<String>,
    #[serde(default = "default_face")]
    pub face: FaceKind,
}

impl RenderRequest {
    async fn resolve(self, state: &AppState) -> Result<(Template, FaceKind, Option<BindingContext>), ApiError> {
        let face = self.face;
        let refs = RecordRefs {
            records: self.record.into_iter().collect(),
            record_ids: self.record_id.into_iter().collect(),
        };
        let template = self.template.resolve(state).await?;
        let ctx = refs.contexts(state).await?.into_iter().next();
        Ok((template, face, ctx))
    }
}

fn missing_face(kind: FaceKind) -> ApiError {
    (StatusCode::BAD_REQUEST, format!("template has no {} face", kind))
}

/// Handle POST /api/preview - face markup, mm-positioned.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> Result<Html<String>, ApiError> {
    let (template, kind, ctx) = req.resolve(&state).await?;
    let face = template.face(kind).ok_or_else(|| missing_face(kind))?;
    Ok(Html(state.renderer.preview_markup(kind, face, ctx.as_ref()).await))
}

/// Handle POST /api/capture - rasterized face as PNG.
pub async fn capture(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (template, kind, ctx) = req.resolve(&state).await?;
    let face = template.face(kind).ok_or_else(|| missing_face(kind))?;
    let bitmap = state.renderer.capture_face(kind, face, ctx.as_ref()).await;
    let png = bitmap.to_png().map_err(api_error)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::handlers::test_support::{badge, state};
    use serde_json::json;

    fn request(body: Value) -> RenderRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_preview_inline_record() {
        let body = json!({
            "template": badge(),
            "record": {"Employee": {"Name": "Ada", "SurName": "Lovelace"}}
        });
        let Html(markup) = preview(State(state()), Json(request(body))).await.unwrap();
        assert!(markup.contains("data-face=\"FRONT\""));
        assert!(markup.contains(">Ada Lovelace</div>"));
    }

    #[tokio::test]
    async fn test_preview_by_ids() {
        let state = state();
        let template = badge();
        state.templates.save(&template).await.unwrap();
        let body = json!({"template_id": template.id, "recordId": "7", "face": "BACK"});
        let Html(markup) = preview(State(state), Json(request(body))).await.unwrap();
        assert!(markup.contains("data-face=\"BACK\""));
        assert!(markup.contains("Property of ACME"));
    }

    #[tokio::test]
    async fn test_preview_without_record_shows_display_name() {
        let Html(markup) = preview(State(state()), Json(request(json!({"template": badge()}))))
            .await
            .unwrap();
        assert!(markup.contains(">Full Name</div>"));
    }

    #[tokio::test]
    async fn test_missing_back_face() {
        let mut template = badge();
        template.set_side(crate::document::Side::Single);
        let body = json!({"template": template, "face": "BACK"});
        let err = preview(State(state()), Json(request(body))).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_capture_png() {
        let body = json!({"template": badge(), "recordId": "7"});
        let response = capture(State(state()), Json(request(body))).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }
}
