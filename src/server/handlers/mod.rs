//! HTTP handlers for the server.

pub mod fields;
pub mod print;
pub mod render;
pub mod templates;

use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::state::AppState;
use crate::document::Template;
use crate::error::CardError;
use crate::fields::BindingContext;

/// Error half of every handler result.
pub type ApiError = (StatusCode, String);

/// Map a crate error onto an HTTP status.
pub fn api_error(e: CardError) -> ApiError {
    let status = match &e {
        CardError::Template(_)
        | CardError::EmptyTemplate
        | CardError::MissingName
        | CardError::Json(_) => StatusCode::BAD_REQUEST,
        CardError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
        CardError::Record(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

/// A template given inline or by stored id.
#[derive(Debug, Default, Deserialize)]
pub struct TemplateRef {
    #[serde(default)]
    pub template: Option<Template>,
    #[serde(default, alias = "templateId")]
    pub template_id: Option<String>,
}

impl TemplateRef {
    pub async fn resolve(self, state: &AppState) -> Result<Template, ApiError> {
        match (self.template, self.template_id) {
            (Some(template), _) => Ok(template),
            (None, Some(id)) => state.templates.load(&id).await.map_err(api_error),
            (None, None) => Err((
                StatusCode::BAD_REQUEST,
                "either template or template_id is required".to_string(),
            )),
        }
    }
}

/// Records given inline and/or by id; inline records come first.
#[derive(Debug, Default, Deserialize)]
pub struct RecordRefs {
    #[serde(default)]
    pub records: Vec<Value>,
    #[serde(default, alias = "recordIds")]
    pub record_ids: Vec<String>,
}

impl RecordRefs {
    pub async fn contexts(self, state: &AppState) -> Result<Vec<BindingContext>, ApiError> {
        let mut raw = self.records;
        if !self.record_ids.is_empty() {
            let Some(source) = &state.records else {
                return Err((
                    StatusCode::BAD_REQUEST,
                    "record_ids given but no record service is configured".to_string(),
                ));
            };
            raw.extend(source.fetch_many(&self.record_ids).await.map_err(api_error)?);
        }
        Ok(raw.iter().map(BindingContext::from_record).collect())
    }
}
