//! Page rendering and content routes.

use axum::{extract::State, response::Html, Json};
use serde::Serialize;

use crate::content::{default_content, ContentRecord};
use crate::errors::AppError;
use crate::render::{render_page, render_sections};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfigResponse {
    pub trigger_threshold: u32,
}

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(render_page(&default_content()))
}

/// GET /api/content
///
/// The record every new page session starts from.
pub async fn handle_default_content() -> Json<ContentRecord> {
    Json(default_content())
}

/// GET /api/session-config
pub async fn handle_session_config(State(state): State<AppState>) -> Json<SessionConfigResponse> {
    Json(SessionConfigResponse {
        trigger_threshold: state.config.personalization_threshold,
    })
}

/// POST /api/render
///
/// Renders a ContentRecord into the `<main>` fragment. The record is decoded
/// strictly; a record with the wrong shape is a 400, never a partial render.
pub async fn handle_render(
    Json(body): Json<serde_json::Value>,
) -> Result<Html<String>, AppError> {
    let content = ContentRecord::from_value(body)
        .map_err(|e| AppError::Validation(format!("content is not valid: {e}")))?;
    Ok(Html(render_sections(&content)))
}
