//! Axum route handler for the personalization call.

use axum::{extract::State, Json};
use tracing::warn;

use crate::content::ContentRecord;
use crate::errors::AppError;
use crate::personalization::flow::personalize_page_content;
use crate::personalization::{InteractionSnapshot, PersonalizeContentInput, PersonalizeContentOutput};
use crate::state::AppState;

/// POST /api/personalize
///
/// Both input strings must decode (`interactionData` as an interaction
/// snapshot, `currentContent` as a ContentRecord). The generated record is
/// validated before it is re-encoded into the response; any generation or
/// validation failure is a uniform 503.
pub async fn handle_personalize(
    State(state): State<AppState>,
    Json(request): Json<PersonalizeContentInput>,
) -> Result<Json<PersonalizeContentOutput>, AppError> {
    let snapshot: InteractionSnapshot = serde_json::from_str(&request.interaction_data)
        .map_err(|e| AppError::Validation(format!("interactionData is not valid: {e}")))?;
    snapshot.validate().map_err(AppError::Validation)?;

    ContentRecord::from_json(&request.current_content)
        .map_err(|e| AppError::Validation(format!("currentContent is not valid: {e}")))?;

    let page = personalize_page_content(&request, state.generator.as_ref())
        .await
        .ok_or(AppError::PersonalizationUnavailable)?;

    let personalized_content = page.content.to_json().map_err(|e| {
        warn!("Could not re-encode personalized content: {e}");
        AppError::PersonalizationUnavailable
    })?;

    Ok(Json(PersonalizeContentOutput {
        personalized_content,
        reasoning: page.reasoning,
    }))
}
