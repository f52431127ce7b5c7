//! Axum route handler for contact delivery.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::contact::form::ContactFormValues;
use crate::contact::ContactResponse;
use crate::state::AppState;

/// POST /api/contact
///
/// Re-checks the field rules, relays the message and reports
/// `{ success, info?, error? }`. Relay failures (including missing SMTP
/// configuration) are 500s with the reason in `error`. A body that does not
/// decode keeps the rejection's status but still answers in that shape.
pub async fn handle_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactFormValues>, JsonRejection>,
) -> (StatusCode, Json<ContactResponse>) {
    let values = match payload {
        Ok(Json(values)) => values,
        Err(rejection) => {
            warn!("Unreadable contact submission: {}", rejection.body_text());
            return (
                rejection.status(),
                Json(ContactResponse::failed(rejection.body_text())),
            );
        }
    };

    if let Err(errors) = values.validate() {
        let first = errors.first().map(|e| e.message).unwrap_or("Invalid submission.");
        warn!("Rejected contact submission: {} field error(s)", errors.len());
        return (StatusCode::BAD_REQUEST, Json(ContactResponse::failed(first)));
    }

    info!("Contact submission received from '{}'", values.name.trim());

    match state.mail_relay.deliver(&values).await {
        Ok(receipt) => {
            let info = serde_json::to_value(&receipt).unwrap_or_default();
            (StatusCode::OK, Json(ContactResponse::delivered(info)))
        }
        Err(e) => {
            error!("Contact delivery failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactResponse::failed(e.to_string())),
            )
        }
    }
}
