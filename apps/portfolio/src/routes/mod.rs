pub mod health;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeFile;

use crate::contact::handlers::handle_contact;
use crate::personalization::handlers::handle_personalize;
use crate::render::PGP_KEY_ROUTE;
use crate::session::transport::{CONTACT_PATH, PERSONALIZE_PATH};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let pgp_key = ServeFile::new(&state.config.pgp_key_path);

    Router::new()
        .route("/", get(pages::handle_index))
        .route("/health", get(health::health_handler))
        .route("/api/content", get(pages::handle_default_content))
        .route("/api/session-config", get(pages::handle_session_config))
        .route("/api/render", post(pages::handle_render))
        .route(PERSONALIZE_PATH, post(handle_personalize))
        .route(CONTACT_PATH, post(handle_contact))
        // Served verbatim for manual download
        .route_service(PGP_KEY_ROUTE, pgp_key)
        .with_state(state)
}
