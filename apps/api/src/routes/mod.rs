pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(handlers::handle_generate),
        )
        .route(
            "/api/v1/sessions/:id/prompt",
            post(handlers::handle_preview_prompt),
        )
        .route(
            "/api/v1/sessions/:id/resume.txt",
            get(handlers::handle_download_text),
        )
        .route(
            "/api/v1/sessions/:id/resume.pdf",
            get(handlers::handle_download_pdf),
        )
        .with_state(state)
}
