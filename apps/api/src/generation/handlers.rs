//! Axum route handlers for the session and generation API.

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{PDF_FILENAME, TEXT_FILENAME};
use crate::generation::generator::{download_pdf, download_text, generate_resume};
use crate::generation::prompts::build_prompt;
use crate::models::resume::{GenerationResult, ResumeRequest};
use crate::session::ResumeSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct PromptPreviewResponse {
    pub prompt: String,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create();
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ResumeSession>, AppError> {
    Ok(Json(state.sessions.get(session_id)?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/generate
///
/// The "Generate Resume" action. Responds once the LLM call returns.
///
/// The flow runs on its own task so a dropped connection cannot strand the
/// session in `Generating`; the outcome always lands in the session, even
/// when the task itself dies.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, AppError> {
    let Json(request) = payload?;
    let sessions = state.sessions.clone();
    let llm = state.llm.clone();

    let joined = tokio::spawn(async move {
        generate_resume(&sessions, llm.as_deref(), session_id, &request).await
    })
    .await;

    match joined {
        Ok(outcome) => Ok(Json(outcome?)),
        Err(e) => {
            let err = AppError::Internal(anyhow!("Generation task aborted: {e}"));
            state.sessions.fail(session_id, &err)?;
            Err(err)
        }
    }
}

/// POST /api/v1/sessions/:id/prompt
///
/// Returns the prompt that would be sent for this request. Makes no LLM call.
pub async fn handle_preview_prompt(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Json<PromptPreviewResponse>, AppError> {
    let Json(request) = payload?;
    state.sessions.get(session_id)?;
    Ok(Json(PromptPreviewResponse {
        prompt: build_prompt(&request),
    }))
}

/// GET /api/v1/sessions/:id/resume.txt
pub async fn handle_download_text(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let body = download_text(&state.sessions, session_id)?;
    Ok(attachment("text/plain; charset=utf-8", TEXT_FILENAME, body))
}

/// GET /api/v1/sessions/:id/resume.pdf
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let body = download_pdf(
        &state.sessions,
        state.converter.as_ref(),
        &state.config.export_dir,
        session_id,
    )
    .await?;
    Ok(attachment("application/pdf", PDF_FILENAME, body))
}

fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}
