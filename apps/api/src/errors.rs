use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for the action that raised it. Nothing is retried
/// and the session stays usable.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("OpenAI API key not found. Set OPENAI_API_KEY in the environment or .env file.")]
    MissingCredential,

    #[error("{0}")]
    GenerationFailed(String),

    #[error("PDF generation error: {0}")]
    ExportFailed(String),

    #[error("No resume has been generated for this session yet")]
    NoResult,

    #[error("Session {0} not found")]
    SessionNotFound(uuid::Uuid),

    #[error("A resume is already being generated for this session")]
    GenerationInProgress,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    /// Stable machine-readable code, shared by the HTTP body and session view.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "MISSING_CREDENTIAL",
            AppError::GenerationFailed(_) => "GENERATION_FAILED",
            AppError::ExportFailed(_) => "EXPORT_FAILED",
            AppError::NoResult => "NO_RESULT",
            AppError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            AppError::GenerationInProgress => "GENERATION_IN_PROGRESS",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GenerationFailed(_) | AppError::ExportFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::NoResult | AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::GenerationInProgress => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::GenerationFailed(msg) => {
                tracing::error!("Generation error: {msg}");
                self.to_string()
            }
            AppError::ExportFailed(msg) => {
                tracing::error!("Export error: {msg}");
                self.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}
