//! Resume Generation — the flow behind the "Generate" and "Download" actions.
//!
//! Generate: credential check → build_prompt → LLM complete → store result.
//! Download: read the stored result → text bytes, or `<pre>` HTML → PDF.
//!
//! Every failure is returned as an `AppError`; nothing is retried.

use std::path::Path;

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{export_pdf, export_text, DocumentConverter};
use crate::generation::prompts::build_prompt;
use crate::llm_client::TextGenerator;
use crate::models::resume::{GenerationResult, ResumeRequest};
use crate::session::SessionStore;

/// Runs one generate action for a session.
///
/// `llm` is `None` when no credential was configured; in that case the session
/// fails with `MissingCredential` and no call is made. On failure the session's
/// previous result is preserved.
pub async fn generate_resume(
    sessions: &SessionStore,
    llm: Option<&dyn TextGenerator>,
    session_id: Uuid,
    request: &ResumeRequest,
) -> Result<GenerationResult, AppError> {
    sessions.begin_generation(session_id)?;

    let outcome = match llm {
        None => Err(AppError::MissingCredential),
        Some(llm) => call_llm(llm, request).await,
    };

    match outcome {
        Ok(result) => {
            sessions.succeed(session_id, result.clone())?;
            info!(
                "Generated resume for session {} ({} chars)",
                session_id,
                result.output_text.len()
            );
            Ok(result)
        }
        Err(err) => {
            warn!("Generation failed for session {}: {}", session_id, err);
            sessions.fail(session_id, &err)?;
            Err(err)
        }
    }
}

async fn call_llm(
    llm: &dyn TextGenerator,
    request: &ResumeRequest,
) -> Result<GenerationResult, AppError> {
    let prompt = build_prompt(request);
    info!(
        "Requesting resume for role {:?} from model {}",
        request.job_role,
        llm.model()
    );

    let text = llm
        .complete(&prompt)
        .await
        .map_err(|e| AppError::GenerationFailed(e.to_string()))?;

    Ok(GenerationResult::new(text))
}

/// Returns the stored resume text, byte-for-byte.
pub fn download_text(sessions: &SessionStore, session_id: Uuid) -> Result<Vec<u8>, AppError> {
    let result = sessions.result(session_id)?.ok_or(AppError::NoResult)?;
    Ok(export_text(&result.output_text))
}

/// Converts the stored resume to PDF and returns the file contents.
pub async fn download_pdf(
    sessions: &SessionStore,
    converter: &dyn DocumentConverter,
    export_dir: &Path,
    session_id: Uuid,
) -> Result<Vec<u8>, AppError> {
    let result = sessions.result(session_id)?.ok_or(AppError::NoResult)?;

    export_pdf(
        converter,
        &result.output_text,
        export_dir,
        &format!("resume-{session_id}"),
    )
    .await
    .map_err(|e| AppError::ExportFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::export::ConvertError;
    use crate::llm_client::LlmError;
    use crate::models::resume::{Layout, Tone, UserType};
    use crate::session::GenerationState;

    /// Replays canned outcomes and records every prompt it receives.
    struct StubGenerator {
        outcomes: Mutex<Vec<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn new(outcomes: Vec<Result<String, LlmError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        fn model(&self) -> &str {
            "stub-model"
        }

        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.outcomes.lock().unwrap().remove(0)
        }
    }

    struct CountingConverter {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl DocumentConverter for CountingConverter {
        async fn html_to_pdf(&self, html: &str, output: &Path) -> Result<(), ConvertError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ConvertError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "wkhtmltopdf not found",
                )));
            }
            tokio::fs::write(output, format!("%PDF-stub {html}")).await?;
            Ok(())
        }
    }

    fn request() -> ResumeRequest {
        ResumeRequest {
            user_type: UserType::Fresher,
            job_role: "Data Analyst".to_string(),
            tone: Tone::Confident,
            layout: Layout::Minimal,
            education: "B.Sc. Statistics".to_string(),
            experience: String::new(),
            projects: String::new(),
            skills: "SQL, Python".to_string(),
            certifications: String::new(),
            portfolio_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let sessions = SessionStore::default();
        let id = sessions.create();

        let err = generate_resume(&sessions, None, id, &request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingCredential));
        let session = sessions.get(id).unwrap();
        assert_eq!(session.state, GenerationState::Failed);
        assert!(session.result.is_none());
    }

    #[tokio::test]
    async fn test_success_stores_completion_verbatim() {
        let text = "  JANE DOE\n\nSummary\nData analyst with...\n\n".to_string();
        let llm = StubGenerator::new(vec![Ok(text.clone())]);
        let sessions = SessionStore::default();
        let id = sessions.create();

        let result = generate_resume(&sessions, Some(&llm), id, &request())
            .await
            .unwrap();

        assert_eq!(result.output_text, text);
        let session = sessions.get(id).unwrap();
        assert_eq!(session.state, GenerationState::Succeeded);
        assert_eq!(session.result.unwrap().output_text, text);
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_prompt_sent_is_the_built_prompt() {
        let llm = StubGenerator::new(vec![Ok("ok".to_string())]);
        let sessions = SessionStore::default();
        let id = sessions.create();

        generate_resume(&sessions, Some(&llm), id, &request())
            .await
            .unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.as_slice(), &[build_prompt(&request())]);
    }

    #[tokio::test]
    async fn test_failure_preserves_prior_result_and_does_not_retry() {
        let llm = StubGenerator::new(vec![
            Ok("first resume".to_string()),
            Err(LlmError::Api {
                status: 429,
                message: "Rate limit reached".to_string(),
            }),
        ]);
        let sessions = SessionStore::default();
        let id = sessions.create();

        generate_resume(&sessions, Some(&llm), id, &request())
            .await
            .unwrap();
        let err = generate_resume(&sessions, Some(&llm), id, &request())
            .await
            .unwrap_err();

        match err {
            AppError::GenerationFailed(msg) => assert!(msg.contains("Rate limit reached")),
            other => panic!("expected GenerationFailed, got {other:?}"),
        }
        assert_eq!(llm.calls(), 2);
        let session = sessions.get(id).unwrap();
        assert_eq!(session.state, GenerationState::Failed);
        assert_eq!(session.result.unwrap().output_text, "first resume");
        assert!(session.last_error.unwrap().contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn test_session_can_generate_again_after_failure() {
        let llm = StubGenerator::new(vec![
            Err(LlmError::EmptyContent),
            Ok("second try".to_string()),
        ]);
        let sessions = SessionStore::default();
        let id = sessions.create();

        assert!(generate_resume(&sessions, Some(&llm), id, &request())
            .await
            .is_err());
        let result = generate_resume(&sessions, Some(&llm), id, &request())
            .await
            .unwrap();
        assert_eq!(result.output_text, "second try");
    }

    #[tokio::test]
    async fn test_generation_in_progress_rejects_second_request() {
        let llm = StubGenerator::new(vec![]);
        let sessions = SessionStore::default();
        let id = sessions.create();
        sessions.begin_generation(id).unwrap();

        let err = generate_resume(&sessions, Some(&llm), id, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GenerationInProgress));
        assert_eq!(llm.calls(), 0);
    }

    #[test]
    fn test_download_text_requires_result() {
        let sessions = SessionStore::default();
        let id = sessions.create();
        assert!(matches!(
            download_text(&sessions, id),
            Err(AppError::NoResult)
        ));

        sessions
            .succeed(id, GenerationResult::new("Résumé ✓\n".to_string()))
            .unwrap();
        assert_eq!(download_text(&sessions, id).unwrap(), "Résumé ✓\n".as_bytes());
    }

    #[tokio::test]
    async fn test_download_pdf_without_result_skips_conversion() {
        let sessions = SessionStore::default();
        let id = sessions.create();
        let converter = CountingConverter {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let dir = tempfile::tempdir().unwrap();

        let err = download_pdf(&sessions, &converter, dir.path(), id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoResult));
        assert_eq!(converter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_pdf_converts_stored_text() {
        let sessions = SessionStore::default();
        let id = sessions.create();
        sessions
            .succeed(id, GenerationResult::new("Summary".to_string()))
            .unwrap();
        let converter = CountingConverter {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let dir = tempfile::tempdir().unwrap();

        let bytes = download_pdf(&sessions, &converter, dir.path(), id)
            .await
            .unwrap();
        let body = String::from_utf8(bytes).unwrap();
        assert!(body.starts_with("%PDF-stub"));
        assert!(body.contains("<pre>Summary</pre>"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_pdf_failure_is_export_failed() {
        let sessions = SessionStore::default();
        let id = sessions.create();
        sessions
            .succeed(id, GenerationResult::new("Summary".to_string()))
            .unwrap();
        let converter = CountingConverter {
            calls: AtomicUsize::new(0),
            fail: true,
        };
        let dir = tempfile::tempdir().unwrap();

        let err = download_pdf(&sessions, &converter, dir.path(), id)
            .await
            .unwrap_err();
        match err {
            AppError::ExportFailed(msg) => assert!(msg.contains("wkhtmltopdf not found")),
            other => panic!("expected ExportFailed, got {other:?}"),
        }
        assert_eq!(converter.calls.load(Ordering::SeqCst), 1);
        // The stored result is untouched by an export failure.
        assert_eq!(
            sessions.result(id).unwrap().unwrap().output_text,
            "Summary"
        );
    }
}
