use std::sync::Arc;

use crate::config::Config;
use crate::export::DocumentConverter;
use crate::llm_client::TextGenerator;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no OpenAI key was configured; generate requests then fail
    /// with `MissingCredential`.
    pub llm: Option<Arc<dyn TextGenerator>>,
    pub converter: Arc<dyn DocumentConverter>,
    pub sessions: SessionStore,
    pub config: Config,
}
