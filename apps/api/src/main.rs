mod config;
mod errors;
mod export;
mod generation;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::WkhtmltopdfConverter;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Agent v{}", env!("CARGO_PKG_VERSION"));

    // A missing key is reported on each generate request, not here.
    let llm: Option<Arc<dyn TextGenerator>> = match &config.openai_api_key {
        Some(key) => {
            let client: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(
                key.clone(),
                &config.openai_base_url,
                &config.model,
            ));
            info!("LLM client initialized (model: {})", client.model());
            Some(client)
        }
        None => {
            warn!("OPENAI_API_KEY is not set; resume generation will be unavailable");
            None
        }
    };

    let converter = Arc::new(WkhtmltopdfConverter::new(&config.wkhtmltopdf_bin));
    info!(
        "PDF export via {} into {}",
        config.wkhtmltopdf_bin,
        config.export_dir.display()
    );

    info!(
        "Sessions expire after {}s idle, capped at {}",
        config.session_idle_ttl.as_secs(),
        config.max_sessions
    );

    let state = AppState {
        llm,
        converter,
        sessions: SessionStore::with_limits(config.session_idle_ttl, config.max_sessions),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
