use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::session::{DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Application configuration loaded from environment variables.
///
/// The OpenAI key is optional here: a missing key is reported per request,
/// never at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub port: u16,
    pub rust_log: String,
    pub export_dir: PathBuf,
    pub wkhtmltopdf_bin: String,
    pub session_idle_ttl: Duration,
    pub max_sessions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: optional_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            export_dir: optional_env("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("exports")),
            wkhtmltopdf_bin: optional_env("WKHTMLTOPDF_BIN")
                .unwrap_or_else(|| "wkhtmltopdf".to_string()),
            session_idle_ttl: match optional_env("SESSION_IDLE_TTL_SECS") {
                Some(v) => Duration::from_secs(
                    v.parse::<u64>()
                        .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
                ),
                None => DEFAULT_IDLE_TTL,
            },
            max_sessions: match optional_env("MAX_SESSIONS") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_SESSIONS must be a positive integer")?,
                None => DEFAULT_MAX_SESSIONS,
            },
        })
    }
}

/// Reads an env var, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
