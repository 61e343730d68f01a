use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::api_client::SaveIdKey;

/// Application configuration loaded from environment variables (and `.env`
/// when present). Fails at startup if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub session_path: PathBuf,
    pub search_debounce: Duration,
    pub http_timeout: Duration,
    pub save_id_key: SaveIdKey,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base: require_env("JOBHIVE_API_BASE")?,
            session_path: PathBuf::from(
                std::env::var("JOBHIVE_SESSION_PATH")
                    .unwrap_or_else(|_| ".jobhive_session.json".to_string()),
            ),
            search_debounce: Duration::from_millis(
                env_or("JOBHIVE_SEARCH_DEBOUNCE_MS", "300")
                    .parse::<u64>()
                    .context("JOBHIVE_SEARCH_DEBOUNCE_MS must be a number of milliseconds")?,
            ),
            http_timeout: Duration::from_secs(
                env_or("JOBHIVE_HTTP_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("JOBHIVE_HTTP_TIMEOUT_SECS must be a number of seconds")?,
            ),
            save_id_key: env_or("JOBHIVE_SAVE_ID_KEY", "seeker_id")
                .parse::<SaveIdKey>()
                .map_err(|e| anyhow!(e))
                .context("JOBHIVE_SAVE_ID_KEY is invalid")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
