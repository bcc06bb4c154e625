//! # Client Configuration
//!
//! Settings for the session client, read from the environment (`.env` is
//! honoured).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Delay between a login response and revealing its outcome.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the FreelanceHub backend.
    pub api_url: String,
    /// File backing durable session storage.
    pub session_file: PathBuf,
    pub reveal_delay: Duration,
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url =
            env::var("FREELANCEHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let session_file = match env::var("FREELANCEHUB_SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => Self::default_session_file()
                .context("could not determine a data directory; set FREELANCEHUB_SESSION_FILE")?,
        };

        let reveal_delay = env::var("FREELANCEHUB_REVEAL_DELAY_MS")
            .ok()
            .map(|ms| ms.parse::<u64>())
            .transpose()
            .context("FREELANCEHUB_REVEAL_DELAY_MS must be a valid number")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REVEAL_DELAY);

        let http_timeout = env::var("FREELANCEHUB_HTTP_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .context("FREELANCEHUB_HTTP_TIMEOUT_SECONDS must be a valid number")?;

        Ok(Self {
            api_url,
            session_file,
            reveal_delay,
            http_timeout,
        })
    }

    fn default_session_file() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("freelancehub").join("session.json"))
    }
}
