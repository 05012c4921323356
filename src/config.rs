use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_SESSION_PATH: &str = ".rutina/session.toml";

/// Runtime settings resolved from the environment.
///
/// `.env` files are loaded by `main` before this runs, so plain environment
/// variables and dotenv entries are treated the same way.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the training-management backend.
    pub api_base_url: String,
    /// Location of the persisted session file (token + identity).
    pub session_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_base_url = match env::var("RUTINA_API_URL") {
            Ok(url) if url.trim().is_empty() => {
                return Err(AppError::Config("RUTINA_API_URL is set but empty".to_string()));
            }
            Ok(url) => url,
            Err(_) => DEFAULT_API_URL.to_string(),
        };

        let session_path = env::var("RUTINA_SESSION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_PATH));

        Ok(Self {
            api_base_url,
            session_path,
        })
    }
}
