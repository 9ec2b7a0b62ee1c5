//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Directory the JSON collection documents live in
    pub data_dir: String,

    /// Gemini API key; absent means the AI endpoints answer with fallbacks
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    pub gemini_model: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("ATELIER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ATELIER_PORT".to_string()))?,

            data_dir: env::var("ATELIER_DATA_DIR").unwrap_or_else(|_| "data".to_string()),

            gemini_api_key: env::var("ATELIER_GEMINI_API_KEY")
                .or_else(|_| env::var("GEMINI_API_KEY"))
                .ok(),

            gemini_model: env::var("ATELIER_GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
