//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use mindmate_core::ReplyStyle;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Settings for the OpenAI chat-completions provider.
#[derive(Clone, Debug)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Settings for a local Ollama server.
#[derive(Clone, Debug)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

/// Which generative text provider, if any, backs the chat replies.
#[derive(Clone, Debug)]
pub enum LlmProvider {
    OpenAi(OpenAiSettings),
    Ollama(OllamaSettings),
    Disabled,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub static_dir: PathBuf,
    pub reply_style: ReplyStyle,
    pub memory_hints: bool,
    pub llm_timeout: Duration,
    /// Chat sessions idle for longer than this are discarded.
    pub session_idle: Duration,
    pub llm_provider: LlmProvider,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Server, Database and Logging ---
        let bind_address: SocketAddr = parse_var("BIND_ADDRESS", &var_or("BIND_ADDRESS", "127.0.0.1:5000"))?;

        let database_url = var_or("DATABASE_URL", "sqlite://database.db?mode=rwc");
        if database_url.trim().is_empty() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let static_dir = PathBuf::from(var_or("STATIC_DIR", "static"));

        // --- Chat Behaviour ---
        let reply_style = var_or("REPLY_STYLE", "detailed")
            .parse::<ReplyStyle>()
            .map_err(|e| ConfigError::InvalidValue("REPLY_STYLE".to_string(), e))?;
        let memory_hints: bool = parse_var("MEMORY_HINTS", &var_or("MEMORY_HINTS", "true"))?;
        let timeout_secs: u64 = parse_var("LLM_TIMEOUT_SECS", &var_or("LLM_TIMEOUT_SECS", "60"))?;
        let session_idle_secs: u64 =
            parse_var("SESSION_IDLE_SECS", &var_or("SESSION_IDLE_SECS", "1800"))?;

        // --- Generative Provider (optional) ---
        let llm_provider = if let Some(api_key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            LlmProvider::OpenAi(OpenAiSettings {
                api_key,
                model: var_or("OPENAI_MODEL", "gpt-4o-mini"),
                temperature: parse_var("OPENAI_TEMPERATURE", &var_or("OPENAI_TEMPERATURE", "0.7"))?,
                max_tokens: parse_var("OPENAI_MAX_TOKENS", &var_or("OPENAI_MAX_TOKENS", "500"))?,
            })
        } else if let Some(base_url) = lookup("OLLAMA_BASE_URL").filter(|u| !u.trim().is_empty()) {
            LlmProvider::Ollama(OllamaSettings {
                base_url,
                model: var_or("OLLAMA_MODEL", "llama3.2"),
                temperature: parse_var("OLLAMA_TEMPERATURE", &var_or("OLLAMA_TEMPERATURE", "0.7"))?,
            })
        } else {
            LlmProvider::Disabled
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            static_dir,
            reply_style,
            memory_hints,
            llm_timeout: Duration::from_secs(timeout_secs),
            session_idle: Duration::from_secs(session_idle_secs),
            llm_provider,
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}
