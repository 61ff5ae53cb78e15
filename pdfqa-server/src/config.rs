//! Service configuration read from environment variables.

use std::fmt;
use std::path::PathBuf;

use pdfqa_telemetry::LogFormat;
use thiserror::Error;

use crate::server::ServerConfig;

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LLM_NAME: &str = "gpt-3.5-turbo-0301";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_INDEX_NAME: &str = "docs";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid { var: &'static str, value: String, reason: String },
}

/// Everything the binary needs to wire up the service.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub openai_key: String,
    pub openai_base_url: String,
    pub redis_url: String,
    pub host: String,
    pub port: u16,
    pub llm_name: String,
    pub llm_temperature: f32,
    pub embedding_model: String,
    pub index_name: String,
    pub prompt_template_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("redis_url", &self.redis_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("llm_name", &self.llm_name)
            .field("llm_temperature", &self.llm_temperature)
            .field("embedding_model", &self.embedding_model)
            .field("index_name", &self.index_name)
            .field("prompt_template_path", &self.prompt_template_path)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let openai_key = get("OPENAI_KEY").ok_or(ConfigError::Missing("OPENAI_KEY"))?;

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let llm_temperature = match get("LLM_TEMPERATURE") {
            Some(raw) => parse_temperature(&raw)?,
            None => 0.0,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| ConfigError::Invalid {
                var: "LOG_FORMAT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            openai_key,
            openai_base_url: or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            redis_url: or("REDIS_URL", DEFAULT_REDIS_URL),
            host: or("HOST", DEFAULT_HOST),
            port,
            llm_name: or("LLM_NAME", DEFAULT_LLM_NAME),
            llm_temperature,
            embedding_model: or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            index_name: or("INDEX_NAME", DEFAULT_INDEX_NAME),
            prompt_template_path: get("PROMPT_TEMPLATE_PATH").map(PathBuf::from),
            log_format,
        })
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig { host: self.host.clone(), port: self.port }
    }
}

fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "LLM_TEMPERATURE",
        value: raw.to_string(),
        reason,
    };
    let value = raw.trim().parse::<f32>().map_err(|e| invalid(e.to_string()))?;
    if !(0.0..=2.0).contains(&value) {
        return Err(invalid("must be between 0 and 2".into()));
    }
    Ok(value)
}
