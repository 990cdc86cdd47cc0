//! Configuration file parsing for the server.
//!
//! Loads the bind address, completion backend, and generation defaults from
//! TOML. Every key is optional; missing keys take the defaults below.

use quarry_domain::Sampling;
use quarry_llm::ollama::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending key
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Completion backend
    #[serde(default)]
    pub model: ModelConfig,

    /// Generation defaults
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Completion backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Ollama endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Per-request timeout; unset means wait for the model indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Token budget for extraction when the request has none
    #[serde(default = "default_extract_max_tokens")]
    pub extract_max_tokens: u32,

    /// Token budget for RAG when the request has none
    #[serde(default = "default_rag_max_tokens")]
    pub rag_max_tokens: u32,

    /// RAG top-k
    #[serde(default = "default_rag_top_k")]
    pub rag_top_k: u32,

    /// RAG nucleus cut-off
    #[serde(default = "default_rag_top_p")]
    pub rag_top_p: f32,

    /// RAG temperature
    #[serde(default = "default_rag_temperature")]
    pub rag_temperature: f32,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model_name() -> String {
    "mistral:7b-instruct-v0.2".to_string()
}

fn default_extract_max_tokens() -> u32 {
    quarry_extractor::DEFAULT_EXTRACT_MAX_TOKENS
}

fn default_rag_max_tokens() -> u32 {
    quarry_answerer::DEFAULT_RAG_MAX_TOKENS
}

fn default_rag_top_k() -> u32 {
    50
}

fn default_rag_top_p() -> f32 {
    0.95
}

fn default_rag_temperature() -> f32 {
    0.7
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            name: default_model_name(),
            request_timeout_secs: None,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            extract_max_tokens: default_extract_max_tokens(),
            rag_max_tokens: default_rag_max_tokens(),
            rag_top_k: default_rag_top_k(),
            rag_top_p: default_rag_top_p(),
            rag_temperature: default_rag_temperature(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            model: ModelConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Sampling used by the RAG endpoint
    pub fn rag_sampling(&self) -> Sampling {
        Sampling::Stochastic {
            top_k: self.rag_top_k,
            top_p: self.rag_top_p,
            temperature: self.rag_temperature,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "model.name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.generation.extract_max_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "generation.extract_max_tokens",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.generation.rag_max_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "generation.rag_max_tokens",
                reason: "must be greater than 0".to_string(),
            });
        }
        let top_p = self.generation.rag_top_p;
        if !(top_p > 0.0 && top_p <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "generation.rag_top_p",
                reason: format!("{} is outside (0, 1]", top_p),
            });
        }
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Request timeout for the completion backend, if any
    pub fn request_timeout(&self) -> Option<Duration> {
        self.model.request_timeout_secs.map(Duration::from_secs)
    }
}
