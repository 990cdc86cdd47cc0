//! Ollama Provider Implementation
//!
//! Sends prompts to Ollama's `/api/generate` endpoint in raw mode, so the
//! instruction envelope built by the pipelines reaches the model untouched.
//!
//! # Examples
//!
//! ```no_run
//! use quarry_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "mistral:7b-instruct-v0.2-fp16")
//!     .expect("valid client configuration");
//! ```

use async_trait::async_trait;
use quarry_domain::{CompletionError, CompletionService, Sampling};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Ollama API provider
///
/// Each call is attempted exactly once; failures are returned to the caller.
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    raw: bool,
    options: GenerateOptions,
}

/// Decoding options understood by Ollama
#[derive(Debug, Serialize, PartialEq)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
    top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

impl GenerateOptions {
    fn new(max_new_tokens: u32, sampling: &Sampling) -> Self {
        match *sampling {
            Sampling::Greedy => Self {
                num_predict: max_new_tokens,
                temperature: 0.0,
                top_k: 1,
                top_p: None,
            },
            Sampling::Stochastic {
                top_k,
                top_p,
                temperature,
            } => Self {
                num_predict: max_new_tokens,
                temperature,
                top_k,
                top_p: Some(top_p),
            },
        }
    }
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider with no request timeout
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "mistral")
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        Self::with_timeout(endpoint, model, None)
    }

    /// Create a new Ollama provider, optionally bounding each request
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, CompletionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CompletionError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    /// Model name sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Base endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionService for OllamaProvider {
    async fn complete(
        &self,
        prompt: &str,
        max_new_tokens: u32,
        sampling: &Sampling,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            raw: true,
            options: GenerateOptions::new(max_new_tokens, sampling),
        };

        debug!("POST {} (num_predict={})", url, max_new_tokens);

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CompletionError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CompletionError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }
}
