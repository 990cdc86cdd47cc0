//! HTTP request handlers for the query and RAG services.
//!
//! Every response is HTTP 200; failures are reported in the body.

use crate::config::ServerConfig;
use crate::request::{coerce_max_tokens, RagRequest};
use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use quarry_answerer::RagAnswerer;
use quarry_domain::{CompletionService, QueryDescriptor};
use quarry_extractor::QueryExtractor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Message for a request without a usable `query`
pub const MISSING_QUERY: &str = "Missing 'query' in request body";

/// Message for a request body that could not be processed
pub const PROCESSING_FAILED: &str = "Failed to process query.";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Question-to-descriptor pipeline
    pub extractor: QueryExtractor<dyn CompletionService>,
    /// RAG pipeline
    pub answerer: RagAnswerer<dyn CompletionService>,
    /// Extraction budget when the request has none
    pub extract_max_tokens: u32,
    /// RAG budget when the request has none
    pub rag_max_tokens: u32,
    /// Model name reported by the health check
    pub model_name: Arc<str>,
}

impl AppState {
    /// Build state around a completion service loaded at start-up
    pub fn new(service: Arc<dyn CompletionService>, config: &ServerConfig) -> Self {
        Self {
            extractor: QueryExtractor::new(Arc::clone(&service)),
            answerer: RagAnswerer::new(service).with_sampling(config.generation.rag_sampling()),
            extract_max_tokens: config.generation.extract_max_tokens,
            rag_max_tokens: config.generation.rag_max_tokens,
            model_name: Arc::from(config.model.name.as_str()),
        }
    }
}

/// Response of `POST /extract_mongo`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ExtractResponse {
    /// Extraction ran (possibly yielding the default descriptor)
    Query {
        /// Inferred descriptor
        mongo_query: QueryDescriptor,
    },
    /// The request itself was unusable
    Error {
        /// Error message
        error: String,
        /// Underlying cause, when there is one
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl ExtractResponse {
    fn error(error: impl Into<String>, details: Option<String>) -> Self {
        ExtractResponse::Error {
            error: error.into(),
            details,
        }
    }
}

/// Response of `POST /rag`
#[derive(Debug, Serialize, Deserialize)]
pub struct RagResponse {
    /// Answer text, or `Error: <message>`
    pub answer: String,
}

impl RagResponse {
    fn error(message: impl std::fmt::Display) -> Self {
        Self {
            answer: format!("Error: {}", message),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Configured model
    pub model: String,
}

/// POST /extract_mongo - Convert a question into a query descriptor
async fn extract_mongo(State(state): State<AppState>, body: Bytes) -> Json<ExtractResponse> {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            error!("Error: {}", e);
            return Json(ExtractResponse::error(PROCESSING_FAILED, Some(e.to_string())));
        }
    };
    info!("Incoming body: {}", body);

    let Some(fields) = body.as_object() else {
        return Json(ExtractResponse::error(
            PROCESSING_FAILED,
            Some("request body must be a JSON object".to_string()),
        ));
    };

    let query = match fields.get("query") {
        Some(Value::String(query)) if !query.is_empty() => query,
        _ => return Json(ExtractResponse::error(MISSING_QUERY, None)),
    };
    let max_tokens = coerce_max_tokens(fields.get("max_tokens"), state.extract_max_tokens);

    let mongo_query = state.extractor.extract(query, max_tokens).await;
    Json(ExtractResponse::Query { mongo_query })
}

/// POST /rag - Answer a question from supplied context
async fn rag(State(state): State<AppState>, body: Bytes) -> Json<RagResponse> {
    let request: RagRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!("Invalid RAG request: {}", e);
            return Json(RagResponse::error(format!("Invalid request: {}", e)));
        }
    };
    info!(
        "Received request: query={:?}, context_len={}",
        request.query,
        request.context.len()
    );

    let max_tokens = coerce_max_tokens(request.max_tokens.as_ref(), state.rag_max_tokens);

    match state
        .answerer
        .answer(&request.query, &request.context, max_tokens)
        .await
    {
        Ok(answer) => Json(RagResponse { answer }),
        Err(e) => {
            error!("Error in endpoint: {}", e);
            Json(RagResponse::error(e))
        }
    }
}

/// GET /health - Liveness check
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        model: state.model_name.to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/extract_mongo", post(extract_mongo))
        .route("/rag", post(rag))
        .route("/health", get(health_check))
        .with_state(state)
}
