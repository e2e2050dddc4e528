/// Hosted embeddings through the Gemini `embedContent` endpoint
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::provider::{EmbeddingError, EmbeddingProvider};
use crate::domain::value_objects::EmbeddingVector;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "text-embedding-004";
pub const DEFAULT_GEMINI_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for the Gemini embedding client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// API root, without a trailing slash
    pub base_url: String,
    pub model: String,
    /// Whole-request limit applied by the HTTP client
    pub request_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        GeminiConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            request_timeout: DEFAULT_GEMINI_REQUEST_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        self.base_url = base_url;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f64>,
}

/// Embedding provider backed by the Gemini REST API
pub struct GeminiEmbeddingClient {
    config: GeminiConfig,
    http: Client,
}

impl GeminiEmbeddingClient {
    pub fn new(config: GeminiConfig) -> Result<Self, EmbeddingError> {
        info!(
            "Initializing Gemini embedding client with model: {}",
            config.model
        );
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EmbeddingError::Provider(format!("HTTP client setup failed: {}", e)))?;
        Ok(GeminiEmbeddingClient { config, http })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:embedContent",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        debug!("Requesting Gemini embedding (length: {})", text.len());

        let payload = EmbedContentRequest {
            model: format!("models/{}", self.config.model),
            content: Content {
                parts: [Part { text }],
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                EmbeddingError::Provider(format!("request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbeddingError::Provider("rate limited by Gemini".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Provider(format!(
                "embedding HTTP {}: {}",
                status, body
            )));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        Ok(EmbeddingVector::new(parsed.embedding.values)?)
    }
}
