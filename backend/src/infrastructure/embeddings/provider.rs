/// Embedding provider contract and the gateway that applies the failure policy
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::domain::{base::DomainError, value_objects::EmbeddingVector};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    #[error("Embedding input is empty")]
    EmptyInput,

    #[error("Embedding provider error: {0}")]
    Provider(String),

    #[error("Malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("Invalid embedding vector: {0}")]
    InvalidVector(String),

    #[error("Embedding timed out after {0:?}")]
    Timeout(Duration),
}

impl From<DomainError> for EmbeddingError {
    fn from(error: DomainError) -> Self {
        EmbeddingError::InvalidVector(error.to_string())
    }
}

/// A text embedding capability: text in, fixed-length vector out.
///
/// Implementations are shared across concurrent calls and must not retry.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;

    /// Dimension of the vectors this provider returns, when known up front
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// Front door to an [`EmbeddingProvider`].
///
/// Rejects empty text without contacting the provider, applies an optional
/// per-call timeout and logs every failure against the subject being embedded.
/// Failures are returned as values; nothing here panics on provider errors.
#[derive(Clone)]
pub struct EmbeddingGateway {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingGateway {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        EmbeddingGateway { provider }
    }

    pub fn dimension(&self) -> Option<usize> {
        self.provider.dimension()
    }

    pub async fn embed(&self, text: &str, subject: &str) -> Result<EmbeddingVector, EmbeddingError> {
        self.embed_within(text, subject, None).await
    }

    /// Embed `text`, giving up after `timeout` if one is set
    pub async fn embed_within(
        &self,
        text: &str,
        subject: &str,
        timeout: Option<Duration>,
    ) -> Result<EmbeddingVector, EmbeddingError> {
        if text.trim().is_empty() {
            warn!("Refusing to embed empty text for {}", subject);
            return Err(EmbeddingError::EmptyInput);
        }

        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, self.provider.embed(text))
                .await
                .unwrap_or(Err(EmbeddingError::Timeout(limit))),
            None => self.provider.embed(text).await,
        };

        match &result {
            Ok(vector) => debug!(
                "Embedded {} ({} chars, {} dimensions)",
                subject,
                text.len(),
                vector.dimension_count()
            ),
            Err(e) => error!("Failed to generate embedding for {}: {}", subject, e),
        }

        result
    }
}
