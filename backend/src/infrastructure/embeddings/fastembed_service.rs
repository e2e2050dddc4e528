/// Local embeddings through fastembed's ONNX models
use anyhow::{Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::provider::{EmbeddingError, EmbeddingProvider};
use crate::domain::value_objects::{EmbeddingModel, EmbeddingVector};

/// Embedding provider running a sentence-transformer model in-process.
///
/// Inference is CPU-bound, so every call runs on the blocking pool. The model
/// handle is locked only inside that blocking section.
pub struct FastEmbedService {
    model: Arc<Mutex<TextEmbedding>>,
    model_type: EmbeddingModel,
}

impl FastEmbedService {
    /// Load `model_type`, downloading it into the fastembed cache on first use
    pub async fn new(model_type: EmbeddingModel) -> Result<Self> {
        info!("Loading local embedding model {}", model_type);

        let options = InitOptions::new(match model_type {
            EmbeddingModel::AllMiniLML6V2 => FastEmbedModel::AllMiniLML6V2,
        })
        .with_show_download_progress(true);

        let model = tokio::task::spawn_blocking(move || TextEmbedding::try_new(options))
            .await
            .context("Embedding model loader panicked")?
            .with_context(|| format!("Failed to load embedding model {}", model_type))?;

        info!(
            "Local embedding model {} ready ({} dimensions)",
            model_type,
            model_type.dimension_count()
        );

        Ok(FastEmbedService {
            model: Arc::new(Mutex::new(model)),
            model_type,
        })
    }

    pub async fn new_default() -> Result<Self> {
        Self::new(EmbeddingModel::default()).await
    }

    pub fn model_type(&self) -> EmbeddingModel {
        self.model_type
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedService {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        debug!("Running local embedding on {} chars", text.len());

        let model = Arc::clone(&self.model);
        let input = text.to_string();
        let embeddings = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| EmbeddingError::Provider("embedding model lock poisoned".to_string()))?;
            model
                .embed(vec![input], None)
                .map_err(|e| EmbeddingError::Provider(e.to_string()))
        })
        .await
        .map_err(|e| EmbeddingError::Provider(format!("embedding task failed: {}", e)))??;

        let values = embeddings.into_iter().next().ok_or_else(|| {
            EmbeddingError::MalformedResponse("model returned no embedding".to_string())
        })?;

        let vector = EmbeddingVector::from_f32(values)?;
        let expected = self.model_type.dimension_count();
        if vector.dimension_count() != expected {
            return Err(EmbeddingError::InvalidVector(format!(
                "expected {} dimensions, got {}",
                expected,
                vector.dimension_count()
            )));
        }

        Ok(vector)
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.model_type.dimension_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Downloads the ONNX model on first use
    async fn test_loads_default_model() {
        let service = FastEmbedService::new_default().await.unwrap();

        assert_eq!(service.model_type(), EmbeddingModel::AllMiniLML6V2);
        assert_eq!(service.dimension(), Some(384));
    }

    #[tokio::test]
    #[ignore] // Downloads the ONNX model on first use
    async fn test_embeds_model_description() {
        let service = FastEmbedService::new_default().await.unwrap();

        let vector = service
            .embed("Llama 3 open-weights decoder-only language model Meta")
            .await
            .unwrap();

        assert_eq!(vector.dimension_count(), 384);
    }

    #[tokio::test]
    #[ignore] // Downloads the ONNX model on first use
    async fn test_related_descriptions_are_closer() {
        let service = FastEmbedService::new_default().await.unwrap();

        let classifier = service
            .embed("A convolutional network for image classification.")
            .await
            .unwrap();
        let vision = service.embed("Vision model that labels pictures.").await.unwrap();
        let finance = service
            .embed("Quarterly revenue grew in the retail segment.")
            .await
            .unwrap();

        let related = classifier.cosine_similarity(&vision).unwrap();
        let unrelated = classifier.cosine_similarity(&finance).unwrap();

        assert!(related > unrelated);
    }
}
