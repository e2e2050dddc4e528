/// Embeddings infrastructure for semantic search
mod fastembed_service;
mod gemini_client;
mod provider;
mod text_projector;

pub use fastembed_service::FastEmbedService;
pub use gemini_client::{
    GeminiConfig, GeminiEmbeddingClient, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
};
pub use provider::{EmbeddingError, EmbeddingGateway, EmbeddingProvider};
pub use text_projector::model_text;
