/// Runtime configuration read from the environment
use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::application::services::SemanticSearchConfig;
use crate::infrastructure::embeddings::{
    EmbeddingGateway, FastEmbedService, GeminiConfig, GeminiEmbeddingClient,
};

pub const DEFAULT_DATABASE_PATH: &str = "trackml.db";

/// Which embedding backend powers semantic search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Local ONNX model through fastembed
    #[default]
    FastEmbed,
    /// Hosted Gemini embeddings, needs `GOOGLE_API_KEY`
    Gemini,
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fastembed" => Ok(ProviderKind::FastEmbed),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(anyhow!("Unknown embedding provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub provider: ProviderKind,
    pub google_api_key: Option<String>,
    pub search: SemanticSearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            provider: ProviderKind::default(),
            google_api_key: None,
            search: SemanticSearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read `TRACKML_*` variables and `GOOGLE_API_KEY` from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("TRACKML_DATABASE") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(provider) = lookup("TRACKML_EMBEDDING_PROVIDER") {
            config.provider = provider.parse()?;
        }
        config.google_api_key = lookup("GOOGLE_API_KEY").filter(|key| !key.trim().is_empty());

        if let Some(limit) = lookup("TRACKML_MAX_CONCURRENT_EMBEDDINGS") {
            let limit: usize = limit
                .trim()
                .parse()
                .with_context(|| format!("Invalid TRACKML_MAX_CONCURRENT_EMBEDDINGS: {}", limit))?;
            if limit == 0 {
                bail!("TRACKML_MAX_CONCURRENT_EMBEDDINGS must be at least 1");
            }
            config.search.max_concurrent_embeddings = limit;
        }
        if let Some(secs) = lookup("TRACKML_EMBEDDING_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid TRACKML_EMBEDDING_TIMEOUT_SECS: {}", secs))?;
            if secs == 0 {
                bail!("TRACKML_EMBEDDING_TIMEOUT_SECS must be at least 1");
            }
            let timeout = Some(Duration::from_secs(secs));
            config.search.query_timeout = timeout;
            config.search.candidate_timeout = timeout;
        }

        Ok(config)
    }

    /// Construct the configured embedding provider behind a gateway
    pub async fn embedding_gateway(&self) -> Result<EmbeddingGateway> {
        match self.provider {
            ProviderKind::FastEmbed => {
                let service = FastEmbedService::new_default()
                    .await
                    .context("Failed to initialize local embeddings")?;
                Ok(EmbeddingGateway::new(Arc::new(service)))
            }
            ProviderKind::Gemini => {
                let api_key = self
                    .google_api_key
                    .clone()
                    .context("GOOGLE_API_KEY is required for the gemini provider")?;
                info!("Using Gemini embeddings");
                let client = GeminiEmbeddingClient::new(GeminiConfig::new(api_key))
                    .context("Failed to initialize Gemini embeddings")?;
                Ok(EmbeddingGateway::new(Arc::new(client)))
            }
        }
    }
}
