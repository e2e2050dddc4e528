/// Semantic search over a user's model records
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::application::dto::ScoredModel;
use crate::application::repositories::ModelRepository;
use crate::domain::base::Entity;
use crate::domain::entities::ModelEntry;
use crate::domain::similarity::rank_by_similarity;
use crate::domain::value_objects::{EmbeddingVector, SearchScope};
use crate::domain::DomainResult;
use crate::infrastructure::embeddings::{model_text, EmbeddingError, EmbeddingGateway};

/// Configuration for the semantic search service
#[derive(Debug, Clone)]
pub struct SemanticSearchConfig {
    /// Upper bound on candidate embeddings in flight at once
    pub max_concurrent_embeddings: usize,
    /// Limit for embedding the query; on expiry the search returns nothing
    pub query_timeout: Option<Duration>,
    /// Limit for embedding one candidate; on expiry the candidate is skipped
    pub candidate_timeout: Option<Duration>,
}

impl Default for SemanticSearchConfig {
    fn default() -> Self {
        SemanticSearchConfig {
            max_concurrent_embeddings: 4,
            query_timeout: None,
            candidate_timeout: None,
        }
    }
}

/// Ranks stored models by cosine similarity between their descriptive text
/// and a free-text query.
///
/// Built once with an embedding gateway and reused; nothing is cached between
/// calls, so every search re-embeds the query and all candidates. Provider
/// failures never escape `search`: a failed query embedding yields no results
/// and a failed candidate embedding drops that candidate. Only record-store
/// errors propagate.
pub struct SemanticSearchService {
    gateway: EmbeddingGateway,
    config: SemanticSearchConfig,
}

impl SemanticSearchService {
    pub fn new(gateway: EmbeddingGateway, config: SemanticSearchConfig) -> Self {
        SemanticSearchService { gateway, config }
    }

    pub fn config(&self) -> &SemanticSearchConfig {
        &self.config
    }

    /// Return up to `top_k` models in `scope` ordered by descending relevance.
    ///
    /// Equal scores keep the repository's order.
    pub async fn search<R: ModelRepository>(
        &self,
        repository: &R,
        scope: &SearchScope,
        query: &str,
        top_k: usize,
    ) -> DomainResult<Vec<ScoredModel>> {
        if query.trim().is_empty() {
            warn!("Semantic search called with an empty query");
            return Ok(Vec::new());
        }
        if top_k == 0 {
            debug!("Semantic search with top_k = 0, nothing to return");
            return Ok(Vec::new());
        }

        let start_time = Instant::now();

        let query_vector = match self
            .gateway
            .embed_within(query, "search query", self.config.query_timeout)
            .await
        {
            Ok(vector) => vector,
            Err(e) => {
                warn!("Semantic search aborted, query could not be embedded: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut candidates = repository.find_all(scope)?;
        if candidates.is_empty() {
            warn!("No models stored for {:?}, semantic search has no candidates", scope);
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        candidates.retain(|model| seen.insert(*model.id()));

        let embeddings = self.embed_candidates(&candidates).await;

        let mut usable = Vec::with_capacity(candidates.len());
        let mut vectors = Vec::with_capacity(candidates.len());
        for (index, result) in embeddings.into_iter().enumerate() {
            let model = &candidates[index];
            match result {
                Some(Ok(vector)) if vector.dimension_count() == query_vector.dimension_count() => {
                    usable.push(index);
                    vectors.push(vector);
                }
                Some(Ok(vector)) => warn!(
                    "Skipping model {} ({}): embedding has {} dimensions, query has {}",
                    model.id(),
                    model.name(),
                    vector.dimension_count(),
                    query_vector.dimension_count()
                ),
                Some(Err(e)) => warn!("Skipping model {} ({}): {}", model.id(), model.name(), e),
                None => warn!(
                    "Skipping model {} ({}): embedding task did not complete",
                    model.id(),
                    model.name()
                ),
            }
        }

        if vectors.is_empty() {
            warn!(
                "All {} candidate models failed to embed, semantic search has no results",
                candidates.len()
            );
            return Ok(Vec::new());
        }

        let results: Vec<ScoredModel> = rank_by_similarity(&query_vector, &vectors)
            .into_iter()
            .take(top_k)
            .map(|ranked| ScoredModel::new(&candidates[usable[ranked.index]], ranked.score))
            .collect();

        info!(
            "Semantic search ranked {}/{} models, returning {} in {}ms",
            vectors.len(),
            candidates.len(),
            results.len(),
            start_time.elapsed().as_millis()
        );

        Ok(results)
    }

    /// Embed every candidate with bounded concurrency.
    ///
    /// The returned vector is indexed like `candidates`; `None` marks a task
    /// that ended without reporting back. Dropping the future aborts every
    /// task still queued or running.
    async fn embed_candidates(
        &self,
        candidates: &[ModelEntry],
    ) -> Vec<Option<Result<EmbeddingVector, EmbeddingError>>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_embeddings.max(1)));
        let mut tasks = JoinSet::new();

        for (index, model) in candidates.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let gateway = self.gateway.clone();
            let timeout = self.config.candidate_timeout;
            let text = model_text(model);
            let subject = format!("model {} ({})", model.id(), model.name());

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return None;
                };
                let result = gateway.embed_within(&text, &subject, timeout).await;
                Some((index, result))
            });
        }

        let mut results: Vec<Option<Result<EmbeddingVector, EmbeddingError>>> =
            (0..candidates.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some((index, result))) => results[index] = Some(result),
                Ok(None) => {}
                Err(e) => warn!("Embedding task failed: {}", e),
            }
        }
        results
    }
}
