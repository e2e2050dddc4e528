use std::cmp::Ordering;
use std::sync::Arc;
use tracing::warn;

use crate::application::{
    dto::{ScoredModel, SearchRequest, SearchType},
    repositories::ModelRepository,
    services::SemanticSearchService,
};
use crate::domain::{entities::ModelEntry, DomainResult};

/// Use case for searching a user's models
///
/// Traditional search filters by keyword and scores by how well the name
/// matches. Semantic search is delegated to a [`SemanticSearchService`] when
/// one is configured; otherwise it falls back to the keyword path.
pub struct SearchModels<'a, R: ModelRepository> {
    repository: &'a R,
    semantic: Option<Arc<SemanticSearchService>>,
}

impl<'a, R: ModelRepository> SearchModels<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self {
            repository,
            semantic: None,
        }
    }

    pub fn with_semantic_search(repository: &'a R, semantic: Arc<SemanticSearchService>) -> Self {
        Self {
            repository,
            semantic: Some(semantic),
        }
    }

    /// Execute a search request and return at most `top_k` scored models
    pub async fn execute(&self, request: SearchRequest) -> DomainResult<Vec<ScoredModel>> {
        match (request.search_type, self.semantic.as_ref()) {
            (SearchType::Semantic, Some(semantic)) => {
                semantic
                    .search(self.repository, &request.scope, &request.query, request.top_k)
                    .await
            }
            (SearchType::Semantic, None) => {
                warn!("Semantic search requested but not configured, using keyword search");
                self.traditional_search(&request)
            }
            (SearchType::Traditional, _) => self.traditional_search(&request),
        }
    }

    fn traditional_search(&self, request: &SearchRequest) -> DomainResult<Vec<ScoredModel>> {
        let filter = request.keyword_filter();
        let query = request.query.trim().to_lowercase();

        let mut results: Vec<ScoredModel> = self
            .repository
            .find_all(&request.scope)?
            .iter()
            .filter(|model| filter.matches(model))
            .map(|model| ScoredModel::new(model, Self::keyword_score(model, &query)))
            .collect();

        // Sort by score (highest first); equal scores keep store order
        results.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
        });
        results.truncate(request.top_k);

        Ok(results)
    }

    fn keyword_score(model: &ModelEntry, query: &str) -> f64 {
        let name = model.name().to_lowercase();
        if name == query {
            1.0 // Exact match
        } else if !query.is_empty() && name.starts_with(query) {
            0.9 // Prefix match
        } else {
            0.7
        }
    }
}
