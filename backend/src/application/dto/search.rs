use super::model::ModelFilter;
use crate::domain::value_objects::SearchScope;

/// Number of results returned when the caller does not ask for a specific amount
pub const DEFAULT_TOP_K: usize = 5;

/// Type of search to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Keyword-based traditional search
    Traditional,
    /// Vector/embedding-based semantic search
    Semantic,
}

/// Search request parameters
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// The search query text
    pub query: String,
    /// Type of search (traditional or semantic)
    pub search_type: SearchType,
    /// Maximum number of results; 0 yields no results
    pub top_k: usize,
    /// Records the caller is allowed to see
    pub scope: SearchScope,
    /// Restrict keyword results to this model type
    pub model_type: Option<String>,
    /// Restrict keyword results to models carrying all of these tags
    pub tags: Vec<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, scope: SearchScope) -> Self {
        Self {
            query: query.into(),
            search_type: SearchType::Traditional,
            top_k: DEFAULT_TOP_K,
            scope,
            model_type: None,
            tags: Vec::new(),
        }
    }

    pub fn with_search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = Some(model_type.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// The keyword filter this request describes
    pub fn keyword_filter(&self) -> ModelFilter {
        ModelFilter {
            query: Some(self.query.clone()),
            model_type: self.model_type.clone(),
            workspace_id: self.scope.workspace_id().copied(),
            tags: self.tags.clone(),
        }
    }
}
