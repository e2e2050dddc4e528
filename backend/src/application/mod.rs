pub mod dto;
pub mod repositories;
pub mod services;
pub mod use_cases;

// Re-export key types to avoid naming conflicts
pub use dto::{
    ModelDraft, ModelFilter, ModelPatch, ModelView, ScoredModel, SearchRequest, SearchType,
    WorkspacePatch, WorkspaceView,
};
pub use repositories::{ModelRepository, UserRepository, WorkspaceRepository};
pub use services::{
    ModelService, SemanticSearchConfig, SemanticSearchService, ServiceError, ServiceResult,
    WorkspaceService,
};
pub use use_cases::SearchModels;
