pub mod error;
pub mod model_service;
pub mod semantic_search_service;
pub mod workspace_service;

pub use error::{ServiceError, ServiceResult};
pub use model_service::ModelService;
pub use semantic_search_service::{SemanticSearchConfig, SemanticSearchService};
pub use workspace_service::{
    WorkspaceService, DEFAULT_WORKSPACE_DESCRIPTION, DEFAULT_WORKSPACE_NAME,
};
