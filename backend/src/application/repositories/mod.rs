pub mod model_repository;
pub mod workspace_repository;

pub use model_repository::ModelRepository;
pub use workspace_repository::{UserRepository, WorkspaceRepository};
