pub mod model;
pub mod search;

pub use model::{
    ModelDraft, ModelFilter, ModelPatch, ModelView, ScoredModel, WorkspacePatch, WorkspaceView,
};
pub use search::{SearchRequest, SearchType, DEFAULT_TOP_K};
