use crate::domain::{
    base::{Entity, Owned},
    entities::{ModelDetails, ModelEntry, Workspace, DEFAULT_MODEL_STATUS},
    value_objects::{ModelId, UserId, WorkspaceId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The full, serializable field set of a model record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelView {
    pub id: ModelId,
    pub name: String,
    pub developer: Option<String>,
    pub model_type: Option<String>,
    pub status: String,
    pub date_interacted: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub source_links: Vec<String>,
    pub parameters: Option<i64>,
    pub license: Option<String>,
    pub version: Option<String>,
    pub user_id: UserId,
    pub workspace_id: Option<WorkspaceId>,
}

impl From<&ModelEntry> for ModelView {
    fn from(model: &ModelEntry) -> Self {
        let details = model.details().clone();
        ModelView {
            id: *model.id(),
            name: details.name,
            developer: details.developer,
            model_type: details.model_type,
            status: details.status,
            date_interacted: details.date_interacted,
            tags: details.tags,
            notes: details.notes,
            source_links: details.source_links,
            parameters: details.parameters,
            license: details.license,
            version: details.version,
            user_id: *model.owner(),
            workspace_id: model.workspace_id().copied(),
        }
    }
}

/// A model record together with its relevance to a search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredModel {
    #[serde(flatten)]
    pub model: ModelView,
    pub relevance_score: f64,
}

impl ScoredModel {
    pub fn new(model: &ModelEntry, relevance_score: f64) -> Self {
        ScoredModel {
            model: ModelView::from(model),
            relevance_score,
        }
    }
}

/// Input for creating a model record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelDraft {
    pub name: String,
    pub developer: Option<String>,
    pub model_type: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub source_links: Vec<String>,
    pub parameters: Option<i64>,
    pub license: Option<String>,
    pub version: Option<String>,
    pub workspace_id: Option<WorkspaceId>,
}

impl ModelDraft {
    pub fn new(name: impl Into<String>) -> Self {
        ModelDraft {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn into_details(self, today: NaiveDate) -> ModelDetails {
        ModelDetails {
            name: self.name,
            developer: self.developer,
            model_type: self.model_type,
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_MODEL_STATUS.to_string()),
            date_interacted: Some(today),
            tags: self.tags,
            notes: self.notes,
            source_links: self.source_links,
            parameters: self.parameters,
            license: self.license,
            version: self.version,
        }
    }
}

/// Partial update of a model record; only present fields are applied
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelPatch {
    pub name: Option<String>,
    pub developer: Option<String>,
    pub model_type: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub source_links: Option<Vec<String>>,
    pub parameters: Option<i64>,
    pub license: Option<String>,
    pub version: Option<String>,
    pub workspace_id: Option<WorkspaceId>,
}

impl ModelPatch {
    pub fn apply_to(self, details: &mut ModelDetails) {
        if let Some(name) = self.name {
            details.name = name;
        }
        if let Some(developer) = self.developer {
            details.developer = Some(developer);
        }
        if let Some(model_type) = self.model_type {
            details.model_type = Some(model_type);
        }
        if let Some(status) = self.status {
            details.status = status;
        }
        if let Some(tags) = self.tags {
            details.tags = tags;
        }
        if let Some(notes) = self.notes {
            details.notes = Some(notes);
        }
        if let Some(source_links) = self.source_links {
            details.source_links = source_links;
        }
        if let Some(parameters) = self.parameters {
            details.parameters = Some(parameters);
        }
        if let Some(license) = self.license {
            details.license = Some(license);
        }
        if let Some(version) = self.version {
            details.version = Some(version);
        }
    }
}

/// Keyword filter over a user's models
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelFilter {
    /// Case-insensitive substring matched against name, developer and notes
    pub query: Option<String>,
    /// Exact model type
    pub model_type: Option<String>,
    pub workspace_id: Option<WorkspaceId>,
    /// Every listed tag must be present
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ModelFilter {
    pub fn matches(&self, model: &ModelEntry) -> bool {
        let details = model.details();

        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let contains = |field: Option<&str>| {
                field
                    .map(|value| value.to_lowercase().contains(&query))
                    .unwrap_or(false)
            };
            if !(contains(Some(details.name.as_str()))
                || contains(details.developer.as_deref())
                || contains(details.notes.as_deref()))
            {
                return false;
            }
        }

        if let Some(model_type) = self.model_type.as_deref() {
            if details.model_type.as_deref() != Some(model_type) {
                return false;
            }
        }

        if let Some(workspace_id) = self.workspace_id.as_ref() {
            if model.workspace_id() != Some(workspace_id) {
                return false;
            }
        }

        self.tags.iter().all(|tag| details.tags.contains(tag))
    }
}

/// Partial update of a workspace
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspacePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Serializable view of a workspace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceView {
    pub id: WorkspaceId,
    pub name: String,
    pub description: Option<String>,
    pub user_id: UserId,
    pub is_default: bool,
    pub created_at: NaiveDate,
}

impl From<&Workspace> for WorkspaceView {
    fn from(workspace: &Workspace) -> Self {
        WorkspaceView {
            id: *workspace.id(),
            name: workspace.name().to_string(),
            description: workspace.description().map(str::to_string),
            user_id: *workspace.owner(),
            is_default: workspace.is_default(),
            created_at: workspace.created_at(),
        }
    }
}
