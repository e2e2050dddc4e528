/// Domain entities
use super::base::{DomainError, DomainResult, Entity, Owned};
use super::value_objects::{Email, ModelId, UserId, WorkspaceId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status given to new model records when none is supplied
pub const DEFAULT_MODEL_STATUS: &str = "active";

/// The descriptive fields of a tracked model.
///
/// Collections are never null: a record stored without tags or links carries empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDetails {
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
}

impl ModelDetails {
    /// Details with only a name; everything else empty and status `active`
    pub fn new(name: impl Into<String>) -> Self {
        ModelDetails {
            name: name.into(),
            developer: None,
            model_type: None,
            status: DEFAULT_MODEL_STATUS.to_string(),
            date_interacted: None,
            tags: Vec::new(),
            notes: None,
            source_links: Vec::new(),
            parameters: None,
            license: None,
            version: None,
        }
    }

    /// Checks the invariants every stored record must satisfy
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "Model name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A tracked machine-learning model owned by a single user
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    id: ModelId,
    owner: UserId,
    workspace_id: Option<WorkspaceId>,
    details: ModelDetails,
}

impl ModelEntry {
    pub fn new(
        id: ModelId,
        owner: UserId,
        workspace_id: Option<WorkspaceId>,
        details: ModelDetails,
    ) -> DomainResult<Self> {
        details.validate()?;
        Ok(ModelEntry {
            id,
            owner,
            workspace_id,
            details,
        })
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn details(&self) -> &ModelDetails {
        &self.details
    }

    pub fn workspace_id(&self) -> Option<&WorkspaceId> {
        self.workspace_id.as_ref()
    }

    pub fn tags(&self) -> &[String] {
        &self.details.tags
    }

    /// Replace all descriptive fields at once
    pub fn replace_details(&mut self, details: ModelDetails) -> DomainResult<()> {
        details.validate()?;
        self.details = details;
        Ok(())
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.details.tags = tags;
    }

    pub fn move_to_workspace(&mut self, workspace_id: WorkspaceId) {
        self.workspace_id = Some(workspace_id);
    }

    /// Record that the user interacted with the model on `date`
    pub fn touch(&mut self, date: NaiveDate) {
        self.details.date_interacted = Some(date);
    }
}

impl Entity for ModelEntry {
    type Id = ModelId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Owned for ModelEntry {
    fn owner(&self) -> &UserId {
        &self.owner
    }
}

/// A named collection of a user's models
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    id: WorkspaceId,
    owner: UserId,
    name: String,
    description: Option<String>,
    is_default: bool,
    created_at: NaiveDate,
}

impl Workspace {
    pub fn new(
        id: WorkspaceId,
        owner: UserId,
        name: impl Into<String>,
        description: Option<String>,
        is_default: bool,
        created_at: NaiveDate,
    ) -> DomainResult<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        Ok(Workspace {
            id,
            owner,
            name,
            description,
            is_default,
            created_at,
        })
    }

    fn validate_name(name: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "Workspace name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        Self::validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }
}

impl Entity for Workspace {
    type Id = WorkspaceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Owned for Workspace {
    fn owner(&self) -> &UserId {
        &self.owner
    }
}

/// An account that owns models and workspaces
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    username: String,
    email: Email,
    is_active: bool,
    created_at: NaiveDate,
}

impl User {
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: Email,
        is_active: bool,
        created_at: NaiveDate,
    ) -> DomainResult<Self> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "Username cannot be empty".to_string(),
            ));
        }
        Ok(User {
            id,
            username,
            email,
            is_active,
            created_at,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
