/// Service for creating, updating and querying tracked models
use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::error::{ServiceError, ServiceResult};
use super::workspace_service::ensure_default_workspace;
use crate::application::dto::{ModelDraft, ModelFilter, ModelPatch};
use crate::application::repositories::{ModelRepository, WorkspaceRepository};
use crate::domain::base::Entity;
use crate::domain::entities::ModelEntry;
use crate::domain::value_objects::{ModelId, SearchScope, UserId, WorkspaceId};

pub struct ModelService<R: ModelRepository + WorkspaceRepository> {
    repository: R,
}

impl<R: ModelRepository + WorkspaceRepository> ModelService<R> {
    pub fn new(repository: R) -> Self {
        ModelService { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    pub fn into_inner(self) -> R {
        self.repository
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn require_workspace(&self, id: &WorkspaceId, owner: &UserId) -> ServiceResult<()> {
        match self.repository.find_workspace(id, owner)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::Forbidden(format!(
                "workspace {} is not accessible to user {}",
                id, owner
            ))),
        }
    }

    /// Create a model. Without an explicit workspace it lands in the owner's default one.
    pub fn create_model(&mut self, owner: &UserId, draft: ModelDraft) -> ServiceResult<ModelEntry> {
        let workspace_id = match draft.workspace_id {
            Some(id) => {
                self.require_workspace(&id, owner)?;
                id
            }
            None => *ensure_default_workspace(&mut self.repository, owner)?.id(),
        };

        let details = draft.into_details(Self::today());
        let model = self
            .repository
            .insert(owner, Some(&workspace_id), details)?;

        info!(
            "Created model {} '{}' in workspace {}",
            model.id(),
            model.name(),
            workspace_id
        );
        Ok(model)
    }

    pub fn get_model(&self, id: &ModelId, owner: &UserId) -> ServiceResult<Option<ModelEntry>> {
        Ok(self.repository.find_by_id(id, owner)?)
    }

    pub fn get_user_models(
        &self,
        owner: &UserId,
        workspace: Option<&WorkspaceId>,
    ) -> ServiceResult<Vec<ModelEntry>> {
        let scope = match workspace {
            Some(workspace) => SearchScope::workspace(*owner, *workspace),
            None => SearchScope::owner(*owner),
        };
        Ok(self.repository.find_all(&scope)?)
    }

    /// Apply the fields present in `patch` and refresh the interaction date
    pub fn update_model(
        &mut self,
        id: &ModelId,
        owner: &UserId,
        patch: ModelPatch,
    ) -> ServiceResult<ModelEntry> {
        let mut model = self
            .repository
            .find_by_id(id, owner)?
            .ok_or_else(|| ServiceError::NotFound(format!("model {}", id)))?;

        if let Some(workspace_id) = patch.workspace_id {
            self.require_workspace(&workspace_id, owner)?;
            model.move_to_workspace(workspace_id);
        }

        let mut details = model.details().clone();
        patch.apply_to(&mut details);
        details.date_interacted = Some(Self::today());
        model.replace_details(details)?;

        self.repository.save(&model)?;
        debug!("Updated model {}", id);
        Ok(model)
    }

    pub fn delete_model(&mut self, id: &ModelId, owner: &UserId) -> ServiceResult<bool> {
        let deleted = self.repository.delete(id, owner)?;
        if deleted {
            info!("Deleted model {}", id);
        }
        Ok(deleted)
    }

    pub fn update_model_tags(
        &mut self,
        id: &ModelId,
        owner: &UserId,
        tags: Vec<String>,
    ) -> ServiceResult<ModelEntry> {
        let mut model = self
            .repository
            .find_by_id(id, owner)?
            .ok_or_else(|| ServiceError::NotFound(format!("model {}", id)))?;

        model.set_tags(tags);
        self.repository.save(&model)?;
        Ok(model)
    }

    /// Keyword search over the owner's models, in store order
    pub fn search_models(&self, owner: &UserId, filter: &ModelFilter) -> ServiceResult<Vec<ModelEntry>> {
        let scope = match filter.workspace_id {
            Some(workspace) => SearchScope::workspace(*owner, workspace),
            None => SearchScope::owner(*owner),
        };

        Ok(self
            .repository
            .find_all(&scope)?
            .into_iter()
            .filter(|model| filter.matches(model))
            .collect())
    }

    /// Distinct model types in use, sorted
    pub fn get_model_types(&self, owner: &UserId) -> ServiceResult<Vec<String>> {
        let types: BTreeSet<String> = self
            .repository
            .find_all(&SearchScope::owner(*owner))?
            .into_iter()
            .filter_map(|model| model.details().model_type.clone())
            .collect();
        Ok(types.into_iter().collect())
    }

    /// Distinct tags across all of the owner's models, sorted
    pub fn get_all_tags(&self, owner: &UserId) -> ServiceResult<Vec<String>> {
        let tags: BTreeSet<String> = self
            .repository
            .find_all(&SearchScope::owner(*owner))?
            .iter()
            .flat_map(|model| model.tags().iter().cloned())
            .collect();
        Ok(tags.into_iter().collect())
    }

    /// Move the listed models into `target`, returning how many were moved
    pub fn bulk_update_workspace(
        &mut self,
        owner: &UserId,
        model_ids: &[ModelId],
        target: &WorkspaceId,
    ) -> ServiceResult<usize> {
        if self.repository.find_workspace(target, owner)?.is_none() {
            return Err(ServiceError::NotFound(format!("workspace {}", target)));
        }

        let mut models = Vec::new();
        for id in model_ids {
            if let Some(model) = self.repository.find_by_id(id, owner)? {
                models.push(model);
            }
        }
        if models.is_empty() {
            return Err(ServiceError::NotFound(
                "no matching models for this user".to_string(),
            ));
        }

        for model in &mut models {
            model.move_to_workspace(*target);
            self.repository.save(model)?;
        }

        info!("Moved {} models to workspace {}", models.len(), target);
        Ok(models.len())
    }
}
