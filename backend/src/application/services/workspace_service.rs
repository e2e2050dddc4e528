/// Service for managing a user's workspaces
use tracing::{debug, info, warn};

use super::error::{ServiceError, ServiceResult};
use crate::application::dto::WorkspacePatch;
use crate::application::repositories::{ModelRepository, WorkspaceRepository};
use crate::domain::base::Entity;
use crate::domain::entities::{ModelEntry, Workspace};
use crate::domain::value_objects::{ModelId, SearchScope, UserId, WorkspaceId};
use crate::domain::DomainResult;

pub const DEFAULT_WORKSPACE_NAME: &str = "Default Workspace";
pub const DEFAULT_WORKSPACE_DESCRIPTION: &str = "Your default workspace";

/// Return the owner's default workspace, creating it on first use
pub(crate) fn ensure_default_workspace<R: WorkspaceRepository>(
    repository: &mut R,
    owner: &UserId,
) -> DomainResult<Workspace> {
    if let Some(workspace) = repository.find_default_workspace(owner)? {
        return Ok(workspace);
    }

    info!("Creating default workspace for user {}", owner);
    repository.insert_workspace(
        owner,
        DEFAULT_WORKSPACE_NAME,
        Some(DEFAULT_WORKSPACE_DESCRIPTION),
        true,
    )
}

pub struct WorkspaceService<R: ModelRepository + WorkspaceRepository> {
    repository: R,
}

impl<R: ModelRepository + WorkspaceRepository> WorkspaceService<R> {
    pub fn new(repository: R) -> Self {
        WorkspaceService { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_inner(self) -> R {
        self.repository
    }

    pub fn create_workspace(
        &mut self,
        owner: &UserId,
        name: &str,
        description: Option<&str>,
    ) -> ServiceResult<Workspace> {
        let workspace = self
            .repository
            .insert_workspace(owner, name, description, false)?;
        info!("Created workspace {} '{}' for user {}", workspace.id(), name, owner);
        Ok(workspace)
    }

    pub fn get_user_workspaces(&self, owner: &UserId) -> ServiceResult<Vec<Workspace>> {
        Ok(self.repository.find_workspaces(owner)?)
    }

    pub fn get_workspace(&self, id: &WorkspaceId, owner: &UserId) -> ServiceResult<Option<Workspace>> {
        Ok(self.repository.find_workspace(id, owner)?)
    }

    pub fn update_workspace(
        &mut self,
        id: &WorkspaceId,
        owner: &UserId,
        patch: WorkspacePatch,
    ) -> ServiceResult<Workspace> {
        let mut workspace = self
            .repository
            .find_workspace(id, owner)?
            .ok_or_else(|| ServiceError::NotFound(format!("workspace {}", id)))?;

        if let Some(name) = patch.name {
            workspace.rename(name)?;
        }
        if let Some(description) = patch.description {
            workspace.set_description(Some(description));
        }

        self.repository.save_workspace(&workspace)?;
        Ok(workspace)
    }

    /// Delete a workspace. The default workspace is never deleted.
    pub fn delete_workspace(&mut self, id: &WorkspaceId, owner: &UserId) -> ServiceResult<bool> {
        let Some(workspace) = self.repository.find_workspace(id, owner)? else {
            return Ok(false);
        };
        if workspace.is_default() {
            warn!("Refusing to delete default workspace {} of user {}", id, owner);
            return Ok(false);
        }

        Ok(self.repository.delete_workspace(id, owner)?)
    }

    /// Place a model into a workspace. Both must belong to `owner`.
    pub fn add_model_to_workspace(
        &mut self,
        workspace_id: &WorkspaceId,
        model_id: &ModelId,
        owner: &UserId,
    ) -> ServiceResult<bool> {
        if self.repository.find_workspace(workspace_id, owner)?.is_none() {
            return Ok(false);
        }
        let Some(mut model) = self.repository.find_by_id(model_id, owner)? else {
            return Ok(false);
        };

        model.move_to_workspace(*workspace_id);
        self.repository.save(&model)?;
        debug!("Model {} added to workspace {}", model_id, workspace_id);
        Ok(true)
    }

    /// Move a model from `source` to `target`; fails if it is not currently in `source`
    pub fn move_model_between_workspaces(
        &mut self,
        model_id: &ModelId,
        source: &WorkspaceId,
        target: &WorkspaceId,
        owner: &UserId,
    ) -> ServiceResult<bool> {
        if self.repository.find_workspace(source, owner)?.is_none()
            || self.repository.find_workspace(target, owner)?.is_none()
        {
            return Ok(false);
        }

        let Some(mut model) = self.repository.find_by_id(model_id, owner)? else {
            return Ok(false);
        };
        if model.workspace_id() != Some(source) {
            return Ok(false);
        }

        model.move_to_workspace(*target);
        self.repository.save(&model)?;
        debug!("Model {} moved from workspace {} to {}", model_id, source, target);
        Ok(true)
    }

    /// Models in a workspace; empty when the workspace is not the owner's
    pub fn get_workspace_models(
        &self,
        workspace_id: &WorkspaceId,
        owner: &UserId,
    ) -> ServiceResult<Vec<ModelEntry>> {
        if self.repository.find_workspace(workspace_id, owner)?.is_none() {
            return Ok(Vec::new());
        }
        Ok(self
            .repository
            .find_all(&SearchScope::workspace(*owner, *workspace_id))?)
    }

    pub fn get_or_create_default_workspace(&mut self, owner: &UserId) -> ServiceResult<Workspace> {
        Ok(ensure_default_workspace(&mut self.repository, owner)?)
    }
}
