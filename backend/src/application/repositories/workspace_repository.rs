use crate::domain::{
    entities::{User, Workspace},
    value_objects::{Email, UserId, WorkspaceId},
    DomainResult,
};

/// Repository trait for workspaces.
pub trait WorkspaceRepository {
    /// Creates a workspace for `owner` and returns it with its assigned identifier.
    fn insert_workspace(
        &mut self,
        owner: &UserId,
        name: &str,
        description: Option<&str>,
        is_default: bool,
    ) -> DomainResult<Workspace>;

    /// Persists name and description changes of an existing workspace.
    fn save_workspace(&mut self, workspace: &Workspace) -> DomainResult<()>;

    fn find_workspace(&self, id: &WorkspaceId, owner: &UserId) -> DomainResult<Option<Workspace>>;

    /// All workspaces of `owner`, in creation order.
    fn find_workspaces(&self, owner: &UserId) -> DomainResult<Vec<Workspace>>;

    fn find_default_workspace(&self, owner: &UserId) -> DomainResult<Option<Workspace>>;

    /// Deletes a workspace. Models inside it are kept and lose their workspace.
    fn delete_workspace(&mut self, id: &WorkspaceId, owner: &UserId) -> DomainResult<bool>;
}

/// Repository trait for user accounts.
pub trait UserRepository {
    fn insert_user(&mut self, username: &str, email: &Email) -> DomainResult<User>;

    fn find_user(&self, id: &UserId) -> DomainResult<Option<User>>;

    fn find_user_by_email(&self, email: &Email) -> DomainResult<Option<User>>;
}
