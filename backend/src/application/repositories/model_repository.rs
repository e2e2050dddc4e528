use crate::domain::{
    entities::{ModelDetails, ModelEntry},
    value_objects::{ModelId, SearchScope, UserId, WorkspaceId},
    DomainResult,
};

/// Repository trait for tracked model records.
///
/// Every lookup is keyed by owner so one user can never read or change
/// another user's records through this interface.
pub trait ModelRepository {
    /// Stores a new record and returns it with its assigned identifier.
    fn insert(
        &mut self,
        owner: &UserId,
        workspace: Option<&WorkspaceId>,
        details: ModelDetails,
    ) -> DomainResult<ModelEntry>;

    /// Persists changes to an existing record.
    ///
    /// Returns `DomainError::NotFound` if the record does not exist for its owner.
    fn save(&mut self, model: &ModelEntry) -> DomainResult<()>;

    /// Finds a record by id, restricted to `owner`.
    fn find_by_id(&self, id: &ModelId, owner: &UserId) -> DomainResult<Option<ModelEntry>>;

    /// Returns every record visible in `scope`, in ascending id order.
    fn find_all(&self, scope: &SearchScope) -> DomainResult<Vec<ModelEntry>>;

    /// Deletes a record.
    ///
    /// Returns `Ok(true)` if the record was deleted, `Ok(false)` if it was not found.
    fn delete(&mut self, id: &ModelId, owner: &UserId) -> DomainResult<bool>;
}
