/// Base abstractions for the domain layer
use std::fmt::Debug;

use super::value_objects::UserId;

/// Marker for immutable values compared field by field
pub trait ValueObject: Clone + PartialEq + Debug {}

/// Records with a stable identity; two entities are the same record when their ids match
pub trait Entity: Debug {
    type Id: ValueObject;

    fn id(&self) -> &Self::Id;
}

/// Entities that belong to exactly one user.
///
/// Every read and write performed on behalf of a user is checked against this owner.
pub trait Owned: Entity {
    fn owner(&self) -> &UserId;

    fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner() == user
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised by domain rules and by stores that hand back domain data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation, including malformed stored rows
    InvalidValue(String),
    NotFound(String),
    /// e.g. registering an email twice
    BusinessRuleViolation(String),
    /// The operation cannot be carried out, including storage failures
    InvalidOperation(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::BusinessRuleViolation(msg) => write!(f, "Business rule violation: {}", msg),
            DomainError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
