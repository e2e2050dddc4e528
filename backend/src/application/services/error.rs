/// Errors surfaced by the application services
use crate::domain::base::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
