//! Error types for the process registry.

use crate::framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    #[error("process not registered: {0}")]
    NotFound(String),

    #[error("process registered twice: {0}")]
    AlreadyRegistered(String),

    /// A liveness change the lifecycle does not allow, e.g. leaving `ready`.
    #[error("illegal liveness transition: {0}")]
    IllegalTransition(String),

    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for RegistryError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => RegistryError::NotFound(id),
            FrameworkError::AlreadyExists(id) => RegistryError::AlreadyRegistered(id),
            FrameworkError::Rejected(reason) => RegistryError::IllegalTransition(reason),
            other => RegistryError::Unavailable(other.to_string()),
        }
    }
}
