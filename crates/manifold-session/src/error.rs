//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session already exists: {0}")]
    DuplicateName(String),

    #[error("Session name cannot be empty")]
    EmptyName,

    #[error("Session name contains path-hostile characters: {0:?}")]
    InvalidName(String),

    #[error("Filesystem error for session {name}: {message}")]
    Filesystem { name: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] manifold_storage::StorageError),
}
