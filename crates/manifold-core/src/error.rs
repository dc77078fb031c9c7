//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Session error: {0}")]
    Session(#[from] manifold_session::SessionError),

    #[error("Launch error: {0}")]
    Launch(#[from] manifold_launch::LaunchError),

    #[error("Usage error: {0}")]
    Usage(#[from] manifold_usage::UsageError),

    #[error("Storage error: {0}")]
    Storage(#[from] manifold_storage::StorageError),
}
