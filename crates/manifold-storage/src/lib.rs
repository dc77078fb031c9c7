//! Manifold Storage Layer
//!
//! Flat key-value documents persisted as human-editable JSON.
//! All writes are whole-file replacements; there is no incremental patching.

mod document;
mod error;

pub use document::DocumentStore;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
