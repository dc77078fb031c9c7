//! Manifold Disk Usage
//!
//! Asynchronously computes and caches the recursive byte size of each
//! session's profile directory, plus aggregate and free-space figures.
//! Refreshes run off the critical path; registry mutation and launching
//! are never blocked by a directory walk.

mod cache;
mod error;
mod format;

pub use cache::{DiskUsageCache, SizeEntry};
pub use error::UsageError;
pub use format::{format_size, parse_size};

pub type Result<T> = std::result::Result<T, UsageError>;
