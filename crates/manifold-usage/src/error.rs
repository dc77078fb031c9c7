//! Usage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    /// A refresh task was cancelled before its result could be applied.
    /// Walk-level I/O failures are not errors: unreadable entries are
    /// skipped and contribute zero bytes.
    #[error("Size refresh task was cancelled")]
    Cancelled,
}
