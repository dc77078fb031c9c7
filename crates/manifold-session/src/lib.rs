//! Manifold Session Management
//!
//! A session is a named, isolated browser profile:
//! - the registry document maps session name to creation timestamp,
//! - each session owns a profile directory named exactly after it,
//! - registry existence and directory existence stay 1:1 except during
//!   the create/delete window, which reconciles on failure.

mod error;
mod registry;
mod session;

pub use error::SessionError;
pub use registry::SessionRegistry;
pub use session::Session;

pub type Result<T> = std::result::Result<T, SessionError>;
