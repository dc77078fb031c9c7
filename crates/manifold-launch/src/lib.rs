//! Manifold Launch
//!
//! Spawns detached browser processes, one per session, each bound to a
//! freshly probed remote-debugging port and pointed at the session's
//! profile directory. Spawned processes are never waited on or supervised.

mod error;
mod launcher;
mod platform;
mod port;

pub use error::LaunchError;
pub use launcher::{Launcher, DEFAULT_START_URL};
pub use platform::PlatformPaths;
pub use port::{find_free_port, find_free_port_default, EPHEMERAL_RANGE};

pub type Result<T> = std::result::Result<T, LaunchError>;
