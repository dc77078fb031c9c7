//! Manifold Core
//!
//! Central coordination layer for the session management engine: wires the
//! registry, launcher and disk-usage cache together behind one facade and
//! owns the configuration document.

mod config;
mod error;
mod hub;

pub use config::{Config, ConfigStore};
pub use error::CoreError;
pub use hub::{Manifold, UsageSummary};

// Re-export core components
pub use manifold_launch::{find_free_port, find_free_port_default, LaunchError, Launcher, PlatformPaths};
pub use manifold_session::{Session, SessionError, SessionRegistry};
pub use manifold_storage::{DocumentStore, StorageError};
pub use manifold_usage::{format_size, parse_size, DiskUsageCache, SizeEntry, UsageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
