//! Launch error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("No free port in range {start}-{end}")]
    NoFreePort { start: u16, end: u16 },

    #[error("No browser executable found (configured path: {0:?})")]
    ExecutableNotFound(std::path::PathBuf),

    #[error("Failed to spawn browser process: {0}")]
    Spawn(#[from] std::io::Error),
}
