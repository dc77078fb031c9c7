//! Detached browser process launching

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use manifold_session::Session;

use crate::error::LaunchError;
use crate::platform::PlatformPaths;
use crate::Result;

/// Page opened by every freshly launched session.
pub const DEFAULT_START_URL: &str = "https://www.google.com/";

pub struct Launcher {
    platform: PlatformPaths,
    start_url: String,
}

impl Launcher {
    pub fn new(platform: PlatformPaths) -> Self {
        Self {
            platform,
            start_url: DEFAULT_START_URL.to_string(),
        }
    }

    pub fn with_start_url(mut self, url: impl Into<String>) -> Self {
        self.start_url = url.into();
        self
    }

    /// Spawn a browser process for `session` on `port`.
    ///
    /// The process joins a new process group and is never waited on; it
    /// outlives this program. Returns the child pid for logging purposes
    /// only. Nothing is spawned unless an executable resolves.
    pub fn launch(&self, session: &Session, executable: &Path, port: u16) -> Result<u32> {
        let executable = self.resolve_executable(executable)?;
        let profile_dir = absolute(&session.profile_dir);

        let mut cmd = Command::new(&executable);
        cmd.arg(format!("--remote-debugging-port={port}"))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg(&self.start_url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut cmd);

        let child = cmd.spawn()?;
        let pid = child.id();

        tracing::info!(
            session_name = %session.name,
            executable = %executable.display(),
            port,
            pid,
            "Launched browser session"
        );

        Ok(pid)
    }

    /// The configured path if it exists, otherwise the first well-known
    /// install location present on this machine.
    fn resolve_executable(&self, configured: &Path) -> Result<PathBuf> {
        if configured.is_file() {
            return Ok(configured.to_path_buf());
        }

        self.platform
            .detect()
            .ok_or_else(|| LaunchError::ExecutableNotFound(configured.to_path_buf()))
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(unix)]
fn detach(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
}
