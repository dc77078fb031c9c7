//! Main engine facade
//!
//! `Manifold` owns the wired-together engine: configuration, session
//! registry, launcher and disk-usage cache. Registry mutation and launch
//! run synchronously for their caller; disk scans run as background tasks
//! and never block them.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use manifold_launch::{find_free_port, Launcher, PlatformPaths, EPHEMERAL_RANGE};
use manifold_session::{Session, SessionRegistry};
use manifold_storage::DocumentStore;
use manifold_usage::{format_size, DiskUsageCache};

use crate::config::{Config, ConfigStore};
use crate::Result;

/// Aggregate disk figures ready for rendering.
#[derive(Debug, Clone, Copy)]
pub struct UsageSummary {
    /// Sum of all cached session sizes
    pub occupied_bytes: u64,
    /// Available bytes on the volume hosting the sessions root
    pub free_bytes: u64,
}

/// Central engine instance.
///
/// Storage layout under the root:
/// - `settings/config.json` — browser path + theme
/// - `settings/sessions.json` — session name -> creation timestamp
/// - `sessions/<name>/` — one profile directory per session
pub struct Manifold {
    config: Arc<RwLock<Config>>,
    config_store: ConfigStore,
    registry: SessionRegistry,
    launcher: Launcher,
    usage: DiskUsageCache,
}

impl Manifold {
    /// Open (or initialize) the engine rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let settings_dir = root.join("settings");
        let sessions_root = root.join("sessions");

        let platform = PlatformPaths::current();
        let config_store = ConfigStore::new(
            DocumentStore::open(settings_dir.join("config.json"))?,
            platform.clone(),
        );
        let config = config_store.load()?;

        let registry = SessionRegistry::load(
            DocumentStore::open(settings_dir.join("sessions.json"))?,
            sessions_root,
        )?;

        let usage = DiskUsageCache::new();
        for session in registry.list() {
            usage.seed(&session.name);
        }

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_store,
            registry,
            launcher: Launcher::new(platform),
            usage,
        })
    }

    /// Create a session; its usage entry starts at zero until a refresh.
    pub fn create_session(&self, name: &str) -> Result<Session> {
        let session = self.registry.create(name)?;
        self.usage.seed(&session.name);
        Ok(session)
    }

    /// Delete a session and drop its usage entry.
    ///
    /// Once this returns, any subsequent list or cache query observes the
    /// session as gone.
    pub fn delete_session(&self, name: &str) -> Result<()> {
        self.registry.delete(name)?;
        self.usage.invalidate(name);
        Ok(())
    }

    /// Launch a detached browser process for a registered session.
    ///
    /// Allocates a fresh debugging port from the ephemeral range. Any
    /// failure (unknown session, port exhaustion, missing executable,
    /// spawn error) leaves registry and cache untouched.
    pub fn launch_session(&self, name: &str) -> Result<u16> {
        self.launch_session_in_range(name, EPHEMERAL_RANGE.0, EPHEMERAL_RANGE.1)
    }

    fn launch_session_in_range(&self, name: &str, start: u16, end: u16) -> Result<u16> {
        let session = self.registry.get(name)?;
        let browser_path = self.config.read().browser_path.clone();
        let port = find_free_port(start, end)?;
        self.launcher.launch(&session, &browser_path, port)?;
        Ok(port)
    }

    /// All registered sessions; ordering is a presentation concern.
    pub fn list_sessions(&self) -> Vec<Session> {
        self.registry.list()
    }

    /// Refresh every session's cached size in the background and return
    /// the batch result. Dropping the future cancels the remaining work
    /// and leaves previous figures in place.
    pub async fn refresh_usage(&self) -> Result<Vec<(String, u64)>> {
        let pairs: Vec<(String, PathBuf)> = self
            .registry
            .list()
            .into_iter()
            .map(|s| (s.name, s.profile_dir))
            .collect();

        let results = self.usage.refresh_all(pairs).await?;
        Ok(results)
    }

    /// Occupied/free figures for the sessions volume.
    pub fn usage_summary(&self) -> UsageSummary {
        UsageSummary {
            occupied_bytes: self.usage.total_occupied(),
            free_bytes: DiskUsageCache::free_space(self.registry.sessions_root()),
        }
    }

    /// Display line for one session's storage use, e.g.
    /// `"30.00 MB (75.00% of occupied space)"`.
    pub fn session_usage_label(&self, name: &str) -> String {
        let bytes = self.usage.bytes_of(name).unwrap_or(0);
        let percent = self.usage.percent_of(name);
        format!(
            "{} ({:.2}% of occupied space)",
            format_size(bytes),
            percent
        )
    }

    pub fn usage(&self) -> &DiskUsageCache {
        &self.usage
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Replace and persist the configuration.
    pub fn save_config(&self, config: Config) -> Result<()> {
        self.config_store.save(&config)?;
        *self.config.write() = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use manifold_launch::LaunchError;
    use manifold_session::SessionError;
    use std::net::TcpListener;

    fn engine(root: &Path) -> Manifold {
        Manifold::open(root).unwrap()
    }

    #[test]
    fn test_create_list_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let manifold = engine(dir.path());

        let session = manifold.create_session("alice").unwrap();
        assert!(session.profile_dir.is_dir());
        assert_eq!(manifold.usage().bytes_of("alice"), Some(0));

        let listed = manifold.list_sessions();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "alice");

        manifold.delete_session("alice").unwrap();
        assert!(manifold.list_sessions().is_empty());
        assert!(!session.profile_dir.exists());
        assert_eq!(manifold.usage().bytes_of("alice"), None);
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let manifold = engine(dir.path());

        manifold.create_session("alice").unwrap();
        let err = manifold.create_session("alice").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::DuplicateName(_))
        ));
        assert_eq!(manifold.list_sessions().len(), 1);
    }

    #[test]
    fn test_launch_unknown_session() {
        let dir = tempfile::tempdir().unwrap();
        let manifold = engine(dir.path());

        let err = manifold.launch_session("ghost").unwrap_err();
        assert!(matches!(err, CoreError::Session(SessionError::NotFound(_))));
    }

    #[test]
    fn test_port_exhaustion_aborts_launch_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let manifold = engine(dir.path());
        manifold.create_session("alice").unwrap();

        // Occupy the only port in the scanned range.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let taken = listener.local_addr().unwrap().port();

        let err = manifold
            .launch_session_in_range("alice", taken, taken)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Launch(LaunchError::NoFreePort { .. })
        ));

        // Registry and cache are untouched.
        assert_eq!(manifold.list_sessions().len(), 1);
        assert_eq!(manifold.usage().bytes_of("alice"), Some(0));
    }

    #[tokio::test]
    async fn test_refresh_usage_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let manifold = engine(dir.path());

        let a = manifold.create_session("a").unwrap();
        let b = manifold.create_session("b").unwrap();
        std::fs::write(a.profile_dir.join("data"), vec![0u8; 1024]).unwrap();
        std::fs::write(b.profile_dir.join("data"), vec![0u8; 3072]).unwrap();

        let mut results = manifold.refresh_usage().await.unwrap();
        results.sort();
        assert_eq!(results, vec![("a".to_string(), 1024), ("b".to_string(), 3072)]);

        assert_eq!(manifold.usage_summary().occupied_bytes, 4096);
        assert_eq!(
            manifold.session_usage_label("a"),
            "1.00 KB (25.00% of occupied space)"
        );
    }

    #[test]
    fn test_sessions_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let manifold = engine(dir.path());
            manifold.create_session("alice").unwrap();
        }

        let reopened = engine(dir.path());
        assert_eq!(reopened.list_sessions().len(), 1);
        // Seeded at zero until the next refresh.
        assert_eq!(reopened.usage().bytes_of("alice"), Some(0));
    }
}
