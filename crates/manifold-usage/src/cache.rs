//! Disk usage cache
//!
//! Holds the last computed recursive size per session. Walks run on the
//! blocking thread pool; results are applied only to entries that still
//! exist, so a refresh racing a delete can never resurrect the deleted
//! session's figures.

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::error::UsageError;
use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct SizeEntry {
    /// Last computed recursive byte size
    pub bytes: u64,
    /// When that size was computed (or seeded)
    pub computed_at: DateTime<Local>,
}

pub struct DiskUsageCache {
    entries: Arc<RwLock<HashMap<String, SizeEntry>>>,
}

impl DiskUsageCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a session with a zero-byte entry until its first refresh.
    pub fn seed(&self, name: &str) {
        self.entries.write().insert(
            name.to_string(),
            SizeEntry {
                bytes: 0,
                computed_at: Local::now(),
            },
        );
    }

    /// Drop a session's entry immediately (called after delete) so stale
    /// percentages are never reported.
    pub fn invalidate(&self, name: &str) {
        self.entries.write().remove(name);
    }

    pub fn entry(&self, name: &str) -> Option<SizeEntry> {
        self.entries.read().get(name).copied()
    }

    pub fn bytes_of(&self, name: &str) -> Option<u64> {
        self.entry(name).map(|e| e.bytes)
    }

    /// Sum of all cached entries.
    pub fn total_occupied(&self) -> u64 {
        self.entries.read().values().map(|e| e.bytes).sum()
    }

    /// Share of the occupied total attributed to `name`, in percent.
    /// Zero when the total is zero or the session has no entry.
    pub fn percent_of(&self, name: &str) -> f64 {
        let entries = self.entries.read();
        let total: u64 = entries.values().map(|e| e.bytes).sum();
        if total == 0 {
            return 0.0;
        }
        match entries.get(name) {
            Some(entry) => entry.bytes as f64 / total as f64 * 100.0,
            None => 0.0,
        }
    }

    /// Recompute the size of one profile directory off the async path.
    ///
    /// Returns the computed byte count. The cache is only updated if the
    /// entry still exists when the walk finishes.
    pub async fn refresh(&self, name: &str, profile_dir: &Path) -> Result<u64> {
        let dir = profile_dir.to_path_buf();
        let bytes = tokio::task::spawn_blocking(move || directory_size(&dir))
            .await
            .map_err(|_| UsageError::Cancelled)?;

        self.update_if_present(name, bytes);
        tracing::debug!(session_name = %name, bytes, "Refreshed session size");

        Ok(bytes)
    }

    /// Batch refresh for every `(name, profile_dir)` pair.
    ///
    /// Walks run concurrently on the blocking pool. Dropping the returned
    /// future cancels the batch; previously cached values stay in place.
    pub async fn refresh_all(
        &self,
        sessions: Vec<(String, PathBuf)>,
    ) -> Result<Vec<(String, u64)>> {
        let mut tasks = Vec::with_capacity(sessions.len());
        for (name, dir) in sessions {
            let handle = tokio::task::spawn_blocking(move || {
                let bytes = directory_size(&dir);
                (name, bytes)
            });
            tasks.push(handle);
        }

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            let (name, bytes) = task.await.map_err(|_| UsageError::Cancelled)?;
            self.update_if_present(&name, bytes);
            results.push((name, bytes));
        }

        tracing::info!(count = results.len(), "Refreshed all session sizes");

        Ok(results)
    }

    /// Available bytes on the volume hosting `path`.
    ///
    /// Matches the disk whose mount point is the longest prefix of the
    /// (canonicalized) path; zero when no disk matches.
    pub fn free_space(path: &Path) -> u64 {
        let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let disks = sysinfo::Disks::new_with_refreshed_list();

        disks
            .list()
            .iter()
            .filter(|disk| target.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| disk.available_space())
            .unwrap_or(0)
    }

    fn update_if_present(&self, name: &str, bytes: u64) {
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get_mut(name) {
            entry.bytes = bytes;
            entry.computed_at = Local::now();
        }
    }
}

impl Default for DiskUsageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DiskUsageCache {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

/// Recursive sum of file sizes under `dir`.
///
/// Files or subtrees disappearing mid-walk are skipped, not fatal; the
/// browser may be writing to the profile while we measure it.
fn directory_size(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}
