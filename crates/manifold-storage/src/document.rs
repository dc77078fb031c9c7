//! Flat key-value document store
//!
//! Each store owns exactly one document path. Reads tolerate an absent or
//! corrupt file by falling back to an empty map (any unreadable previous
//! content is discarded). Writes serialize the whole map and replace the
//! file atomically via a sibling temp file and rename.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::Result;

pub struct DocumentStore {
    path: PathBuf,
    /// Serializes writers so concurrent saves cannot interleave.
    write_lock: Arc<Mutex<()>>,
}

impl DocumentStore {
    /// Open a store for the document at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document as a key-value map.
    ///
    /// An absent file produces an empty map (persisted immediately so the
    /// document exists from then on). A corrupt file is discarded and
    /// replaced with an empty map; the previous content is not recoverable.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            let empty = BTreeMap::new();
            self.replace(&empty)?;
            return Ok(empty);
        }

        let raw = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
            Ok(map) => Ok(map
                .into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (k, v)
                })
                .collect()),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Discarding corrupt document, starting empty"
                );
                let empty = BTreeMap::new();
                self.replace(&empty)?;
                Ok(empty)
            }
        }
    }

    /// Replace the document contents with `map`.
    ///
    /// The map is written in full to a temp file next to the document and
    /// renamed into place, so readers never observe a partial write.
    pub fn replace(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let _guard = self.write_lock.lock();

        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

impl Clone for DocumentStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("sessions.json")).unwrap();

        let map = store.load().unwrap();
        assert!(map.is_empty());
        // The document now exists on disk.
        assert!(dir.path().join("sessions.json").exists());
    }

    #[test]
    fn test_replace_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("sessions.json")).unwrap();

        let mut map = BTreeMap::new();
        map.insert("alice".to_string(), "2024-01-01 10:00:00".to_string());
        map.insert("bob".to_string(), "2024-02-02 11:30:00".to_string());
        store.replace(&map).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_corrupt_file_recovers_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not valid json!").unwrap();

        let store = DocumentStore::open(&path).unwrap();
        let map = store.load().unwrap();
        assert!(map.is_empty());

        // The corrupt content was replaced with a valid empty document.
        let raw = fs::read_to_string(&path).unwrap();
        let reparsed: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert!(reparsed.is_empty());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("config.json")).unwrap();

        let mut map = BTreeMap::new();
        map.insert("tema".to_string(), "Oscuro".to_string());
        store.replace(&map).unwrap();

        assert!(!dir.path().join("config.tmp").exists());
    }
}
