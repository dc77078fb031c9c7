//! Session Registry
//!
//! The single source of truth for which sessions exist. Every mutation is
//! persisted immediately by whole-file replacement of the registry document.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use manifold_storage::DocumentStore;

use crate::error::SessionError;
use crate::session::Session;
use crate::Result;

pub struct SessionRegistry {
    /// In-memory session cache, always mirroring the persisted document
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    /// Registry document (name -> creation timestamp)
    store: DocumentStore,
    /// Directory holding one profile directory per session
    sessions_root: PathBuf,
}

impl SessionRegistry {
    /// Load the registry document and ensure the sessions root exists.
    ///
    /// Entries with unparseable timestamps are skipped with a warning; the
    /// document itself being absent or corrupt yields an empty registry.
    pub fn load(store: DocumentStore, sessions_root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&sessions_root).map_err(|e| SessionError::Filesystem {
            name: sessions_root.display().to_string(),
            message: e.to_string(),
        })?;

        let mut sessions = HashMap::new();
        for (name, timestamp) in store.load()? {
            match Session::from_entry(name.clone(), &timestamp, &sessions_root) {
                Some(session) => {
                    sessions.insert(name, session);
                }
                None => {
                    tracing::warn!(
                        session_name = %name,
                        timestamp = %timestamp,
                        "Skipping registry entry with unparseable timestamp"
                    );
                }
            }
        }

        tracing::info!(count = sessions.len(), "Loaded session registry");

        Ok(Self {
            sessions: Arc::new(RwLock::new(sessions)),
            store,
            sessions_root,
        })
    }

    pub fn sessions_root(&self) -> &Path {
        &self.sessions_root
    }

    /// Create a new session and its profile directory.
    pub fn create(&self, name: &str) -> Result<Session> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        validate_name(name)?;

        let session = Session::new(name.to_string(), &self.sessions_root);

        // Duplicate check and insert share one critical section so two
        // concurrent creates of the same name cannot both pass the guard.
        // Register and persist first, then materialize the directory.
        {
            let mut sessions = self.sessions.write();
            if sessions.contains_key(name) {
                return Err(SessionError::DuplicateName(name.to_string()));
            }
            sessions.insert(session.name.clone(), session.clone());
            if let Err(e) = self.persist(&sessions) {
                sessions.remove(&session.name);
                return Err(e);
            }
        }

        if let Err(e) = fs::create_dir_all(&session.profile_dir) {
            // Roll back so the registry never claims a session whose
            // directory could not be created.
            let mut sessions = self.sessions.write();
            sessions.remove(&session.name);
            let _ = self.persist(&sessions);
            return Err(SessionError::Filesystem {
                name: session.name.clone(),
                message: e.to_string(),
            });
        }

        tracing::info!(
            session_name = %session.name,
            profile_dir = %session.profile_dir.display(),
            "Created session"
        );

        Ok(session)
    }

    /// Delete a session and its profile directory.
    ///
    /// The directory is removed first and removal is verified; only then is
    /// the registry entry dropped. A directory that is already gone is not
    /// an error. If the directory provably survives removal, the entry is
    /// retained and a filesystem error is returned.
    pub fn delete(&self, name: &str) -> Result<()> {
        let session = self.get(name)?;

        if session.profile_dir.exists() {
            // Best effort; verification below decides the outcome.
            let _ = fs::remove_dir_all(&session.profile_dir);
        }

        if session.profile_dir.exists() {
            return Err(SessionError::Filesystem {
                name: name.to_string(),
                message: format!(
                    "profile directory {} could not be removed",
                    session.profile_dir.display()
                ),
            });
        }

        {
            let mut sessions = self.sessions.write();
            sessions.remove(name);
            self.persist(&sessions)?;
        }

        tracing::info!(session_name = %name, "Deleted session");

        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Session> {
        self.sessions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sessions.read().contains_key(name)
    }

    /// All registered sessions. Ordering is a presentation concern.
    pub fn list(&self) -> Vec<Session> {
        self.sessions.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    fn persist(&self, sessions: &HashMap<String, Session>) -> Result<()> {
        let map = sessions
            .iter()
            .map(|(name, session)| (name.clone(), session.timestamp_string()))
            .collect();
        self.store.replace(&map)?;
        Ok(())
    }
}

impl Clone for SessionRegistry {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            store: self.store.clone(),
            sessions_root: self.sessions_root.clone(),
        }
    }
}

/// Reject names that would escape the sessions root.
///
/// The profile directory must be named exactly like the session, so names
/// with separators, parent components or NUL bytes are refused outright
/// rather than sanitized.
fn validate_name(name: &str) -> Result<()> {
    if name.contains(['/', '\\', '\0']) {
        return Err(SessionError::InvalidName(name.to_string()));
    }
    let has_hostile_component = Path::new(name)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if has_hostile_component {
        return Err(SessionError::InvalidName(name.to_string()));
    }
    Ok(())
}
