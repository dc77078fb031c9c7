//! Session data structure

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Wire format for creation timestamps in the registry document.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique user-supplied name
    pub name: String,
    /// When the session was created (local time, second precision)
    pub created_at: NaiveDateTime,
    /// Profile directory holding all browser state for this session
    pub profile_dir: PathBuf,
}

impl Session {
    /// Create a session record stamped with the current local time.
    ///
    /// The profile directory is derived once as `<sessions_root>/<name>`
    /// and never renamed.
    pub fn new(name: String, sessions_root: &Path) -> Self {
        use chrono::Timelike;

        let profile_dir = sessions_root.join(&name);
        // Second precision, matching the document wire format.
        let now = Local::now().naive_local();
        let created_at = now.with_nanosecond(0).unwrap_or(now);

        Self {
            name,
            created_at,
            profile_dir,
        }
    }

    /// Rebuild a session from a persisted registry entry.
    pub(crate) fn from_entry(
        name: String,
        timestamp: &str,
        sessions_root: &Path,
    ) -> Option<Self> {
        let created_at = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
        let profile_dir = sessions_root.join(&name);

        Some(Self {
            name,
            created_at,
            profile_dir,
        })
    }

    /// Registry document value for this session.
    pub(crate) fn timestamp_string(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_dir_derivation() {
        let session = Session::new("Work".to_string(), Path::new("/data/sessions"));
        assert_eq!(session.name, "Work");
        assert_eq!(session.profile_dir, PathBuf::from("/data/sessions/Work"));
    }

    #[test]
    fn test_timestamp_round_trip() {
        let root = Path::new("/tmp/sessions");
        let session = Session::new("alice".to_string(), root);
        let wire = session.timestamp_string();

        let rebuilt = Session::from_entry("alice".to_string(), &wire, root).unwrap();
        assert_eq!(rebuilt.created_at, session.created_at);
        assert_eq!(rebuilt.profile_dir, session.profile_dir);
    }

    #[test]
    fn test_unparseable_timestamp_is_rejected() {
        let root = Path::new("/tmp/sessions");
        assert!(Session::from_entry("x".to_string(), "not-a-date", root).is_none());
    }
}
