//! Configuration store
//!
//! One small persisted record: the browser executable path plus a theme
//! preference. The theme belongs to the presentation layer; the core
//! persists it opaquely and never interprets it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use manifold_launch::PlatformPaths;
use manifold_storage::DocumentStore;

use crate::Result;

/// Document key for the browser executable path.
const KEY_BROWSER_PATH: &str = "chrome_ruta";
/// Document key for the (opaque) theme preference.
const KEY_THEME: &str = "tema";

const DEFAULT_THEME: &str = "Oscuro";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the browser binary
    pub browser_path: PathBuf,
    /// Presentation-layer theme, persisted but never interpreted here
    pub theme: String,
}

pub struct ConfigStore {
    store: DocumentStore,
    platform: PlatformPaths,
}

impl ConfigStore {
    pub fn new(store: DocumentStore, platform: PlatformPaths) -> Self {
        Self { store, platform }
    }

    /// Load the config document, regenerating defaults when it is absent
    /// or unreadable.
    ///
    /// Default detection walks the platform's well-known install
    /// locations; when nothing is installed the platform's conventional
    /// default path is recorded anyway so the document is always complete.
    pub fn load(&self) -> Result<Config> {
        let map = self.store.load()?;

        if let Some(path) = map.get(KEY_BROWSER_PATH) {
            let theme = map
                .get(KEY_THEME)
                .cloned()
                .unwrap_or_else(|| DEFAULT_THEME.to_string());
            return Ok(Config {
                browser_path: PathBuf::from(path),
                theme,
            });
        }

        let browser_path = self
            .platform
            .detect()
            .unwrap_or_else(|| self.platform.fallback().clone());
        let config = Config {
            browser_path,
            theme: DEFAULT_THEME.to_string(),
        };

        tracing::info!(
            browser_path = %config.browser_path.display(),
            "Generated default configuration"
        );
        self.save(&config)?;

        Ok(config)
    }

    /// Persist `config` by whole-file replacement.
    pub fn save(&self, config: &Config) -> Result<()> {
        let mut map = BTreeMap::new();
        map.insert(
            KEY_BROWSER_PATH.to_string(),
            config.browser_path.display().to_string(),
        );
        map.insert(KEY_THEME.to_string(), config.theme.clone());
        self.store.replace(&map)?;
        Ok(())
    }
}
