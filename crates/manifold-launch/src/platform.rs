//! Platform-specific browser install locations
//!
//! Selected once at startup; nothing else in the codebase branches on the
//! OS family for path lookup.

use std::path::PathBuf;

/// Ordered browser-candidate paths for one OS family.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    candidates: Vec<PathBuf>,
    fallback: PathBuf,
}

impl PlatformPaths {
    /// Candidate list for the OS this binary was built for.
    pub fn current() -> Self {
        #[cfg(target_os = "windows")]
        {
            Self::windows()
        }
        #[cfg(target_os = "macos")]
        {
            Self::macos()
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            Self::linux()
        }
    }

    /// Well-known install locations, most preferred first.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists as a file on this machine.
    pub fn detect(&self) -> Option<PathBuf> {
        self.candidates.iter().find(|p| p.is_file()).cloned()
    }

    /// Default path recorded when detection finds nothing installed.
    pub fn fallback(&self) -> &PathBuf {
        &self.fallback
    }

    fn windows() -> Self {
        let chrome_suffix = ["Google", "Chrome", "Application", "chrome.exe"];
        let candidates = ["LOCALAPPDATA", "PROGRAMFILES", "PROGRAMFILES(X86)"]
            .iter()
            .filter_map(|var| std::env::var_os(var))
            .map(|base| {
                let mut path = PathBuf::from(base);
                path.extend(chrome_suffix);
                path
            })
            .collect();

        let fallback = std::env::var_os("PROGRAMFILES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"))
            .join(r"Google\Chrome\Application\chrome.exe");

        Self {
            candidates,
            fallback,
        }
    }

    fn macos() -> Self {
        let system =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        let mut candidates = vec![system.clone()];
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(
                PathBuf::from(home)
                    .join("Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            );
        }

        Self {
            candidates,
            fallback: system,
        }
    }

    fn linux() -> Self {
        let candidates = [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/snap/bin/google-chrome",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();

        Self {
            candidates,
            fallback: PathBuf::from("/usr/bin/google-chrome"),
        }
    }
}
