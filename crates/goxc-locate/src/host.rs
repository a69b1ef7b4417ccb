//! Host family conventions: executable names and conventional install paths.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Base name of the Go toolchain driver.
pub const TOOL_STEM: &str = "go";

/// File names accepted by the bounded recursive scan, on any host.
pub const SCAN_TARGET_NAMES: &[&str] = &["go.exe", "go"];

/// Extensions tried on Windows when `PATHEXT` is unset.
const DEFAULT_PATHEXT: &str = ".COM;.EXE;.BAT;.CMD";

/// Filesystem namespace family of the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostFamily {
    /// Drive-letter namespace (`C:\`, `D:\`, ...).
    Windows,
    /// Single-rooted namespace (`/`).
    Unix,
}

impl HostFamily {
    /// Family of the host this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    /// Full executable file name of the toolchain driver.
    #[must_use]
    pub const fn executable_name(self) -> &'static str {
        match self {
            Self::Windows => "go.exe",
            Self::Unix => TOOL_STEM,
        }
    }

    /// Whether volume-root strategies make sense on this family.
    #[must_use]
    pub const fn has_volumes(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Candidate file names for a search-path lookup.
    ///
    /// Windows resolves the bare stem with every `PATHEXT` extension, in order.
    #[must_use]
    pub fn search_path_names(self, path_ext: Option<&OsStr>) -> Vec<OsString> {
        match self {
            Self::Unix => vec![OsString::from(TOOL_STEM)],
            Self::Windows => {
                let exts = path_ext
                    .and_then(OsStr::to_str)
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(DEFAULT_PATHEXT);
                exts.split(';')
                    .map(str::trim)
                    .filter(|ext| !ext.is_empty())
                    .map(|ext| OsString::from(format!("{TOOL_STEM}{ext}")))
                    .collect()
            }
        }
    }

    /// Conventional install locations, probed in order.
    ///
    /// `user_profile` is the value of `USERPROFILE`; it only contributes on Windows.
    #[must_use]
    pub fn install_paths(self, user_profile: Option<&Path>) -> Vec<PathBuf> {
        match self {
            Self::Windows => {
                let mut paths: Vec<PathBuf> = [
                    r"C:\Go\bin\go.exe",
                    r"C:\Program Files\Go\bin\go.exe",
                    r"C:\Program Files (x86)\Go\bin\go.exe",
                ]
                .iter()
                .map(PathBuf::from)
                .collect();
                if let Some(profile) = user_profile.filter(|p| !p.as_os_str().is_empty()) {
                    paths.push(profile.join("Go").join("bin").join("go.exe"));
                }
                paths
            }
            Self::Unix => ["/usr/local/go/bin/go", "/usr/bin/go", "/usr/local/bin/go"]
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}
