//! Cross-compilation target and output naming.

use std::path::{Path, PathBuf};

/// Suffix required for executables on Windows targets.
pub const WINDOWS_EXE_SUFFIX: &str = ".exe";

/// What to build and for which platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildTarget {
    source: PathBuf,
    goos: String,
    goarch: String,
    base_name: String,
}

impl BuildTarget {
    #[must_use]
    pub fn new(
        source: impl Into<PathBuf>,
        goos: impl Into<String>,
        goarch: impl Into<String>,
        base_name: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            goos: goos.into(),
            goarch: goarch.into(),
            base_name: base_name.into(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn goos(&self) -> &str {
        &self.goos
    }

    #[must_use]
    pub fn goarch(&self) -> &str {
        &self.goarch
    }

    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// `<base>-<os>-<arch>`, plus `.exe` for Windows targets.
    ///
    /// - `("main", "windows", "amd64")` → `main-windows-amd64.exe`
    /// - `("main", "linux", "arm64")` → `main-linux-arm64`
    #[must_use]
    pub fn output_file_name(&self) -> String {
        let mut name = format!("{}-{}-{}", self.base_name, self.goos, self.goarch);
        if self.goos == "windows" && !name.ends_with(WINDOWS_EXE_SUFFIX) {
            name.push_str(WINDOWS_EXE_SUFFIX);
        }
        name
    }

    /// Output file inside `project_dir`.
    #[must_use]
    pub fn output_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(self.output_file_name())
    }
}
