//! Build parameters with boundary defaults.

use std::path::{Path, PathBuf};

use goxc_locate::ToolchainLocation;
use tracing::debug;

use crate::invoke::{BuildInvoker, BuildResult};
use crate::target::BuildTarget;
use crate::{Error, Result};

/// Source file compiled when none is given.
pub const DEFAULT_SOURCE: &str = "main.go";
/// Target OS when none is given.
pub const DEFAULT_GOOS: &str = "windows";
/// Target architecture when none is given.
pub const DEFAULT_GOARCH: &str = "amd64";
/// Output base name when none is given.
pub const DEFAULT_BASE_NAME: &str = "main";

/// Build parameters as collected from the user.
///
/// Empty or whitespace-only values fall back to the defaults above; a missing
/// project directory means the current working directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    pub project_dir: Option<PathBuf>,
    pub source: String,
    pub goos: String,
    pub goarch: String,
    pub base_name: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            project_dir: None,
            source: DEFAULT_SOURCE.to_string(),
            goos: DEFAULT_GOOS.to_string(),
            goarch: DEFAULT_GOARCH.to_string(),
            base_name: DEFAULT_BASE_NAME.to_string(),
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    let chosen = if value.is_empty() { default } else { value };
    chosen.to_string()
}

impl BuildConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.project_dir = (!dir.as_os_str().is_empty()).then(|| dir.to_path_buf());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = or_default(source, DEFAULT_SOURCE);
        self
    }

    #[must_use]
    pub fn with_goos(mut self, goos: &str) -> Self {
        self.goos = or_default(goos, DEFAULT_GOOS);
        self
    }

    #[must_use]
    pub fn with_goarch(mut self, goarch: &str) -> Self {
        self.goarch = or_default(goarch, DEFAULT_GOARCH);
        self
    }

    #[must_use]
    pub fn with_base_name(mut self, base_name: &str) -> Self {
        self.base_name = or_default(base_name, DEFAULT_BASE_NAME);
        self
    }

    /// Resolve the project directory to an absolute path and build the target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the working directory cannot be read,
    /// the path cannot be made absolute, or it is not an existing directory.
    pub fn resolve(&self) -> Result<BuildPlan> {
        let project_dir = match &self.project_dir {
            None => std::env::current_dir().map_err(|e| Error::InvalidPath {
                path: PathBuf::from("."),
                reason: e.to_string(),
            })?,
            Some(dir) => std::path::absolute(dir).map_err(|e| Error::InvalidPath {
                path: dir.clone(),
                reason: e.to_string(),
            })?,
        };

        if !project_dir.is_dir() {
            return Err(Error::InvalidPath {
                path: project_dir,
                reason: "not an existing directory".to_string(),
            });
        }

        let source = project_dir.join(&self.source);
        debug!(project = %project_dir.display(), source = %source.display(), "resolved build config");
        Ok(BuildPlan {
            target: BuildTarget::new(source, &self.goos, &self.goarch, &self.base_name),
            project_dir,
        })
    }
}

/// Validated build: absolute project directory plus target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPlan {
    project_dir: PathBuf,
    target: BuildTarget,
}

impl BuildPlan {
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    #[must_use]
    pub const fn target(&self) -> &BuildTarget {
        &self.target
    }

    /// Where the artifact will be written.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.target.output_path(&self.project_dir)
    }

    /// Run `locate`, turning absence into [`Error::ToolchainNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolchainNotFound`] when `locate` yields nothing.
    pub fn find_toolchain(
        &self,
        locate: impl FnOnce() -> Option<ToolchainLocation>,
    ) -> Result<ToolchainLocation> {
        locate().ok_or(Error::ToolchainNotFound)
    }

    #[must_use]
    pub fn invoker(&self) -> BuildInvoker {
        BuildInvoker::new(&self.project_dir)
    }

    /// Build with the given toolchain.
    #[must_use]
    pub fn invoke(&self, toolchain: &Path) -> BuildResult {
        self.invoker().invoke(toolchain, &self.target)
    }
}
