//! goxc - Go cross-compilation driver
//!
//! Finds a Go toolchain on the host and runs `go build` for an arbitrary
//! `GOOS`/`GOARCH`, writing `<base>-<os>-<arch>[.exe]` into the project.
//!
//! # Example
//!
//! ```no_run
//! use goxc::BuildConfig;
//!
//! let config = BuildConfig::new().with_goos("linux").with_goarch("arm64");
//! let (go, result) = goxc::build(&config, goxc::locate_go)?;
//! println!("built with {}: {}", go.path().display(), result.output_path().display());
//! # Ok::<(), goxc::Error>(())
//! ```

pub use goxc_locate::{
    CancelToken, DEFAULT_SCAN_DEPTH, HostFamily, LocationSource, LocatorConfig, SearchLimits,
    SearchStrategy, ToolchainLocation, ToolchainLocator, locate_go,
};

mod config;
mod error;
mod invoke;
mod target;

pub use config::{
    BuildConfig, BuildPlan, DEFAULT_BASE_NAME, DEFAULT_GOARCH, DEFAULT_GOOS, DEFAULT_SOURCE,
};
pub use error::{Error, Result};
pub use invoke::{BuildInvoker, BuildResult, Captured, Invocation, STRIP_LDFLAGS};
pub use target::{BuildTarget, WINDOWS_EXE_SUFFIX};

/// Resolve `config`, locate a toolchain and build.
///
/// The project path is validated before `locate` runs, so an invalid path
/// performs no discovery and no build.
///
/// # Errors
///
/// - [`Error::InvalidPath`] if the project directory cannot be resolved.
/// - [`Error::ToolchainNotFound`] if `locate` finds nothing.
/// - [`Error::BuildFailed`] if the toolchain cannot run or exits non-zero.
pub fn build(
    config: &BuildConfig,
    locate: impl FnOnce() -> Option<ToolchainLocation>,
) -> Result<(ToolchainLocation, BuildResult)> {
    let plan = config.resolve()?;
    let toolchain = plan.find_toolchain(locate)?;
    let result = plan.invoke(toolchain.path()).into_result()?;
    Ok((toolchain, result))
}
