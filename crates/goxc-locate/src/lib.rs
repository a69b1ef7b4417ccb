//! Go toolchain discovery.
//!
//! Strategies run cheapest first and stop at the first hit:
//!
//! 1. `PATH` lookup
//! 2. conventional install paths for the host family
//! 3. `<volume>/<subdir>/bin/go.exe` on every drive (Windows)
//! 4. bounded-depth scan of likely install directories on every drive (Windows)
//!
//! # Example
//!
//! ```no_run
//! use goxc_locate::ToolchainLocator;
//!
//! match ToolchainLocator::for_host().locate() {
//!     Some(go) => println!("{} (via {})", go.path().display(), go.source()),
//!     None => eprintln!("go not found"),
//! }
//! ```

mod host;
mod locator;
mod search;
mod strategy;
mod volume;

pub use host::{HostFamily, SCAN_TARGET_NAMES, TOOL_STEM};
pub use locator::{
    INSTALL_DIR_CANDIDATES, LocationSource, LocatorConfig, ToolchainLocation, ToolchainLocator,
    VOLUME_SUBDIR_NESTING,
};
pub use search::{
    BoundedSearch, CancelToken, DEFAULT_SCAN_DEPTH, SearchLimits, SearchReport, StopReason,
};
pub use strategy::SearchStrategy;
#[cfg(windows)]
pub use volume::DriveLetters;
pub use volume::{VolumeEnumerator, VolumeRoot};

/// Locate `go` on the running host with default settings.
#[must_use]
pub fn locate_go() -> Option<ToolchainLocation> {
    ToolchainLocator::for_host().locate()
}
