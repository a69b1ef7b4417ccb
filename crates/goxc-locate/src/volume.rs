//! Storage volume enumeration.
//!
//! Only drive-letter hosts have more than one filesystem root, so the
//! concrete enumerator exists on Windows alone. Single-rooted hosts never
//! construct one and the locator skips every volume strategy.

use std::fmt;
use std::path::{Path, PathBuf};

/// Top-level directory of a mounted storage volume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeRoot(PathBuf);

impl VolumeRoot {
    /// Wrap a root directory.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Root directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for VolumeRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Source of volume roots for volume-aware discovery strategies.
pub trait VolumeEnumerator {
    /// List reachable volume roots in enumeration order.
    fn volume_roots(&self) -> Vec<VolumeRoot>;
}

/// Enumerates `A:\` through `Z:\`, keeping the letters that resolve.
#[cfg(windows)]
#[derive(Clone, Copy, Debug, Default)]
pub struct DriveLetters;

#[cfg(windows)]
impl VolumeEnumerator for DriveLetters {
    fn volume_roots(&self) -> Vec<VolumeRoot> {
        let roots: Vec<VolumeRoot> = ('A'..='Z')
            .map(|letter| PathBuf::from(format!("{letter}:\\")))
            .filter(|root| root.exists())
            .map(VolumeRoot)
            .collect();
        tracing::debug!(count = roots.len(), "enumerated drive roots");
        roots
    }
}
