//! Discovery strategies in increasing cost order.

use std::fmt;

/// One step of toolchain discovery.
///
/// Variants are declared in cost order; `Ord` follows that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SearchStrategy {
    /// Resolve the executable through `PATH`.
    SearchPath,
    /// Probe conventional install locations for the host family.
    InstallPaths,
    /// Probe `<volume>/<subdir>/bin/<exe>` for every volume root.
    VolumeSubdirs,
    /// Bounded recursive scan of likely install directories on every volume.
    VolumeScan,
}

impl SearchStrategy {
    /// All strategies, cheapest first.
    pub const ALL: [Self; 4] = [
        Self::SearchPath,
        Self::InstallPaths,
        Self::VolumeSubdirs,
        Self::VolumeScan,
    ];

    /// Relative cost; strategies run in ascending tier.
    #[must_use]
    pub const fn cost_tier(self) -> u8 {
        match self {
            Self::SearchPath => 1,
            Self::InstallPaths => 2,
            Self::VolumeSubdirs => 3,
            Self::VolumeScan => 4,
        }
    }

    /// Whether the strategy walks volume roots.
    #[must_use]
    pub const fn needs_volumes(self) -> bool {
        matches!(self, Self::VolumeSubdirs | Self::VolumeScan)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SearchPath => "search-path",
            Self::InstallPaths => "install-paths",
            Self::VolumeSubdirs => "volume-subdirs",
            Self::VolumeScan => "volume-scan",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
