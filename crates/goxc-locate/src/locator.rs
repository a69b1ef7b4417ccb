//! Toolchain discovery orchestration.

use std::cell::OnceCell;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, debug_span, info, trace};
use walkdir::WalkDir;

use crate::host::{HostFamily, SCAN_TARGET_NAMES};
use crate::search::{BoundedSearch, CancelToken, SearchLimits};
use crate::strategy::SearchStrategy;
use crate::volume::{VolumeEnumerator, VolumeRoot};

/// Directory levels under a volume root probed for `bin/<exe>`.
pub const VOLUME_SUBDIR_NESTING: usize = 1;

/// Likely install directories under each volume root, as path segments.
pub const INSTALL_DIR_CANDIDATES: &[&[&str]] = &[
    &["Go"],
    &["Program Files", "Go"],
    &["Program Files (x86)", "Go"],
];

/// How a toolchain path was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationSource {
    /// Found by a discovery strategy.
    Discovered(SearchStrategy),
    /// Supplied by the user and checked to exist.
    Explicit,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovered(strategy) => write!(f, "{strategy}"),
            Self::Explicit => f.write_str("explicit"),
        }
    }
}

/// Absolute path to a verified toolchain executable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolchainLocation {
    path: PathBuf,
    source: LocationSource,
}

impl ToolchainLocation {
    const fn discovered(path: PathBuf, strategy: SearchStrategy) -> Self {
        Self {
            path,
            source: LocationSource::Discovered(strategy),
        }
    }

    /// Use a caller-supplied executable, if it exists as a file.
    #[must_use]
    pub fn explicit(path: &Path) -> Option<Self> {
        if !path.is_file() {
            debug!(path = %path.display(), "explicit toolchain is not a file");
            return None;
        }
        let path = std::path::absolute(path).ok()?;
        Some(Self {
            path,
            source: LocationSource::Explicit,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn source(&self) -> LocationSource {
        self.source
    }

    /// Winning strategy, when the path was discovered.
    #[must_use]
    pub const fn strategy(&self) -> Option<SearchStrategy> {
        match self.source {
            LocationSource::Discovered(strategy) => Some(strategy),
            LocationSource::Explicit => None,
        }
    }

    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Inputs to discovery. Environment-derived fields are captured up front so
/// discovery itself never reads process state.
#[derive(Clone, Debug)]
pub struct LocatorConfig {
    pub family: HostFamily,
    /// Value of `PATH`.
    pub search_path: Option<OsString>,
    /// Value of `PATHEXT` (Windows only).
    pub path_ext: Option<OsString>,
    /// Conventional install locations, probed in order.
    pub install_paths: Vec<PathBuf>,
    /// Limits for the volume scan.
    pub scan_limits: SearchLimits,
    /// Directory levels probed by the volume subdirectory strategy.
    pub subdir_nesting: usize,
}

impl LocatorConfig {
    /// Configuration for the running host.
    #[must_use]
    pub fn for_host() -> Self {
        let family = HostFamily::current();
        let user_profile = std::env::var_os("USERPROFILE").map(PathBuf::from);
        Self {
            family,
            search_path: std::env::var_os("PATH"),
            path_ext: std::env::var_os("PATHEXT"),
            install_paths: family.install_paths(user_profile.as_deref()),
            scan_limits: SearchLimits::default(),
            subdir_nesting: VOLUME_SUBDIR_NESTING,
        }
    }

    /// Empty configuration for `family`: no search path, no install paths.
    #[must_use]
    pub fn empty(family: HostFamily) -> Self {
        Self {
            family,
            search_path: None,
            path_ext: None,
            install_paths: Vec::new(),
            scan_limits: SearchLimits::default(),
            subdir_nesting: VOLUME_SUBDIR_NESTING,
        }
    }

    #[must_use]
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    #[must_use]
    pub fn with_path_ext(mut self, path_ext: impl Into<OsString>) -> Self {
        self.path_ext = Some(path_ext.into());
        self
    }

    #[must_use]
    pub fn with_install_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.install_paths = paths;
        self
    }

    #[must_use]
    pub const fn with_scan_limits(mut self, limits: SearchLimits) -> Self {
        self.scan_limits = limits;
        self
    }

    #[must_use]
    pub const fn with_subdir_nesting(mut self, levels: usize) -> Self {
        self.subdir_nesting = levels;
        self
    }
}

/// Finds the Go toolchain by trying each strategy in cost order.
pub struct ToolchainLocator {
    config: LocatorConfig,
    volumes: Option<Box<dyn VolumeEnumerator>>,
    cancel: CancelToken,
}

impl ToolchainLocator {
    /// Locator without a volume enumerator; volume strategies are skipped.
    #[must_use]
    pub fn new(config: LocatorConfig) -> Self {
        Self {
            config,
            volumes: None,
            cancel: CancelToken::new(),
        }
    }

    /// Locator for the running host, with drive enumeration on Windows.
    #[must_use]
    #[allow(clippy::let_and_return)]
    pub fn for_host() -> Self {
        let locator = Self::new(LocatorConfig::for_host());
        #[cfg(windows)]
        let locator = locator.with_volumes(crate::volume::DriveLetters);
        locator
    }

    /// Attach a volume enumerator. Only consulted on volume-aware families.
    #[must_use]
    pub fn with_volumes(mut self, volumes: impl VolumeEnumerator + 'static) -> Self {
        self.volumes = Some(Box::new(volumes));
        self
    }

    /// Replace the volume scan limits.
    #[must_use]
    pub fn with_scan_limits(mut self, limits: SearchLimits) -> Self {
        self.config.scan_limits = limits;
        self
    }

    /// Share a cancellation token with the volume scan.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Whether `strategy` can run with this configuration.
    #[must_use]
    pub const fn applies(&self, strategy: SearchStrategy) -> bool {
        !strategy.needs_volumes() || (self.config.family.has_volumes() && self.volumes.is_some())
    }

    /// Run discovery. The first strategy with a hit wins; exhaustion yields `None`.
    #[must_use]
    pub fn locate(&self) -> Option<ToolchainLocation> {
        let _span = debug_span!("locate").entered();
        // Enumerated at most once, and only if a volume strategy runs.
        let roots: OnceCell<Vec<VolumeRoot>> = OnceCell::new();

        for strategy in SearchStrategy::ALL {
            if !self.applies(strategy) {
                trace!(%strategy, "strategy not applicable");
                continue;
            }
            debug!(%strategy, tier = strategy.cost_tier(), "trying strategy");

            let hit = match strategy {
                SearchStrategy::SearchPath => self.lookup_search_path(),
                SearchStrategy::InstallPaths => self.probe_install_paths(),
                SearchStrategy::VolumeSubdirs => {
                    self.probe_volume_subdirs(roots.get_or_init(|| self.volume_roots()))
                }
                SearchStrategy::VolumeScan => {
                    self.scan_install_dirs(roots.get_or_init(|| self.volume_roots()))
                }
            };

            if let Some(path) = hit {
                info!(path = %path.display(), %strategy, "found go toolchain");
                return Some(ToolchainLocation::discovered(path, strategy));
            }
        }

        debug!("all discovery strategies exhausted");
        None
    }

    fn volume_roots(&self) -> Vec<VolumeRoot> {
        self.volumes
            .as_ref()
            .map(|volumes| volumes.volume_roots())
            .unwrap_or_default()
    }

    fn lookup_search_path(&self) -> Option<PathBuf> {
        let paths = self.config.search_path.as_ref()?;
        let names = self
            .config
            .family
            .search_path_names(self.config.path_ext.as_deref());

        // Relative and empty entries would resolve against the working directory.
        std::env::split_paths(paths)
            .filter(|dir| dir.is_absolute())
            .find_map(|dir| {
                names
                    .iter()
                    .map(|name| dir.join(name))
                    .find(|candidate| is_executable_file(candidate))
            })
    }

    fn probe_install_paths(&self) -> Option<PathBuf> {
        self.config
            .install_paths
            .iter()
            .inspect(|path| trace!(path = %path.display(), "probing"))
            .find(|path| path.is_file())
            .cloned()
    }

    fn probe_volume_subdirs(&self, roots: &[VolumeRoot]) -> Option<PathBuf> {
        let exe = self.config.family.executable_name();
        roots.iter().find_map(|root| {
            WalkDir::new(root.path())
                .min_depth(1)
                .max_depth(self.config.subdir_nesting)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_dir())
                .map(|entry| entry.path().join("bin").join(exe))
                .find(|candidate| candidate.is_file())
        })
    }

    fn scan_install_dirs(&self, roots: &[VolumeRoot]) -> Option<PathBuf> {
        let search = BoundedSearch::new(self.config.scan_limits.clone())
            .with_cancel_token(self.cancel.clone());

        roots
            .iter()
            .flat_map(|root| {
                INSTALL_DIR_CANDIDATES.iter().map(move |segments| {
                    segments
                        .iter()
                        .fold(root.path().to_path_buf(), |dir, segment| dir.join(segment))
                })
            })
            .find_map(|dir| {
                trace!(dir = %dir.display(), "scanning");
                search.find(&dir, SCAN_TARGET_NAMES)
            })
    }
}

/// Regular file that the current user may execute.
fn is_executable_file(path: &Path) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Fixed roots, counting how often they are listed.
    struct FakeVolumes {
        roots: Vec<PathBuf>,
        calls: Rc<Cell<usize>>,
    }

    impl VolumeEnumerator for FakeVolumes {
        fn volume_roots(&self) -> Vec<VolumeRoot> {
            self.calls.set(self.calls.get() + 1);
            self.roots.iter().cloned().map(VolumeRoot::new).collect()
        }
    }

    fn fake_volumes(roots: Vec<PathBuf>) -> (FakeVolumes, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            FakeVolumes {
                roots,
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }

    fn touch_exe(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn test_search_path_wins_without_volume_scan() {
        let temp = tempfile::tempdir().unwrap();
        let on_path = temp.path().join("path/go.exe");
        touch_exe(&on_path);
        // Also present where the volume strategies would look
        touch_exe(&temp.path().join("vol/Go/bin/go.exe"));
        let install = temp.path().join("install/go.exe");
        touch_exe(&install);

        let (volumes, calls) = fake_volumes(vec![temp.path().join("vol")]);
        let config = LocatorConfig::empty(HostFamily::Windows)
            .with_search_path(temp.path().join("path"))
            .with_path_ext(".exe")
            .with_install_paths(vec![install]);
        let locator = ToolchainLocator::new(config).with_volumes(volumes);

        let found = locator.locate().unwrap();
        assert_eq!(found.path(), on_path);
        assert_eq!(found.strategy(), Some(SearchStrategy::SearchPath));
        assert_eq!(calls.get(), 0, "volumes must not be enumerated");
    }

    #[test]
    fn test_search_path_skips_relative_and_missing_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let bin = temp.path().join("bin");
        touch_exe(&bin.join("go"));

        let search_path =
            std::env::join_paths([PathBuf::from("relative"), temp.path().join("empty"), bin.clone()])
                .unwrap();
        let config = LocatorConfig::empty(HostFamily::Unix).with_search_path(search_path);
        let found = ToolchainLocator::new(config).locate().unwrap();
        assert_eq!(found.path(), bin.join("go"));
    }

    #[cfg(unix)]
    #[test]
    fn test_search_path_requires_exec_bit() {
        let temp = tempfile::tempdir().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("go"), b"").unwrap();

        let config = LocatorConfig::empty(HostFamily::Unix).with_search_path(&bin);
        assert_eq!(ToolchainLocator::new(config).locate(), None);
    }

    #[test]
    fn test_install_paths_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let second = temp.path().join("second/go");
        let third = temp.path().join("third/go");
        touch_exe(&second);
        touch_exe(&third);

        let config = LocatorConfig::empty(HostFamily::Unix).with_install_paths(vec![
            temp.path().join("first/go"),
            second.clone(),
            third,
        ]);
        let found = ToolchainLocator::new(config).locate().unwrap();
        assert_eq!(found.path(), second);
        assert_eq!(found.strategy(), Some(SearchStrategy::InstallPaths));
    }

    #[test]
    fn test_volume_subdir_probe() {
        let temp = tempfile::tempdir().unwrap();
        let vol = temp.path().join("vol");
        let exe = vol.join("GoLang/bin/go.exe");
        touch_exe(&exe);
        fs::create_dir_all(vol.join("Apps")).unwrap();

        let (volumes, calls) = fake_volumes(vec![temp.path().join("missing"), vol]);
        let locator =
            ToolchainLocator::new(LocatorConfig::empty(HostFamily::Windows)).with_volumes(volumes);
        let found = locator.locate().unwrap();
        assert_eq!(found.path(), exe);
        assert_eq!(found.strategy(), Some(SearchStrategy::VolumeSubdirs));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_volume_subdirs_beat_scan() {
        let temp = tempfile::tempdir().unwrap();
        let vol = temp.path().join("vol");
        // Both strategies can see Go/bin/go.exe; the cheaper one must win.
        let exe = vol.join("Go/bin/go.exe");
        touch_exe(&exe);

        let (volumes, _) = fake_volumes(vec![vol]);
        let locator =
            ToolchainLocator::new(LocatorConfig::empty(HostFamily::Windows)).with_volumes(volumes);
        let found = locator.locate().unwrap();
        assert_eq!(found.strategy(), Some(SearchStrategy::VolumeSubdirs));
        assert_eq!(found.path(), exe);
    }

    #[test]
    fn test_volume_scan_finds_nested_install() {
        let temp = tempfile::tempdir().unwrap();
        let vol = temp.path().join("vol");
        let exe = vol.join("Program Files/Go/sdk/go1.22/bin/go.exe");
        touch_exe(&exe);

        let (volumes, calls) = fake_volumes(vec![vol]);
        let locator =
            ToolchainLocator::new(LocatorConfig::empty(HostFamily::Windows)).with_volumes(volumes);
        let found = locator.locate().unwrap();
        assert_eq!(found.path(), exe);
        assert_eq!(found.strategy(), Some(SearchStrategy::VolumeScan));
        assert_eq!(calls.get(), 1, "roots are enumerated once per locate");
    }

    #[test]
    fn test_volume_scan_respects_depth() {
        let temp = tempfile::tempdir().unwrap();
        let vol = temp.path().join("vol");
        touch_exe(&vol.join("Go/a/b/c/d/e/go.exe"));

        let (volumes, _) = fake_volumes(vec![vol.clone()]);
        let locator =
            ToolchainLocator::new(LocatorConfig::empty(HostFamily::Windows)).with_volumes(volumes);
        assert_eq!(locator.locate(), None);

        let (volumes, _) = fake_volumes(vec![vol]);
        let config = LocatorConfig::empty(HostFamily::Windows).with_scan_limits(SearchLimits::depth(5));
        let found = ToolchainLocator::new(config).with_volumes(volumes).locate();
        assert!(found.is_some());
    }

    #[test]
    fn test_unix_family_skips_volumes() {
        let temp = tempfile::tempdir().unwrap();
        let vol = temp.path().join("vol");
        touch_exe(&vol.join("Go/bin/go"));

        let (volumes, calls) = fake_volumes(vec![vol]);
        let locator =
            ToolchainLocator::new(LocatorConfig::empty(HostFamily::Unix)).with_volumes(volumes);
        assert!(!locator.applies(SearchStrategy::VolumeScan));
        assert_eq!(locator.locate(), None);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_exhaustion_returns_none() {
        let temp = tempfile::tempdir().unwrap();
        let (volumes, _) = fake_volumes(vec![temp.path().to_path_buf()]);
        let config = LocatorConfig::empty(HostFamily::Windows)
            .with_search_path(temp.path())
            .with_install_paths(vec![temp.path().join("nope.exe")]);
        assert_eq!(ToolchainLocator::new(config).with_volumes(volumes).locate(), None);
    }

    #[test]
    fn test_cancelled_scan_finds_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let vol = temp.path().join("vol");
        touch_exe(&vol.join("Go/sdk/go.exe"));

        let token = CancelToken::new();
        token.cancel();
        let (volumes, _) = fake_volumes(vec![vol]);
        let locator = ToolchainLocator::new(LocatorConfig::empty(HostFamily::Windows))
            .with_volumes(volumes)
            .with_cancel_token(token);
        assert_eq!(locator.locate(), None);
    }

    #[test]
    fn test_explicit_location() {
        let temp = tempfile::tempdir().unwrap();
        let exe = temp.path().join("go");
        touch_exe(&exe);

        let location = ToolchainLocation::explicit(&exe).unwrap();
        assert_eq!(location.source(), LocationSource::Explicit);
        assert_eq!(location.strategy(), None);
        assert!(location.path().is_absolute());

        assert!(ToolchainLocation::explicit(temp.path()).is_none());
        assert!(ToolchainLocation::explicit(&temp.path().join("missing")).is_none());
    }
}
