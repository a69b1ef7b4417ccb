//! Bounded-depth recursive file search.
//!
//! Depth is counted in directory segments below the scan root. Directories
//! deeper than the budget are pruned before they are listed, so a scan never
//! reads a directory it is not allowed to descend into. Files directly inside
//! a directory at the depth ceiling are still checked.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, trace};
use walkdir::WalkDir;

/// Default depth budget for install directory scans.
pub const DEFAULT_SCAN_DEPTH: usize = 4;

/// Limits applied to a single traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum directory depth below the root that may be listed.
    pub max_depth: usize,
    /// Maximum number of entries yielded before giving up.
    pub max_entries: Option<u64>,
    /// Maximum wall-clock time before giving up.
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    /// Depth-only limits.
    #[must_use]
    pub const fn depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            max_entries: None,
            time_limit: None,
        }
    }

    /// Cap the number of visited entries.
    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: Option<u64>) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Cap the elapsed time.
    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(DEFAULT_SCAN_DEPTH)
    }
}

/// Shared flag that stops a running traversal at the next entry.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Visible to every clone.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a traversal stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Found,
    Exhausted,
    EntryLimit,
    TimeLimit,
    Cancelled,
}

/// Outcome of a traversal, with counters for diagnostics.
#[derive(Clone, Debug)]
pub struct SearchReport {
    /// First matching file, if any.
    pub found: Option<PathBuf>,
    /// Entries yielded by the walk (files and directories, root included).
    pub visited: u64,
    /// Deepest directory that was yielded, relative to the root.
    pub deepest_dir: usize,
    pub stop: StopReason,
}

impl SearchReport {
    const fn empty(stop: StopReason) -> Self {
        Self {
            found: None,
            visited: 0,
            deepest_dir: 0,
            stop,
        }
    }
}

/// Depth-limited search for the first file whose name is in a target set.
#[derive(Clone, Debug, Default)]
pub struct BoundedSearch {
    limits: SearchLimits,
    cancel: CancelToken,
}

impl BoundedSearch {
    #[must_use]
    pub fn new(limits: SearchLimits) -> Self {
        Self {
            limits,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token shared with the caller.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub const fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Path of the first matching file under `root`, or `None`.
    #[must_use]
    pub fn find(&self, root: &Path, names: &[&str]) -> Option<PathBuf> {
        self.run(root, names).found
    }

    /// Run the traversal and report how it ended.
    ///
    /// A missing root is an empty subtree. Unreadable entries are skipped.
    #[must_use]
    pub fn run(&self, root: &Path, names: &[&str]) -> SearchReport {
        if !root.exists() {
            trace!(root = %root.display(), "scan root does not exist");
            return SearchReport::empty(StopReason::Exhausted);
        }

        let max_depth = self.limits.max_depth;
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .max_depth(max_depth.saturating_add(1))
            .into_iter()
            .filter_entry(move |entry| !(entry.file_type().is_dir() && entry.depth() > max_depth));

        let started = Instant::now();
        let mut report = SearchReport::empty(StopReason::Exhausted);

        for entry in walker {
            if self.cancel.is_cancelled() {
                report.stop = StopReason::Cancelled;
                break;
            }
            if self.limits.time_limit.is_some_and(|limit| started.elapsed() >= limit) {
                report.stop = StopReason::TimeLimit;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    trace!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            report.visited += 1;
            if self.limits.max_entries.is_some_and(|max| report.visited > max) {
                report.stop = StopReason::EntryLimit;
                break;
            }

            if entry.file_type().is_dir() {
                report.deepest_dir = report.deepest_dir.max(entry.depth());
                continue;
            }

            let name_matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| names.contains(&name));
            // Symlinks are resolved here; broken ones fail is_file and are skipped.
            if name_matches && entry.path().is_file() {
                report.found = Some(entry.into_path());
                report.stop = StopReason::Found;
                break;
            }
        }

        if !matches!(report.stop, StopReason::Found | StopReason::Exhausted) {
            debug!(
                root = %root.display(),
                visited = report.visited,
                reason = ?report.stop,
                "scan stopped early"
            );
        }
        report
    }
}
