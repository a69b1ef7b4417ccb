//! CLI definitions and argument types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use goxc::{DEFAULT_SCAN_DEPTH, SearchLimits};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "goxc")]
#[command(about = "Go cross-compiler - finds a Go toolchain and builds for any GOOS/GOARCH")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cross-compile a Go source file
    Build {
        /// Go project directory (default: current directory)
        #[arg(short, long, value_name = "DIR")]
        project: Option<PathBuf>,

        /// Go source file, relative to the project (default: main.go)
        #[arg(long, value_name = "FILE")]
        source: Option<String>,

        /// Target GOOS (default: windows)
        #[arg(long, value_name = "GOOS")]
        os: Option<String>,

        /// Target GOARCH (default: amd64)
        #[arg(long, value_name = "GOARCH")]
        arch: Option<String>,

        /// Output base name (default: main)
        #[arg(short, long, value_name = "NAME")]
        name: Option<String>,

        /// Go executable to use instead of discovery
        #[arg(long, value_name = "PATH")]
        go: Option<PathBuf>,

        /// Prompt for every parameter not given on the command line
        #[arg(short, long)]
        interactive: bool,

        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Find the Go toolchain and print its path
    Locate {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

impl Commands {
    /// Whether the command reads answers from the terminal.
    pub const fn is_interactive(&self) -> bool {
        matches!(self, Self::Build { interactive: true, .. })
    }
}

/// Bounds for the recursive volume scan.
#[derive(Args, Clone, Debug)]
pub struct ScanArgs {
    /// Maximum directory depth for the volume scan
    #[arg(long, default_value_t = DEFAULT_SCAN_DEPTH)]
    pub max_depth: usize,

    /// Stop the volume scan after visiting this many entries
    #[arg(long, value_name = "N")]
    pub max_entries: Option<u64>,

    /// Stop the volume scan after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl ScanArgs {
    pub fn limits(&self) -> SearchLimits {
        SearchLimits::depth(self.max_depth)
            .with_max_entries(self.max_entries)
            .with_time_limit(self.timeout.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["goxc", "build"]).unwrap();
        let Commands::Build {
            project,
            source,
            interactive,
            scan,
            ..
        } = cli.command
        else {
            panic!("expected build");
        };
        assert!(project.is_none());
        assert!(source.is_none());
        assert!(!interactive);
        assert_eq!(scan.limits(), SearchLimits::default());
    }

    #[test]
    fn test_scan_limits() {
        let cli = Cli::try_parse_from([
            "goxc",
            "locate",
            "--max-depth",
            "2",
            "--max-entries",
            "100",
            "--timeout",
            "5",
        ])
        .unwrap();
        let Commands::Locate { scan } = cli.command else {
            panic!("expected locate");
        };
        let limits = scan.limits();
        assert_eq!(limits.max_depth, 2);
        assert_eq!(limits.max_entries, Some(100));
        assert_eq!(limits.time_limit, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_interactive_flag() {
        let cli = Cli::try_parse_from(["goxc", "build", "-i", "--os", "linux"]).unwrap();
        assert!(cli.command.is_interactive());
        let cli = Cli::try_parse_from(["goxc", "locate"]).unwrap();
        assert!(!cli.command.is_interactive());
    }

    #[test]
    fn test_verbose_conflicts_with_silent() {
        assert!(Cli::try_parse_from(["goxc", "-v", "-s", "locate"]).is_err());
    }
}
