//! Toolchain discovery command.

use goxc::SearchLimits;

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::commands::host_locator;
use crate::terminal::Spinner;

/// Handle the `locate` command. Prints the path on stdout.
pub fn cmd_locate(limits: SearchLimits) -> i32 {
    let spinner = Spinner::new("Searching for Go toolchain");
    let Some(toolchain) = host_locator(limits).locate() else {
        spinner.finish_with_failure("Go toolchain not found; install Go and make sure it is on PATH");
        return EXIT_FAILURE;
    };
    spinner.finish_with_success(&format!("Found via {}", toolchain.source()));

    println!("{}", toolchain.path().display());
    EXIT_SUCCESS
}
