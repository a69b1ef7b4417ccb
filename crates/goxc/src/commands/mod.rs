//! Command implementations.
//!
//! Each submodule handles a specific CLI command.

mod build;
mod locate;

use goxc::{SearchLimits, ToolchainLocator};

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Build { .. } => handle_build(cli),
        Commands::Locate { scan } => locate::cmd_locate(scan.limits()),
    }
}

fn handle_build(cli: &Cli) -> i32 {
    let Commands::Build {
        project,
        source,
        os,
        arch,
        name,
        go,
        interactive,
        scan,
    } = &cli.command
    else {
        unreachable!("build command variant mismatch");
    };

    build::cmd_build(&build::BuildArgs {
        project: project.as_deref(),
        source: source.as_deref(),
        goos: os.as_deref(),
        goarch: arch.as_deref(),
        name: name.as_deref(),
        go: go.as_deref(),
        interactive: *interactive,
        limits: scan.limits(),
    })
}

/// Host locator with the given volume scan limits.
fn host_locator(limits: SearchLimits) -> ToolchainLocator {
    ToolchainLocator::for_host().with_scan_limits(limits)
}
