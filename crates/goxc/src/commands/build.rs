//! Go cross-compilation command.

use std::io::{self, BufRead, Write};
use std::path::Path;

use goxc::{
    BuildConfig, BuildPlan, DEFAULT_BASE_NAME, DEFAULT_GOARCH, DEFAULT_GOOS, DEFAULT_SOURCE,
    SearchLimits, ToolchainLocation,
};
use tracing::{error, info};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::commands::host_locator;
use crate::terminal::{self, Spinner};

/// Arguments for the `build` command.
pub struct BuildArgs<'a> {
    pub project: Option<&'a Path>,
    pub source: Option<&'a str>,
    pub goos: Option<&'a str>,
    pub goarch: Option<&'a str>,
    pub name: Option<&'a str>,
    pub go: Option<&'a Path>,
    pub interactive: bool,
    pub limits: SearchLimits,
}

/// Handle the `build` command.
pub fn cmd_build(args: &BuildArgs<'_>) -> i32 {
    let config = match collect_config(args, &mut io::stdin().lock()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to read input");
            terminal::error(&e.to_string());
            return EXIT_FAILURE;
        }
    };

    let plan = match config.resolve() {
        Ok(plan) => plan,
        Err(e) => {
            terminal::error(&e.to_string());
            return EXIT_FAILURE;
        }
    };

    let Some(toolchain) = find_toolchain(&plan, args) else {
        return EXIT_FAILURE;
    };

    print_plan(&plan);

    let target = plan.target();
    let result = {
        let _spinner = Spinner::new(format!("go build ({}/{})", target.goos(), target.goarch()));
        plan.invoke(toolchain.path())
    };

    // Toolchain output goes to stdout untouched
    if !result.output_bytes().is_empty() {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(result.output_bytes()).and_then(|()| stdout.flush()) {
            error!(error = %e, "failed to relay toolchain output");
        }
    }

    if result.success() {
        info!(output = %result.output_path().display(), "build complete");
        terminal::success("Build complete");
        terminal::path_output(result.output_path());
        EXIT_SUCCESS
    } else {
        terminal::error(&format!(
            "Build failed: {}",
            result.failure().unwrap_or("unknown error")
        ));
        EXIT_FAILURE
    }
}

/// Apply command-line values, prompting on `input` for the rest when interactive.
fn collect_config(args: &BuildArgs<'_>, input: &mut impl BufRead) -> goxc::Result<BuildConfig> {
    let mut ask = |value: Option<&str>, label: &str, default: &str| -> io::Result<String> {
        match value {
            Some(value) => Ok(value.to_string()),
            None if args.interactive => terminal::prompt(&mut *input, label, default),
            None => Ok(default.to_string()),
        }
    };

    let cwd = std::env::current_dir()
        .map_or_else(|_| ".".to_string(), |dir| dir.display().to_string());
    let mut config = BuildConfig::new();
    config = match args.project {
        Some(dir) => config.with_project_dir(dir),
        None if args.interactive => {
            config.with_project_dir(ask(None, "Go project directory", &cwd)?)
        }
        None => config,
    };

    Ok(config
        .with_source(&ask(args.source, "Go source file", DEFAULT_SOURCE)?)
        .with_goos(&ask(args.goos, "Target GOOS (windows / linux / darwin)", DEFAULT_GOOS)?)
        .with_goarch(&ask(args.goarch, "Target GOARCH (amd64 / arm64)", DEFAULT_GOARCH)?)
        .with_base_name(&ask(args.name, "Output base name", DEFAULT_BASE_NAME)?))
}

fn find_toolchain(plan: &BuildPlan, args: &BuildArgs<'_>) -> Option<ToolchainLocation> {
    let found = match args.go {
        Some(path) => plan.find_toolchain(|| ToolchainLocation::explicit(path)),
        None => {
            let spinner = Spinner::new("Searching for Go toolchain");
            let found = plan.find_toolchain(|| host_locator(args.limits.clone()).locate());
            if found.is_err() {
                spinner.finish_with_failure("Go toolchain not found");
            }
            found
        }
    };

    match found {
        Ok(toolchain) => {
            terminal::info(&format!(
                "Using Go toolchain: {} ({})",
                toolchain.path().display(),
                toolchain.source()
            ));
            Some(toolchain)
        }
        Err(e) => {
            match args.go {
                Some(path) => terminal::error(&format!("{} is not a file", path.display())),
                None => terminal::error(&e.to_string()),
            }
            None
        }
    }
}

fn print_plan(plan: &BuildPlan) {
    let target = plan.target();
    terminal::header("Build");
    terminal::field("project", plan.project_dir().display());
    terminal::field("source", target.source().display());
    terminal::field("target", format!("{}/{}", target.goos(), target.goarch()));
    terminal::field("output", plan.output_path().display());
    eprintln!();
}
