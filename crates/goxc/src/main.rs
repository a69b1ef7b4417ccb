//! goxc CLI - Go cross-compiler

mod cli;
mod commands;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the level follows -v / -s
    let default_level = if cli.verbose {
        "goxc=debug,goxc_locate=debug"
    } else if cli.silent {
        "goxc=error,goxc_locate=error"
    } else {
        "goxc=info,goxc_locate=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let exit_code = commands::run_command(&cli);

    // Keep the console window open when launched by double-click.
    if cfg!(windows) && cli.command.is_interactive() {
        let _ = terminal::pause("Press Enter to exit...");
    }

    std::process::exit(exit_code);
}
