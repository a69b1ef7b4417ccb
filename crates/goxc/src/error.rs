use std::path::PathBuf;

use thiserror::Error;

/// Build driver errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Go toolchain not found; install Go and make sure it is on PATH")]
    ToolchainNotFound,
    #[error("Invalid project path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },
    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),
    #[error("Build failed: {detail}")]
    BuildFailed { detail: String, output: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
