//! Structured `go build` invocation and result capture.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, error, info_span};

use crate::target::BuildTarget;
use crate::{Error, Result};

/// Linker flags that strip the symbol table and DWARF info.
pub const STRIP_LDFLAGS: &str = "-s -w";

/// Executable, arguments, environment overlay and working directory of one
/// child process. Arguments are passed as a vector, never through a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    env: Vec<(OsString, OsString)>,
    current_dir: PathBuf,
}

/// Combined output and exit status of a finished child.
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    pub output: Vec<u8>,
}

impl Invocation {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            current_dir: current_dir.into(),
        }
    }

    /// `go build -ldflags "-s -w" -o <out> <source>` with cgo disabled and
    /// `GOOS`/`GOARCH` set, run from `project_dir`.
    #[must_use]
    pub fn go_build(toolchain: &Path, project_dir: &Path, target: &BuildTarget) -> Self {
        Self::new(toolchain, project_dir)
            .arg("build")
            .arg("-ldflags")
            .arg(STRIP_LDFLAGS)
            .arg("-o")
            .arg(target.output_path(project_dir))
            .arg(target.source())
            .env("CGO_ENABLED", "0")
            .env("GOOS", target.goos())
            .env("GOARCH", target.goarch())
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add an environment override on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    #[must_use]
    pub fn env_overlay(&self) -> &[(OsString, OsString)] {
        &self.env
    }

    #[must_use]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Check the descriptor before anything is spawned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInvocation`] if the program is not a file, the
    /// working directory is not a directory, or any argument or environment
    /// entry is empty or contains a NUL byte.
    pub fn validate(&self) -> Result<()> {
        if !self.program.is_file() {
            return Err(Error::InvalidInvocation(format!(
                "program {} is not a file",
                self.program.display()
            )));
        }
        if !self.current_dir.is_dir() {
            return Err(Error::InvalidInvocation(format!(
                "working directory {} is not a directory",
                self.current_dir.display()
            )));
        }
        for arg in &self.args {
            if arg.is_empty() || has_nul(arg) {
                return Err(Error::InvalidInvocation(format!("bad argument {arg:?}")));
            }
        }
        for (key, value) in &self.env {
            let bad_key = key.is_empty() || has_nul(key) || key.to_string_lossy().contains('=');
            if bad_key || has_nul(value) {
                return Err(Error::InvalidInvocation(format!(
                    "bad environment entry {key:?}={value:?}"
                )));
            }
        }
        Ok(())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .current_dir(&self.current_dir)
            .stdin(Stdio::null());
        cmd
    }

    /// Run to completion with stdout and stderr sharing one pipe.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the pipe cannot be created, the process
    /// cannot be spawned, or waiting on it fails.
    pub fn run(&self) -> io::Result<Captured> {
        let (mut reader, writer) = io::pipe()?;
        let mut cmd = self.command();
        cmd.stdout(writer.try_clone()?).stderr(writer);
        let mut child = cmd.spawn()?;
        // The command still owns the write ends; drop it so EOF arrives.
        drop(cmd);

        let mut output = Vec::new();
        let read = reader.read_to_end(&mut output);
        let status = child.wait()?;
        read?;
        Ok(Captured { status, output })
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key.to_string_lossy(), value.to_string_lossy())?;
        }
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

fn has_nul(s: &OsStr) -> bool {
    s.as_encoded_bytes().contains(&0)
}

/// Outcome of one build. Never mutated after creation.
#[derive(Clone, Debug)]
pub struct BuildResult {
    success: bool,
    output: Vec<u8>,
    output_path: PathBuf,
    exit_code: Option<i32>,
    failure: Option<String>,
}

impl BuildResult {
    const fn failed(
        output: Vec<u8>,
        output_path: PathBuf,
        exit_code: Option<i32>,
        detail: String,
    ) -> Self {
        Self {
            success: false,
            output,
            output_path,
            exit_code,
            failure: Some(detail),
        }
    }

    /// True iff the toolchain exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Combined stdout/stderr bytes, exactly as the toolchain wrote them.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Combined output as text. Invalid UTF-8 is replaced for display.
    #[must_use]
    pub fn output(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }

    /// Produced artifact; `None` unless the build succeeded.
    #[must_use]
    pub fn artifact(&self) -> Option<&Path> {
        self.success.then_some(self.output_path.as_path())
    }

    /// Where the artifact was requested, regardless of outcome.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Launch or exit failure description.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Keep a successful result, or convert a failed one into [`Error::BuildFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::BuildFailed`] carrying the combined output when the
    /// build did not succeed.
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        Err(Error::BuildFailed {
            detail: self
                .failure
                .unwrap_or_else(|| "toolchain reported failure".to_string()),
            output: String::from_utf8_lossy(&self.output).into_owned(),
        })
    }
}

/// Runs `go build` for a target inside one project directory.
#[derive(Clone, Debug)]
pub struct BuildInvoker {
    project_dir: PathBuf,
}

impl BuildInvoker {
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Invocation that [`invoke`](Self::invoke) would run.
    #[must_use]
    pub fn invocation(&self, toolchain: &Path, target: &BuildTarget) -> Invocation {
        Invocation::go_build(toolchain, &self.project_dir, target)
    }

    /// Build `target` with `toolchain`, blocking until the process exits.
    ///
    /// No retries. Any failure leaves `success` false and is described in
    /// [`BuildResult::failure`].
    #[must_use]
    pub fn invoke(&self, toolchain: &Path, target: &BuildTarget) -> BuildResult {
        let _span = info_span!("go_build").entered();
        let invocation = self.invocation(toolchain, target);
        let output_path = target.output_path(&self.project_dir);

        if let Err(e) = invocation.validate() {
            error!(error = %e, "refusing to run toolchain");
            return BuildResult::failed(Vec::new(), output_path, None, e.to_string());
        }

        debug!(command = %invocation, dir = %self.project_dir.display(), "running toolchain");

        let captured = match invocation.run() {
            Ok(captured) => captured,
            Err(e) => {
                error!(error = %e, program = %toolchain.display(), "failed to run toolchain");
                return BuildResult::failed(
                    Vec::new(),
                    output_path,
                    None,
                    format!("failed to run {}: {e}", toolchain.display()),
                );
            }
        };

        let output = captured.output;
        let exit_code = captured.status.code();
        if captured.status.success() {
            debug!(output = %output_path.display(), "build succeeded");
            return BuildResult {
                success: true,
                output,
                output_path,
                exit_code,
                failure: None,
            };
        }

        let detail = exit_code.map_or_else(
            || format!("toolchain terminated abnormally ({})", captured.status),
            |code| format!("toolchain exited with status {code}"),
        );
        error!(exit_code = ?exit_code, dir = %self.project_dir.display(), "go build failed");
        BuildResult::failed(output, output_path, exit_code, detail)
    }
}
