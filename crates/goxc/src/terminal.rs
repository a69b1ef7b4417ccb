//! Terminal UI: spinner, styled status lines and prompts.

use std::borrow::Cow;
use std::io::{self, BufRead};
use std::path::Path;
use std::time::Duration;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for indeterminate progress.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Create a new spinner with a message.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        let bar = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Finish the spinner with a success message.
    pub fn finish_with_success(&self, message: &str) {
        self.bar.finish_and_clear();
        success(message);
    }

    /// Finish the spinner with a failure message.
    pub fn finish_with_failure(&self, message: &str) {
        self.bar.finish_and_clear();
        error(message);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

// ============================================================================
// Styled output helpers
// ============================================================================

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{} {}", style("→").cyan(), message);
}

/// Print a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a header/section title.
pub fn header(message: &str) {
    eprintln!("\n{}", style(message).bold());
}

/// Print a `label: value` line, label dimmed.
pub fn field(label: &str, value: impl std::fmt::Display) {
    eprintln!("  {:<10} {}", style(label).dim(), value);
}

/// Print a path output (like "-> /path/to/file").
pub fn path_output(path: &Path) {
    eprintln!("  {} {}", style("→").dim(), style(path.display()).dim());
}

// ============================================================================
// Prompts
// ============================================================================

/// Ask for a value: the label goes to stderr, the answer is read from `input`.
/// A blank answer or end of input returns `default`.
pub fn prompt(input: &mut impl BufRead, label: &str, default: &str) -> io::Result<String> {
    Term::stderr().write_str(&format!(
        "{} {} {}: ",
        style("?").cyan().bold(),
        label,
        style(format!("[{default}]")).dim()
    ))?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    let chosen = if answer.is_empty() { default } else { answer };
    Ok(chosen.to_string())
}

/// Block until a line (or end of input) arrives on stdin.
pub fn pause(message: &str) -> io::Result<()> {
    Term::stderr().write_str(&format!("\n{} ", style(message).dim()))?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_uses_answer() {
        let mut input = Cursor::new("linux\n");
        assert_eq!(prompt(&mut input, "GOOS", "windows").unwrap(), "linux");
    }

    #[test]
    fn test_prompt_blank_answer_uses_default() {
        let mut input = Cursor::new("\n");
        assert_eq!(prompt(&mut input, "GOOS", "windows").unwrap(), "windows");
    }

    #[test]
    fn test_prompt_end_of_input_uses_default() {
        let mut input = Cursor::new("");
        assert_eq!(prompt(&mut input, "GOARCH", "amd64").unwrap(), "amd64");
    }

    #[test]
    fn test_prompt_trims_and_reads_one_line() {
        let mut input = Cursor::new("  arm64 \r\napp\n");
        assert_eq!(prompt(&mut input, "GOARCH", "amd64").unwrap(), "arm64");
        assert_eq!(prompt(&mut input, "name", "main").unwrap(), "app");
    }
}
