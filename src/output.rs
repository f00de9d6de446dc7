/// Abstraction over user-facing output.
///
/// Command modules use this trait instead of `println!`/`eprintln!` so that
/// output can be suppressed or redirected to JSON in a future
/// machine-readable mode.
pub trait UserOutput: Send + Sync {
    /// Informational status message (e.g., "Validating ports.yaml...")
    fn status(&self, message: &str);

    /// Success message (e.g., "Registry is valid")
    fn success(&self, message: &str);

    /// Warning message (advisory validation findings)
    fn warning(&self, message: &str);

    /// Error message (gating validation findings)
    fn error(&self, message: &str);

    /// A blank line separator.
    fn blank(&self);
}

/// Standard CLI output: stdout for status, stderr with ANSI colors for
/// warnings and errors.
pub struct CliOutput;

impl UserOutput for CliOutput {
    fn status(&self, message: &str) {
        println!("{}", message);
    }

    fn success(&self, message: &str) {
        println!("{}", message);
    }

    fn warning(&self, message: &str) {
        eprintln!("\x1b[33m{}\x1b[0m", message);
    }

    fn error(&self, message: &str) {
        eprintln!("\x1b[31m{}\x1b[0m", message);
    }

    fn blank(&self) {
        println!();
    }
}

/// Suppresses all output. Used in tests.
pub struct QuietOutput;

impl UserOutput for QuietOutput {
    fn status(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn blank(&self) {}
}
