use std::io::Write;

/// Exit code when the analyzer ran clean.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when the analyzer reported violations.
pub const EXIT_ERRORS_FOUND: i32 = 1;
/// Exit code for any failure before or while launching the analyzer.
pub const EXIT_WITH_EXCEPTIONS: i32 = 2;

/// Primitives of the hook framework that invokes this hook.
///
/// The hook adapter is the only caller.
pub trait Host {
    /// Emit raw text, unmodified.
    fn write(&mut self, text: &str);
    /// Report that the commit may proceed.
    fn success(&mut self, message: &str);
    /// Report that the commit must be aborted with `exit_code`.
    fn error(&mut self, message: &str, exit_code: i32);
}

/// Writes to the terminal: output and success on stdout, errors on stderr.
#[derive(Debug, Default)]
pub struct ConsoleHost;

impl Host for ConsoleHost {
    fn write(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        // Ignore a closed stdout.
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn success(&mut self, message: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{message}");
        let _ = stdout.flush();
    }

    fn error(&mut self, message: &str, exit_code: i32) {
        tracing::debug!(exit_code, "reporting hook failure");
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{message}");
    }
}
