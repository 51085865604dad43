use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;

/// A fully resolved analyzer command: the binary followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub binary: PathBuf,
    pub arguments: Vec<String>,
}

impl Invocation {
    /// Space-joined command line, for log output only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.binary.to_string_lossy().into_owned())
            .chain(self.arguments.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of an analyzer process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerRun {
    /// Captured stdout followed by captured stderr.
    pub output: String,
    /// True iff the process exited with status zero.
    pub success: bool,
}

/// The analyzer process could not be started.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum AnalyzerError {
    #[error("failed to launch {}: {source}", binary.display())]
    #[diagnostic(
        code(phpmd_hook::analyzer::launch),
        help("install PHPMD with `composer require --dev phpmd/phpmd`")
    )]
    Launch {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs an [`Invocation`] to completion.
pub trait Analyzer {
    fn run(&self, invocation: &Invocation) -> Result<AnalyzerRun, AnalyzerError>;
}

/// Spawns the analyzer as a child process.
///
/// Blocks until the child exits. There is no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessAnalyzer;

impl Analyzer for ProcessAnalyzer {
    fn run(&self, invocation: &Invocation) -> Result<AnalyzerRun, AnalyzerError> {
        let output = Command::new(&invocation.binary)
            .args(&invocation.arguments)
            .output()
            .map_err(|source| AnalyzerError::Launch {
                binary: invocation.binary.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        tracing::debug!(status = %output.status, "analyzer exited");

        Ok(AnalyzerRun {
            output: text,
            success: output.status.success(),
        })
    }
}
