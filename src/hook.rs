use std::path::Path;

use crate::analyzer::{Analyzer, AnalyzerError, AnalyzerRun, Invocation};
use crate::config::{self, ConfigError};
use crate::host::{Host, EXIT_ERRORS_FOUND, EXIT_SUCCESS, EXIT_WITH_EXCEPTIONS};
use crate::path;
use crate::platform::HostPlatform;

pub(crate) const SUCCESS_MESSAGE: &str = "PHPMD detected no errors, allowing commit to proceed.";
pub(crate) const ERRORS_FOUND_MESSAGE: &str = "PHPMD detected errors, aborting commit!";

/// Anything that stops the hook before the analyzer produces a verdict.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum HookError {
    #[error("cannot resolve project root: {0}")]
    #[diagnostic(code(phpmd_hook::root))]
    Root(#[source] std::io::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Analyzer(#[from] AnalyzerError),
}

/// Runs PHPMD for a project root and reports the verdict to a [`Host`].
///
/// Generic over the platform (binary name selection) and the analyzer
/// (process spawning) so both can be replaced in tests.
#[derive(Debug, Default)]
pub struct HookAdapter<P, A> {
    platform: P,
    analyzer: A,
}

impl<P: HostPlatform, A: Analyzer> HookAdapter<P, A> {
    pub fn new(platform: P, analyzer: A) -> Self {
        Self { platform, analyzer }
    }

    /// Resolve paths and translate `phpmd.xml` without running anything.
    ///
    /// Fails with `ConfigError::NotFound` before parsing when the
    /// configuration file is absent.
    pub fn prepare(&self, root: &Path) -> Result<Invocation, HookError> {
        let root = std::path::absolute(root).map_err(HookError::Root)?;
        let config_path = path::config_path(&root);
        if !config::configuration_file_exists(&config_path) {
            return Err(ConfigError::NotFound(config_path).into());
        }

        let arguments = config::load_arguments(&config_path)?;
        let binary = path::binary_path(&root, &self.platform);
        Ok(Invocation { binary, arguments })
    }

    /// Run the hook and return the process exit code.
    ///
    /// The analyzer's output is written before the verdict. Setup failures
    /// never reach the analyzer.
    pub fn run(&self, root: &Path, host: &mut impl Host) -> i32 {
        match self.analyze(root) {
            Ok(run) => {
                host.write(&run.output);
                if run.success {
                    tracing::info!("analyzer reported no violations");
                    host.success(SUCCESS_MESSAGE);
                    EXIT_SUCCESS
                } else {
                    tracing::info!("analyzer reported violations");
                    host.error(ERRORS_FOUND_MESSAGE, EXIT_ERRORS_FOUND);
                    EXIT_ERRORS_FOUND
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "hook failed before analysis");
                host.error(
                    &format!("An error occurred trying to run PHPMD:\n{e}"),
                    EXIT_WITH_EXCEPTIONS,
                );
                EXIT_WITH_EXCEPTIONS
            }
        }
    }

    fn analyze(&self, root: &Path) -> Result<AnalyzerRun, HookError> {
        let invocation = self.prepare(root)?;
        tracing::debug!(command = %invocation.command_line(), "running analyzer");
        Ok(self.analyzer.run(&invocation)?)
    }
}
