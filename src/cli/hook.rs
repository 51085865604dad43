use std::path::Path;

use crate::host::ConsoleHost;

/// Execute the hook subcommand and return the process exit code.
///
/// Analyzer output and the success message go to stdout, failure messages
/// to stderr.
pub fn run(root: &Path) -> i32 {
    super::adapter().run(root, &mut ConsoleHost)
}
