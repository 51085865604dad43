pub mod analyzer;
pub mod config;
pub mod hook;
pub mod host;
pub mod path;
pub mod platform;

pub(crate) mod cli;

use std::path::Path;

/// Run the hook subcommand against the project at `root` and return the exit
/// code for the hook framework.
///
/// This is the binary entry point. Integrations that need their own host or
/// analyzer should build a [`hook::HookAdapter`] directly.
pub fn run_hook(root: &Path) -> i32 {
    cli::hook::run(root)
}

/// Print the analyzer invocation for `root` as JSON without running it.
pub fn print_arguments(root: &Path) -> miette::Result<()> {
    cli::args::run(root)
}
