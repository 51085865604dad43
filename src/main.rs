use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Pre-commit hook that runs PHPMD with arguments taken from phpmd.xml.
#[derive(Debug, Parser)]
#[command(name = "phpmd-hook", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run PHPMD and exit 0 (clean), 1 (violations) or 2 (setup failure)
    Hook {
        /// Project root containing phpmd.xml and vendor/bin
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Print the PHPMD invocation as JSON without running it
    Args {
        /// Project root containing phpmd.xml and vendor/bin
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Hook { root } => exit_code(phpmd_hook::run_hook(&root)),
        Commands::Args { root } => match phpmd_hook::print_arguments(&root) {
            Ok(()) => ExitCode::SUCCESS,
            Err(report) => {
                eprintln!("{report:?}");
                exit_code(phpmd_hook::host::EXIT_WITH_EXCEPTIONS)
            }
        },
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))
}
