use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portreg")]
#[command(about = "Port Registry - validate a service port registry and generate its artifacts")]
pub struct Cli {
    /// Registry document path
    #[arg(short, long, default_value = "ports.yaml")]
    pub registry: PathBuf,

    /// Output directory for generated artifacts
    #[arg(short, long, default_value = "generated")]
    pub out_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the registry, then regenerate every artifact
    Sync,
    /// Validate the registry without writing anything
    Validate {
        /// Which error categories gate the exit code. Non-matching errors
        /// are still printed as informational.
        #[arg(long, value_enum, default_value_t = ValidateMode::Full)]
        mode: ValidateMode,
    },
    /// Print a read-only registry summary
    Report,
    /// Scan source roots for hardcoded references to governed ports
    Scan {
        /// Roots to walk (defaults to src, services, apps, packages)
        roots: Vec<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: clap_complete::Shell,
    },
}

/// Error-category filter for `portreg validate`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidateMode {
    /// Every error gates the exit code
    Full,
    /// Only duplicate-port errors gate
    Duplicates,
    /// Only range errors (malformed, out-of-range, out-of-bounds) gate
    Ranges,
}
