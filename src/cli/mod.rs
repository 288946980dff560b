pub mod fix;
pub mod lint;
pub mod sanitize;
pub mod scan;

use clap::{Parser, Subcommand};
use klipper_lint::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "klipper-lint")]
#[command(author, version, about = "Lint and sanitize Klipper configuration files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the governance linter over files or globs
    Lint {
        /// Files or globs to scan (default: the config file's paths.globs)
        #[arg(long, value_name = "GLOB", num_args = 1..)]
        paths: Vec<String>,

        /// Path to the config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "text")]
        format: Format,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Reconcile a file's SAVE_CONFIG zone, recovering misplaced macros
    Sanitize {
        /// The config file to sanitize in place (a backup is written first)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Apply safe mechanical rewrites in place
    Fix {
        /// Files or globs to modify
        #[arg(long, value_name = "GLOB", num_args = 1.., default_value = "printer.cfg")]
        paths: Vec<String>,
    },
    /// Shallow preflight scan over every *.cfg under a directory
    Scan {
        /// Directory to scan
        #[arg(value_name = "DIR", default_value = "configs")]
        dir: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}
