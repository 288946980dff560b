use clap::Parser;
use std::process::ExitCode;

mod cli;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lint {
            paths,
            config,
            format,
            verbose,
        } => cli::lint::run_lint(paths, config, format, verbose),
        Commands::Sanitize { file } => cli::sanitize::run_sanitize(&file),
        Commands::Fix { paths } => cli::fix::run_fix(paths),
        Commands::Scan { dir } => cli::scan::run_scan(&dir),
    }
}
