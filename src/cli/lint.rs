use super::Format;
use klipper_lint::{DEFAULT_CONFIG_FILE, LintConfig, Linter, Reporter, collect_files};
use std::path::PathBuf;
use std::process::ExitCode;

pub fn run_lint(
    paths: Vec<String>,
    config_path: Option<PathBuf>,
    format: Format,
    verbose: bool,
) -> ExitCode {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = match LintConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    if verbose {
        eprintln!("Using config: {}", config_path.display());
    }

    // CLI paths win; otherwise fall back to the config's globs.
    let patterns = if paths.is_empty() {
        config.paths.globs.clone()
    } else {
        paths
    };

    let files = match collect_files(&patterns) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    if files.is_empty() {
        eprintln!("No files found.");
        return ExitCode::from(2);
    }
    if verbose {
        eprintln!("Linting {} file(s)", files.len());
        for file in &files {
            eprintln!("  - {}", file.display());
        }
    }

    let linter = Linter::with_default_rules();
    let reporter = Reporter::new(format.into());
    let mut had_error = false;

    for file in &files {
        let text = match std::fs::read_to_string(file) {
            Ok(t) => t,
            Err(e) => {
                // A broken file is recorded but does not abort the batch.
                eprintln!("[ERROR] {}: {}", file.display(), e);
                had_error = true;
                continue;
            }
        };

        let findings = linter.lint(&text, &config);
        reporter.report(&findings, file);
        if Linter::is_failure(&findings, &config) {
            had_error = true;
        }
    }

    if had_error {
        eprintln!("\nLint failed. Fix violations above.");
        ExitCode::from(1)
    } else {
        println!("OK");
        ExitCode::SUCCESS
    }
}
