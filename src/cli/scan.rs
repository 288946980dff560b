use colored::Colorize;
use klipper_lint::scan_dir;
use std::path::Path;
use std::process::ExitCode;

pub fn run_scan(dir: &Path) -> ExitCode {
    let issues = scan_dir(dir);

    if issues.is_empty() {
        println!("{}", "Preflight: OK".green());
        return ExitCode::SUCCESS;
    }

    println!("{}", "Preflight: issues found".red());
    for issue in &issues {
        println!(" - {}", issue);
    }
    ExitCode::from(1)
}
