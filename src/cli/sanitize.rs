use klipper_lint::sanitize_file;
use std::path::Path;
use std::process::ExitCode;

pub fn run_sanitize(file: &Path) -> ExitCode {
    let (outcome, backup) = match sanitize_file(file) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    println!("Clean complete. Report:");
    println!(" - Backup written to {}", backup.display());
    if outcome.report.discarded_auto_blocks > 0 {
        println!(
            " - Discarded {} stale SAVE_CONFIG block(s); kept the last.",
            outcome.report.discarded_auto_blocks
        );
    }
    if !outcome.report.recovered_macros.is_empty() {
        println!(" - Moved macros out of SAVE_CONFIG auto area:");
        for header in &outcome.report.recovered_macros {
            println!("   * {}", header);
        }
    }
    if !outcome.report.duplicate_sections.is_empty() {
        println!(" - Duplicate sections commented (bodies disabled, review before deleting):");
        for name in &outcome.report.duplicate_sections {
            println!("   * Duplicate section [{}] commented out.", name);
        }
    }
    if outcome.report.is_clean() {
        println!(" - No issues found.");
    }

    ExitCode::SUCCESS
}
