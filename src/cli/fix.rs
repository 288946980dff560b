use klipper_lint::{collect_files, fix_text};
use std::process::ExitCode;

pub fn run_fix(paths: Vec<String>) -> ExitCode {
    let files = match collect_files(&paths) {
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

    for file in &files {
        let text = match std::fs::read_to_string(file) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("[ERROR] {}: {}", file.display(), e);
                continue;
            }
        };

        let fixed = fix_text(&text);
        if fixed != text {
            if let Err(e) = std::fs::write(file, &fixed) {
                eprintln!("[ERROR] {}: {}", file.display(), e);
                continue;
            }
            println!("Fixed: {}", file.display());
        } else {
            println!("No changes: {}", file.display());
        }
    }

    ExitCode::SUCCESS
}
