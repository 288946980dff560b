//! Shallow preflight checks over a directory of config files.
//!
//! A fixed set of per-line mistakes that bite people at print time, caught
//! without building any document model. The structural linter is the real
//! gate; this is the quick pass for a whole config tree.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RESPOND_MSG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"MSG\s*=\s*"([^"]*)""#).unwrap());

static SAVE_VARIABLE_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"VALUE\s*=\s*(.+)$").unwrap());

/// One preflight problem. `line` is 1-based; 0 means a file-level issue.
#[derive(Debug)]
pub struct PreflightIssue {
    pub path: PathBuf,
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for PreflightIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line > 0 {
            write!(f, "{}:{}: {}", self.path.display(), self.line, self.message)
        } else {
            write!(f, "{}: {}", self.path.display(), self.message)
        }
    }
}

/// Scan every `*.cfg` under `root` and collect issues.
pub fn scan_dir(root: &Path) -> Vec<PreflightIssue> {
    let pattern = root.join("**").join("*.cfg");
    let mut issues = Vec::new();

    let paths = match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("[ERROR] {}: {}", pattern.display(), e);
            return issues;
        }
    };
    let mut files: Vec<PathBuf> = paths.flatten().filter(|p| p.is_file()).collect();
    files.sort();

    for path in files {
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                // A broken file is recorded but does not abort the batch.
                eprintln!("[ERROR] {}: {}", path.display(), e);
                continue;
            }
        };
        issues.extend(scan_text(&path, &text));
    }

    issues
}

/// Per-line checks over one file's text.
pub fn scan_text(path: &Path, text: &str) -> Vec<PreflightIssue> {
    let mut issues = Vec::new();
    let issue = |line: usize, message: &str| PreflightIssue {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    };

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;

        if line.contains("RESPOND") {
            if !line.contains("MSG=") {
                issues.push(issue(line_no, "RESPOND without MSG="));
            }
            if let Some(caps) = RESPOND_MSG_RE.captures(line) {
                let msg = &caps[1];
                if msg.contains(';') {
                    issues.push(issue(
                        line_no,
                        "Semicolon inside RESPOND MSG (breaks parsing)",
                    ));
                }
                if msg.contains('[') || msg.contains(']') {
                    issues.push(issue(line_no, "Square brackets inside RESPOND MSG (avoid)"));
                }
            }
        }

        if line.contains("SAVE_VARIABLE") {
            if let Some(caps) = SAVE_VARIABLE_VALUE_RE.captures(line) {
                let value = caps[1].trim();
                if value.starts_with('"') || value.starts_with('\'') {
                    issues.push(issue(line_no, "SAVE_VARIABLE uses string (not allowed)"));
                }
            }
        }
    }

    // Crude if/endif balance for the whole file.
    let ifs = text.lines().filter(|l| l.contains("{% if")).count();
    let endifs = text.lines().filter(|l| l.contains("{% endif %}")).count();
    if ifs != endifs {
        issues.push(issue(
            0,
            &format!("Jinja if/endif imbalance: if={} endif={}", ifs, endifs),
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scan(text: &str) -> Vec<PreflightIssue> {
        scan_text(Path::new("test.cfg"), text)
    }

    #[test]
    fn test_clean_file() {
        let text = "[gcode_macro PARK]\ngcode:\n    RESPOND MSG=\"parked\"\n";
        assert!(scan(text).is_empty());
    }

    #[test]
    fn test_respond_without_msg() {
        let issues = scan("    RESPOND TYPE=echo\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("without MSG="));
        assert_eq!(issues[0].line, 1);
    }

    #[test]
    fn test_respond_semicolon_and_brackets() {
        let issues = scan("    RESPOND MSG=\"done; [ok]\"\n");
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_if_endif_imbalance() {
        let text = "gcode:\n    {% if x %}\n    G28\n";
        let issues = scan(text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 0);
        assert!(issues[0].message.contains("if=1 endif=0"));
    }

    #[test]
    fn test_save_variable_string_value() {
        let issues = scan("    SAVE_VARIABLE VARIABLE=last VALUE=\"abc\"\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("SAVE_VARIABLE"));
    }

    #[test]
    fn test_save_variable_numeric_value() {
        assert!(scan("    SAVE_VARIABLE VARIABLE=last VALUE=42\n").is_empty());
    }

    #[test]
    fn test_scan_dir_walks_cfg_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("macros")).unwrap();
        fs::write(dir.path().join("printer.cfg"), "RESPOND TYPE=echo\n").unwrap();
        fs::write(
            dir.path().join("macros").join("park.cfg"),
            "RESPOND MSG=\"a;b\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "RESPOND TYPE=echo\n").unwrap();

        let issues = scan_dir(dir.path());
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_scan_dir_skips_unreadable_file_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.cfg"), [0xff, 0xfe, 0xfd]).unwrap();
        fs::write(dir.path().join("good.cfg"), "RESPOND TYPE=echo\n").unwrap();

        let issues = scan_dir(dir.path());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].path.ends_with("good.cfg"));
    }
}
