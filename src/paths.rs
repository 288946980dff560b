//! Glob expansion for CLI path arguments and config globs.
//!
//! Config files written for older tooling use `macros/**.cfg` to mean
//! "every .cfg anywhere under macros/". The glob crate only accepts `**`
//! as a whole path component, so such patterns are rewritten to the
//! equivalent `macros/**/*.cfg` before expansion.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid glob pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    pub source: glob::PatternError,
}

/// Rewrite `**` fused to other characters into a standalone component.
fn normalize_pattern(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|comp| {
            if comp != "**" && comp.contains("**") {
                format!("**/{}", comp.replace("**", "*"))
            } else {
                comp.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Expand globs into a sorted, deduplicated list of existing files.
pub fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>, PatternError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let paths = glob::glob(&normalize_pattern(pattern)).map_err(|e| PatternError {
            pattern: pattern.clone(),
            source: e,
        })?;
        files.extend(paths.flatten().filter(|p| p.is_file()));
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;
    use std::fs;

    #[test]
    fn test_normalize_fused_recursive_wildcard() {
        assert_eq!(normalize_pattern("macros/**.cfg"), "macros/**/*.cfg");
        assert_eq!(normalize_pattern("**.cfg"), "**/*.cfg");
    }

    #[test]
    fn test_normalize_leaves_valid_patterns_alone() {
        assert_eq!(normalize_pattern("printer.cfg"), "printer.cfg");
        assert_eq!(normalize_pattern("macros/**/*.cfg"), "macros/**/*.cfg");
        assert_eq!(normalize_pattern("configs/*.cfg"), "configs/*.cfg");
    }

    #[test]
    fn test_default_globs_cover_macros_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("printer.cfg"), "[printer]\n").unwrap();
        fs::create_dir_all(dir.path().join("macros").join("tools")).unwrap();
        fs::write(dir.path().join("macros").join("park.cfg"), "x\n").unwrap();
        fs::write(
            dir.path().join("macros").join("tools").join("probe.cfg"),
            "x\n",
        )
        .unwrap();

        let patterns: Vec<String> = LintConfig::default()
            .paths
            .globs
            .iter()
            .map(|g| format!("{}/{}", dir.path().display(), g))
            .collect();

        let files = collect_files(&patterns).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().any(|p| p.ends_with("printer.cfg")));
        assert!(files.iter().any(|p| p.ends_with("macros/park.cfg")));
        assert!(files.iter().any(|p| p.ends_with("tools/probe.cfg")));
    }

    #[test]
    fn test_duplicate_matches_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("printer.cfg"), "x\n").unwrap();

        let pattern = format!("{}/printer.cfg", dir.path().display());
        let files = collect_files(&[pattern.clone(), pattern]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        let err = collect_files(&["configs/[".to_string()]).unwrap_err();
        assert!(err.to_string().contains("configs/["));
    }
}
