//! Configuration for klipper-lint loaded from .klipperlint.toml
//!
//! Loaded once at the start of a run and read-only afterwards. A missing
//! file means defaults; unknown keys are ignored; present keys override
//! only the matching defaults.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".klipperlint.toml";

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Promote the non-ASCII check from warning to error.
    #[serde(default)]
    pub strict_ascii: bool,
    /// Skip the M118-usage rule entirely.
    #[serde(default)]
    pub allow_m118: bool,
    /// Fail the run on style (P3) findings too.
    #[serde(default)]
    pub fail_on_warn: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// File globs scanned when the CLI gives no explicit paths.
    #[serde(default = "default_globs")]
    pub globs: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            globs: default_globs(),
        }
    }
}

fn default_globs() -> Vec<String> {
    vec!["printer.cfg".to_string(), "macros/**.cfg".to_string()]
}

impl LintConfig {
    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: std::path::PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LintConfig::default();
        assert!(!config.general.strict_ascii);
        assert!(!config.general.allow_m118);
        assert!(!config.general.fail_on_warn);
        assert_eq!(config.paths.globs, vec!["printer.cfg", "macros/**.cfg"]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = LintConfig::load(Path::new("/nonexistent/.klipperlint.toml")).unwrap();
        assert!(!config.general.strict_ascii);
        assert_eq!(config.paths.globs.len(), 2);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
strict_ascii = true
allow_m118 = true

[paths]
globs = ["configs/**.cfg"]
"#;
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml_content).unwrap();

        let config = LintConfig::load(file.path()).unwrap();
        assert!(config.general.strict_ascii);
        assert!(config.general.allow_m118);
        assert!(!config.general.fail_on_warn);
        assert_eq!(config.paths.globs, vec!["configs/**.cfg"]);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let toml_content = r#"
[general]
fail_on_warn = true
"#;
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml_content).unwrap();

        let config = LintConfig::load(file.path()).unwrap();
        assert!(config.general.fail_on_warn);
        assert!(!config.general.strict_ascii);
        assert_eq!(config.paths.globs, vec!["printer.cfg", "macros/**.cfg"]);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let toml_content = r#"
[general]
strict_ascii = true
future_flag = "whatever"

[unknown_table]
x = 1
"#;
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml_content).unwrap();

        let config = LintConfig::load(file.path()).unwrap();
        assert!(config.general.strict_ascii);
    }
}
