//! Governance tooling for Klipper printer configuration files.
//!
//! Klipper configs are line-oriented `.ini`-style files with an embedded
//! restricted template language and a trailing SAVE_CONFIG zone that the
//! firmware rewrites on every save. This crate provides a structural model
//! of that format ([`document`]), a priority-tiered lint engine
//! ([`linter`] + [`rules`]), a sanitizer that reconciles structural damage
//! ([`sanitizer`]), and two shallow companion passes ([`fixer`],
//! [`scanner`]).

pub mod config;
pub mod document;
pub mod fixer;
pub mod line_index;
pub mod linter;
pub mod paths;
pub mod reporter;
pub mod rules;
pub mod sanitizer;
pub mod scanner;

pub use config::{ConfigError, DEFAULT_CONFIG_FILE, LintConfig};
pub use document::{AUTO_ZONE_HEADER, Document, SAVE_CONFIG_MARKER, Section, SectionKind};
pub use fixer::fix_text;
pub use line_index::LineIndex;
pub use linter::{Finding, LintRule, Linter, Priority, Severity};
pub use paths::{PatternError, collect_files};
pub use reporter::{OutputFormat, Reporter};
pub use sanitizer::{SanitizeError, SanitizeOutcome, SanitizeReport, sanitize_file, sanitize_text};
pub use scanner::{PreflightIssue, scan_dir, scan_text};
