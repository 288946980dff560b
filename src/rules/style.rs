//! P3 style rules. Never fatal unless `fail_on_warn` is set.

use crate::config::LintConfig;
use crate::line_index::LineIndex;
use crate::linter::{Finding, LintRule, Priority, Severity};
use regex::Regex;
use std::sync::LazyLock;

static FILTER_SPACING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*(round|int|float)\s*\(").unwrap());

/// Flags filter calls jammed against the pipe, e.g. `x|round(2)`.
pub struct FilterSpacing;

impl LintRule for FilterSpacing {
    fn code(&self) -> &'static str {
        "filter_spacing"
    }

    fn priority(&self) -> Priority {
        Priority::Style
    }

    fn description(&self) -> &'static str {
        "Add spaces around filter pipes for readability (style)."
    }

    fn hint(&self) -> &'static str {
        "Prefer spaces around '|' in Jinja tags (style only)."
    }

    fn check(&self, text: &str, index: &LineIndex, _config: &LintConfig) -> Vec<Finding> {
        FILTER_SPACING_RE
            .find_iter(text)
            .map(|m| self.finding_at(text, index, m.start(), Severity::Warning))
            .collect()
    }
}
