//! P1 Klipper-compatibility rules.

use crate::config::LintConfig;
use crate::line_index::LineIndex;
use crate::linter::{Finding, LintRule, Priority, Severity};
use regex::Regex;
use std::sync::LazyLock;

static FILTER_IN_BRACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}\n]*\|[^{}\n]*\}").unwrap());

static NON_ASCII_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\x00-\x7F]").unwrap());

static M118_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*M118\b").unwrap());

/// Same pattern as `pipe_in_single_brace`, reported under the compatibility
/// tier: filters belong in `{% set ... %}` precomputation, not in injections.
pub struct FilterInMustacheExpr;

impl LintRule for FilterInMustacheExpr {
    fn code(&self) -> &'static str {
        "filter_in_mustache_expr"
    }

    fn priority(&self) -> Priority {
        Priority::Compat
    }

    fn description(&self) -> &'static str {
        "Filters must be precomputed with {% set ... %}; no filters in { ... }."
    }

    fn hint(&self) -> &'static str {
        "Precompute filtered values with '{% set ... %}' and only inject simple '{var}'."
    }

    fn check(&self, text: &str, index: &LineIndex, _config: &LintConfig) -> Vec<Finding> {
        FILTER_IN_BRACE_RE
            .find_iter(text)
            .map(|m| self.finding_at(text, index, m.start(), Severity::Error))
            .collect()
    }
}

/// Non-ASCII characters confuse Klipper's G-code handling and serial
/// consoles. The rule always scans; `strict_ascii` only decides whether a
/// match fails the run or is reported as a warning.
pub struct NonAscii;

impl LintRule for NonAscii {
    fn code(&self) -> &'static str {
        "non_ascii"
    }

    fn priority(&self) -> Priority {
        Priority::Compat
    }

    fn description(&self) -> &'static str {
        "Non-ASCII characters are not allowed."
    }

    fn hint(&self) -> &'static str {
        "Replace non-ASCII glyphs (e.g., >= instead of the unicode symbol)."
    }

    fn check(&self, text: &str, index: &LineIndex, config: &LintConfig) -> Vec<Finding> {
        let severity = if config.general.strict_ascii {
            Severity::Error
        } else {
            Severity::Warning
        };

        NON_ASCII_RE
            .find_iter(text)
            .map(|m| self.finding_at(text, index, m.start(), severity))
            .collect()
    }
}

/// M118 echoes through the host round-trip; RESPOND is the supported path.
/// Negated toggle: the rule is skipped entirely when `allow_m118` is set.
pub struct M118Usage;

impl LintRule for M118Usage {
    fn code(&self) -> &'static str {
        "m118_usage"
    }

    fn priority(&self) -> Priority {
        Priority::Compat
    }

    fn description(&self) -> &'static str {
        "M118 present; prefer RESPOND (enable with allow_m118)."
    }

    fn hint(&self) -> &'static str {
        "Use RESPOND MSG instead, unless allow_m118=true in .klipperlint.toml."
    }

    fn check(&self, text: &str, index: &LineIndex, config: &LintConfig) -> Vec<Finding> {
        if config.general.allow_m118 {
            return Vec::new();
        }

        M118_RE
            .find_iter(text)
            .map(|m| self.finding_at(text, index, m.start(), Severity::Error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rule: &dyn LintRule, text: &str, config: &LintConfig) -> Vec<Finding> {
        rule.check(text, &LineIndex::new(text), config)
    }

    #[test]
    fn test_filter_in_mustache_expr() {
        let findings = check(
            &FilterInMustacheExpr,
            "    M117 {x|round}\n",
            &LintConfig::default(),
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].priority, Priority::Compat);
    }

    #[test]
    fn test_non_ascii_warns_by_default() {
        let findings = check(&NonAscii, "gcode:\n    M117 температура\n", &LintConfig::default());
        assert!(!findings.is_empty());
        assert!(findings.iter().all(|f| f.severity == Severity::Warning));
    }

    #[test]
    fn test_non_ascii_errors_when_strict() {
        let mut config = LintConfig::default();
        config.general.strict_ascii = true;
        let findings = check(&NonAscii, "M117 ≥\n", &config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_m118_reported() {
        let findings = check(&M118Usage, "gcode:\n    M118 hello\n", &LintConfig::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
    }

    #[test]
    fn test_m118_suppressed_when_allowed() {
        let mut config = LintConfig::default();
        config.general.allow_m118 = true;
        assert!(check(&M118Usage, "    M118 hello\n", &config).is_empty());
    }

    #[test]
    fn test_m118_must_lead_the_line() {
        // M1180 or mid-line M118 references are not commands.
        assert!(check(&M118Usage, "    M1180\n", &LintConfig::default()).is_empty());
        assert!(check(&M118Usage, "; see M118 docs\n", &LintConfig::default()).is_empty());
    }
}
