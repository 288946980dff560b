//! P0 syntax guards for the template sublanguage.
//!
//! Klipper's restricted Jinja accepts single-brace `{var}` injections and
//! `{% ... %}` control tags; these rules catch constructs that the firmware
//! rejects outright. They run on raw text so malformed input that the
//! document model cannot segment is still caught.

use crate::config::LintConfig;
use crate::line_index::LineIndex;
use crate::linter::{Finding, LintRule, Priority, Severity};
use regex::Regex;
use std::sync::LazyLock;

static DOUBLE_MUSTACHE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{").unwrap());

static PIPE_IN_BRACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}\n]*\|[^{}\n]*\}").unwrap());

static INLINE_BLOCKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%[^%]*%\}[ \t]*\{%[^%]*%\}").unwrap());

static FLOW_CONTROL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*(return|break|continue)\b").unwrap());

/// Klipper injections use `{var}`; `{{ var }}` is a different templating
/// dialect and never valid.
pub struct DoubleMustacheForbidden;

impl LintRule for DoubleMustacheForbidden {
    fn code(&self) -> &'static str {
        "double_mustache_forbidden"
    }

    fn priority(&self) -> Priority {
        Priority::Syntax
    }

    fn description(&self) -> &'static str {
        "Klipper uses single-brace {var}, never {{ var }}."
    }

    fn hint(&self) -> &'static str {
        "Replace '{{ var }}' with '{var}' and precompute expressions via '{% set var = ... %}'."
    }

    fn check(&self, text: &str, index: &LineIndex, _config: &LintConfig) -> Vec<Finding> {
        DOUBLE_MUSTACHE_RE
            .find_iter(text)
            .map(|m| self.finding_at(text, index, m.start(), Severity::Error))
            .collect()
    }
}

/// Filters cannot run inside a single-brace injection.
pub struct PipeInSingleBrace;

impl LintRule for PipeInSingleBrace {
    fn code(&self) -> &'static str {
        "pipe_in_single_brace"
    }

    fn priority(&self) -> Priority {
        Priority::Syntax
    }

    fn description(&self) -> &'static str {
        "Pipes '|' are forbidden inside single-brace injections { ... }."
    }

    fn hint(&self) -> &'static str {
        "Move filters out of '{ ... }': '{% set x_r2 = round(x,2) %}' then use '{x_r2}'."
    }

    fn check(&self, text: &str, index: &LineIndex, _config: &LintConfig) -> Vec<Finding> {
        PIPE_IN_BRACE_RE
            .find_iter(text)
            .map(|m| self.finding_at(text, index, m.start(), Severity::Error))
            .collect()
    }
}

/// Two adjacent control tags on one line hide structure and break Klipper's
/// line-based macro parsing.
pub struct InlineControlBlocks;

impl LintRule for InlineControlBlocks {
    fn code(&self) -> &'static str {
        "inline_control_blocks"
    }

    fn priority(&self) -> Priority {
        Priority::Syntax
    }

    fn description(&self) -> &'static str {
        "Inline control blocks must be split across lines."
    }

    fn hint(&self) -> &'static str {
        "Expand to multi-line:\n  {% if cond %}\n    {% set x = ... %}\n  {% endif %}"
    }

    fn check(&self, text: &str, index: &LineIndex, _config: &LintConfig) -> Vec<Finding> {
        INLINE_BLOCKS_RE
            .find_iter(text)
            .filter(|m| !text[m.range()].contains('\n'))
            .map(|m| self.finding_at(text, index, m.start(), Severity::Error))
            .collect()
    }
}

/// `{% return %}`, `{% break %}` and `{% continue %}` are unsupported.
pub struct FlowControlKeywords;

impl LintRule for FlowControlKeywords {
    fn code(&self) -> &'static str {
        "flow_control_keywords"
    }

    fn priority(&self) -> Priority {
        Priority::Syntax
    }

    fn description(&self) -> &'static str {
        "Jinja flow-control not supported (return/break/continue)."
    }

    fn hint(&self) -> &'static str {
        "Klipper does not support '{% return %}', 'break', 'continue'. Use flags and RESPOND + conditional blocks."
    }

    fn check(&self, text: &str, index: &LineIndex, _config: &LintConfig) -> Vec<Finding> {
        FLOW_CONTROL_RE
            .find_iter(text)
            .map(|m| self.finding_at(text, index, m.start(), Severity::Error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rule: &dyn LintRule, text: &str) -> Vec<Finding> {
        rule.check(text, &LineIndex::new(text), &LintConfig::default())
    }

    #[test]
    fn test_double_mustache() {
        let findings = check(&DoubleMustacheForbidden, "gcode:\n    M117 {{ msg }}\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_single_brace_is_fine() {
        assert!(check(&DoubleMustacheForbidden, "gcode:\n    M117 {msg}\n").is_empty());
    }

    #[test]
    fn test_pipe_in_single_brace() {
        let findings = check(&PipeInSingleBrace, "    M117 {x|round}\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 1);
    }

    #[test]
    fn test_pipe_outside_braces_is_fine() {
        assert!(check(&PipeInSingleBrace, "    M117 a | b\n").is_empty());
    }

    #[test]
    fn test_inline_control_blocks() {
        let findings = check(
            &InlineControlBlocks,
            "{% if x > 0 %} {% set y = 1 %} {% endif %}\n",
        );
        assert!(!findings.is_empty());
        assert_eq!(findings[0].line, 1);
    }

    #[test]
    fn test_control_blocks_on_separate_lines_are_fine() {
        let text = "{% if x > 0 %}\n  {% set y = 1 %}\n{% endif %}\n";
        assert!(check(&InlineControlBlocks, text).is_empty());
    }

    #[test]
    fn test_flow_control_keywords() {
        for keyword in ["return", "break", "continue"] {
            let text = format!("{{% {} %}}\n", keyword);
            let findings = check(&FlowControlKeywords, &text);
            assert_eq!(findings.len(), 1, "expected a finding for {}", keyword);
        }
    }

    #[test]
    fn test_endfor_is_not_flow_control() {
        assert!(check(&FlowControlKeywords, "{% endfor %}\n").is_empty());
    }
}
