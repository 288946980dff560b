//! P2 governance hygiene rules around SAVE_CONFIG and RESPOND.

use crate::config::LintConfig;
use crate::document;
use crate::line_index::LineIndex;
use crate::linter::{Finding, LintRule, Priority, Severity};
use regex::Regex;
use std::sync::LazyLock;

static RESPOND_SEMICOLON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"RESPOND\s+MSG\s*=\s*"[^"\n]*;[^"\n]*""#).unwrap());

static RESPOND_BRACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"RESPOND\s+MSG\s*=\s*"[^"\n]*\[[^"\n]*\][^"\n]*""#).unwrap());

/// Human content below the SAVE_CONFIG marker gets destroyed on the next
/// firmware save. Auto-generated lines all carry the `#*#` prefix, so a line
/// without it inside the zone is someone's edit.
pub struct SaveConfigBelowMarker;

impl LintRule for SaveConfigBelowMarker {
    fn code(&self) -> &'static str {
        "save_config_below_marker"
    }

    fn priority(&self) -> Priority {
        Priority::Hygiene
    }

    fn description(&self) -> &'static str {
        "Content detected below SAVE_CONFIG marker."
    }

    fn hint(&self) -> &'static str {
        "Ensure nothing but Klipper auto-content is below the SAVE_CONFIG marker."
    }

    fn check(&self, text: &str, index: &LineIndex, _config: &LintConfig) -> Vec<Finding> {
        let markers = document::find_markers(text);
        let mut findings = Vec::new();

        // One finding per marker: the first line in its region that is
        // neither blank nor `#*#`-prefixed.
        for (i, &marker) in markers.iter().enumerate() {
            let region_end = markers.get(i + 1).copied().unwrap_or(text.len());
            let mut pos = match text[marker..region_end].find('\n') {
                Some(p) => marker + p + 1,
                None => continue,
            };

            while pos < region_end {
                let line_end = text[pos..region_end]
                    .find('\n')
                    .map(|p| pos + p)
                    .unwrap_or(region_end);
                let line = text[pos..line_end].trim();
                if !line.is_empty() && !line.starts_with("#*#") {
                    findings.push(self.finding_at(text, index, pos, Severity::Error));
                    break;
                }
                pos = line_end + 1;
            }
        }

        findings
    }
}

/// A `;` inside a RESPOND message starts a G-code comment and truncates it.
pub struct RespondSemicolon;

impl LintRule for RespondSemicolon {
    fn code(&self) -> &'static str {
        "respond_semicolon"
    }

    fn priority(&self) -> Priority {
        Priority::Hygiene
    }

    fn description(&self) -> &'static str {
        "Semicolons inside RESPOND messages are not allowed."
    }

    fn hint(&self) -> &'static str {
        "Remove ';' from RESPOND messages; it starts a comment and breaks parsing."
    }

    fn check(&self, text: &str, index: &LineIndex, _config: &LintConfig) -> Vec<Finding> {
        RESPOND_SEMICOLON_RE
            .find_iter(text)
            .map(|m| self.finding_at(text, index, m.start(), Severity::Error))
            .collect()
    }
}

/// Square brackets inside a RESPOND message collide with section syntax in
/// console output and logs.
pub struct RespondSquareBrackets;

impl LintRule for RespondSquareBrackets {
    fn code(&self) -> &'static str {
        "respond_square_brackets"
    }

    fn priority(&self) -> Priority {
        Priority::Hygiene
    }

    fn description(&self) -> &'static str {
        "Square brackets in RESPOND messages are not allowed."
    }

    fn hint(&self) -> &'static str {
        "Avoid '[]' inside RESPOND messages; use parentheses or hyphens."
    }

    fn check(&self, text: &str, index: &LineIndex, _config: &LintConfig) -> Vec<Finding> {
        RESPOND_BRACKETS_RE
            .find_iter(text)
            .map(|m| self.finding_at(text, index, m.start(), Severity::Error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AUTO_ZONE_HEADER, SAVE_CONFIG_MARKER};

    fn check(rule: &dyn LintRule, text: &str) -> Vec<Finding> {
        rule.check(text, &LineIndex::new(text), &LintConfig::default())
    }

    #[test]
    fn test_clean_auto_zone() {
        let text = format!(
            "[printer]\n\n{}\n{}\n#*# [probe]\n#*# z_offset = 1.0\n",
            SAVE_CONFIG_MARKER, AUTO_ZONE_HEADER
        );
        assert!(check(&SaveConfigBelowMarker, &text).is_empty());
    }

    #[test]
    fn test_content_below_marker() {
        let text = format!(
            "[printer]\n\n{}\n{}\n#*# [probe]\n[gcode_macro OOPS]\ngcode:\n    G28\n",
            SAVE_CONFIG_MARKER, AUTO_ZONE_HEADER
        );
        let findings = check(&SaveConfigBelowMarker, &text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 6);
        assert_eq!(findings[0].excerpt, "[gcode_macro OOPS]");
    }

    #[test]
    fn test_blank_lines_in_zone_are_fine() {
        let text = format!("{}\n{}\n\n#*# [probe]\n", SAVE_CONFIG_MARKER, AUTO_ZONE_HEADER);
        assert!(check(&SaveConfigBelowMarker, &text).is_empty());
    }

    #[test]
    fn test_respond_semicolon() {
        let findings = check(&RespondSemicolon, "    RESPOND MSG=\"done;ok\"\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 1);
        assert_eq!(findings[0].priority, Priority::Hygiene);
    }

    #[test]
    fn test_respond_without_semicolon_is_fine() {
        assert!(check(&RespondSemicolon, "    RESPOND MSG=\"done ok\"\n").is_empty());
    }

    #[test]
    fn test_respond_square_brackets() {
        let findings = check(&RespondSquareBrackets, "    RESPOND MSG=\"state [ready]\"\n");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_brackets_outside_message_are_fine() {
        assert!(check(&RespondSquareBrackets, "[fan]\nRESPOND MSG=\"ok\"\n").is_empty());
    }
}
