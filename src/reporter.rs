//! Finding output, grouped tier by tier.

use crate::linter::{Finding, Priority, Severity};
use colored::Colorize;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn report(&self, findings: &[Finding], path: &Path) {
        match self.format {
            OutputFormat::Text => print!("{}", format_text(findings, path)),
            OutputFormat::Json => println!("{}", format_json(findings, path)),
        }
    }
}

/// Text report: one block per non-empty tier, P0 first.
pub fn format_text(findings: &[Finding], path: &Path) -> String {
    let mut out = String::new();

    for priority in Priority::ALL {
        let tier: Vec<&Finding> = findings.iter().filter(|f| f.priority == priority).collect();
        if tier.is_empty() {
            continue;
        }

        out.push_str(&format!(
            "\n{} {} — {}\n",
            "✗".red().bold(),
            path.display(),
            priority.heading().bold()
        ));
        for finding in tier {
            out.push_str(&format!(
                "  {} line {}: {}\n",
                format!("[{}]", finding.code).yellow(),
                finding.line,
                finding.description
            ));
            if !finding.hint.is_empty() {
                out.push_str(&format!("    hint: {}\n", finding.hint.dimmed()));
            }
            out.push_str(&format!("    > {}\n", finding.excerpt));
        }
    }

    out
}

pub fn format_json(findings: &[Finding], path: &Path) -> String {
    #[derive(serde::Serialize)]
    struct JsonReport<'a> {
        file: String,
        findings: &'a [Finding],
        summary: Summary,
    }

    #[derive(serde::Serialize)]
    struct Summary {
        errors: usize,
        warnings: usize,
    }

    let report = JsonReport {
        file: path.display().to_string(),
        findings,
        summary: Summary {
            errors: findings
                .iter()
                .filter(|f| f.severity == Severity::Error)
                .count(),
            warnings: findings
                .iter()
                .filter(|f| f.severity == Severity::Warning)
                .count(),
        },
    };

    serde_json::to_string_pretty(&report).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;
    use crate::linter::Linter;

    fn findings_for(text: &str) -> Vec<Finding> {
        Linter::with_default_rules().lint(text, &LintConfig::default())
    }

    #[test]
    fn test_text_report_tier_order() {
        colored::control::set_override(false);
        let findings = findings_for("{% set x = y|round(2) %}\n{{ bad }}\nM118 hi\n");
        let out = format_text(&findings, Path::new("printer.cfg"));

        let p0 = out.find("P0 Syntax Guards").unwrap();
        let p1 = out.find("P1 Klipper-Compat").unwrap();
        let p3 = out.find("P3 Style").unwrap();
        assert!(p0 < p1 && p1 < p3);
    }

    #[test]
    fn test_text_report_contains_hint_and_excerpt() {
        colored::control::set_override(false);
        let findings = findings_for("{{ bad }}\n");
        let out = format_text(&findings, Path::new("printer.cfg"));
        assert!(out.contains("[double_mustache_forbidden] line 1:"));
        assert!(out.contains("hint: Replace '{{ var }}'"));
        assert!(out.contains("> {{ bad }}"));
    }

    #[test]
    fn test_empty_findings_produce_no_output() {
        let out = format_text(&[], Path::new("printer.cfg"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_json_report_summary() {
        let findings = findings_for("{{ bad }}\n{% set x = y|round(2) %}\n");
        let out = format_json(&findings, Path::new("printer.cfg"));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["file"], "printer.cfg");
        assert!(parsed["summary"]["errors"].as_u64().unwrap() >= 1);
        assert_eq!(parsed["summary"]["warnings"].as_u64().unwrap(), 1);
    }
}
