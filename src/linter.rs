//! The priority-tiered rule engine.
//!
//! Rules run against raw text in a fixed declaration order; findings are
//! grouped tier by tier for reporting. The catalog is immutable once the
//! `Linter` is built, and tests can inject a reduced catalog via `new()` +
//! `add_rule()`.

use crate::config::LintConfig;
use crate::line_index::LineIndex;
use serde::Serialize;

/// Severity tier of a governance rule, 0 (most severe) to 3 (style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Priority {
    /// P0: template syntax guards.
    Syntax,
    /// P1: Klipper compatibility constraints.
    Compat,
    /// P2: governance hygiene around SAVE_CONFIG and RESPOND.
    Hygiene,
    /// P3: style preferences.
    Style,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Syntax,
        Priority::Compat,
        Priority::Hygiene,
        Priority::Style,
    ];

    /// Section heading used in reports.
    pub fn heading(&self) -> &'static str {
        match self {
            Priority::Syntax => "P0 Syntax Guards",
            Priority::Compat => "P1 Klipper-Compat",
            Priority::Hygiene => "P2 Governance Hygiene",
            Priority::Style => "P3 Style",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// One reported rule violation at a specific location.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub code: String,
    pub priority: Priority,
    pub severity: Severity,
    pub description: String,
    pub hint: String,
    /// 1-based line number, or 0 for file-level findings.
    pub line: usize,
    /// Trimmed, length-capped text of the offending line.
    pub excerpt: String,
}

/// A static governance check evaluated against the full raw text.
///
/// Toggle behavior lives inside `check` as a visible branch: a negated
/// toggle returns no findings when its flag is set, while a severity toggle
/// keeps scanning and only changes the severity it assigns.
pub trait LintRule: Send + Sync {
    /// Stable identifier reported with every finding.
    fn code(&self) -> &'static str;
    fn priority(&self) -> Priority;
    fn description(&self) -> &'static str;
    /// Fixed remediation hint shown alongside each finding.
    fn hint(&self) -> &'static str;
    fn check(&self, text: &str, index: &LineIndex, config: &LintConfig) -> Vec<Finding>;

    /// Build a finding for a match at `offset`, with the line number computed
    /// through the shared line index.
    fn finding_at(
        &self,
        text: &str,
        index: &LineIndex,
        offset: usize,
        severity: Severity,
    ) -> Finding {
        Finding {
            code: self.code().to_string(),
            priority: self.priority(),
            severity,
            description: self.description().to_string(),
            hint: self.hint().to_string(),
            line: index.line_of(offset),
            excerpt: index.excerpt(text, offset).to_string(),
        }
    }
}

pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
}

impl Linter {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The full catalog in declaration order: P0 first, P3 last.
    pub fn with_default_rules() -> Self {
        use crate::rules::{
            DoubleMustacheForbidden, FilterInMustacheExpr, FilterSpacing, FlowControlKeywords,
            InlineControlBlocks, M118Usage, NonAscii, PipeInSingleBrace, RespondSemicolon,
            RespondSquareBrackets, SaveConfigBelowMarker,
        };

        let mut linter = Self::new();
        linter.add_rule(Box::new(DoubleMustacheForbidden));
        linter.add_rule(Box::new(PipeInSingleBrace));
        linter.add_rule(Box::new(InlineControlBlocks));
        linter.add_rule(Box::new(FlowControlKeywords));
        linter.add_rule(Box::new(FilterInMustacheExpr));
        linter.add_rule(Box::new(NonAscii));
        linter.add_rule(Box::new(M118Usage));
        linter.add_rule(Box::new(SaveConfigBelowMarker));
        linter.add_rule(Box::new(RespondSemicolon));
        linter.add_rule(Box::new(RespondSquareBrackets));
        linter.add_rule(Box::new(FilterSpacing));
        linter
    }

    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Run every rule against the text and return the findings ordered tier
    /// by tier; within a tier rules stay in declaration order, and within a
    /// rule matches stay in document order.
    pub fn lint(&self, text: &str, config: &LintConfig) -> Vec<Finding> {
        let index = LineIndex::new(text);

        let mut findings: Vec<Finding> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(text, &index, config))
            .collect();

        // Stable sort: preserves declaration and document order within a tier.
        findings.sort_by_key(|f| f.priority);
        findings
    }

    /// Whether the findings fail the run under the given config.
    pub fn is_failure(findings: &[Finding], config: &LintConfig) -> bool {
        findings.iter().any(|f| {
            f.severity == Severity::Error
                || (config.general.fail_on_warn && f.severity == Severity::Warning)
        })
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
