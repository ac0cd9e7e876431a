//! Rule-based clause risk scoring.
//!
//! Every rule is evaluated independently against the whole normalized text
//! and contributes at most one [`ClauseIssue`]. The global score starts at
//! [`BASE_SCORE`], adds each matched rule's weight increment, and is clamped
//! to `0..=100` before being bucketed into a [`RiskLevel`].

use tracing::debug;

use crate::normalize::normalize_text;
use crate::rules::{ClauseRule, RuleSet};
use crate::types::{Analysis, ClauseIssue, NegotiationPoint, RiskLevel};

pub const BASE_SCORE: i32 = 30;

/// Summary emitted when no rule matched.
pub const NO_RISK_SUMMARY: &str =
    "No major risk detected by basic rules. Check financial and IP clauses.";

/// How many clause names the summary names before eliding the rest.
const SUMMARY_FOCUS: usize = 2;

/// Analyze raw contract text against the built-in rule table.
pub fn analyze(raw: &str) -> Analysis {
    analyze_with(RuleSet::builtin(), raw)
}

/// Analyze raw contract text against an arbitrary rule table.
///
/// Total over every input: the empty string yields no issues and the base score.
pub fn analyze_with(rules: &RuleSet, raw: &str) -> Analysis {
    let text = normalize_text(raw);

    let matched: Vec<&ClauseRule> = rules.rules().iter().filter(|r| r.matches(&text)).collect();

    let clause_issues: Vec<ClauseIssue> = matched
        .iter()
        .map(|rule| ClauseIssue {
            clause_name: rule.name.clone(),
            risk_weight: rule.weight,
            issue_description: rule.issue.clone(),
            suggested_alternative: rule.suggestion.clone(),
        })
        .collect();

    let negotiation_points: Vec<NegotiationPoint> = matched
        .iter()
        .map(|rule| NegotiationPoint {
            point: rule.name.clone(),
            priority: rule.weight,
            alternative: rule.alternative.clone(),
        })
        .collect();

    let global_score = score(clause_issues.iter().map(|c| c.risk_weight));
    let risk_level = RiskLevel::from_score(global_score);
    let summary = summarize(&clause_issues);

    debug!(
        chars = text.len(),
        matched = clause_issues.len(),
        score = global_score,
        level = %risk_level,
        "clause analysis complete"
    );

    Analysis {
        global_score,
        risk_level,
        clause_issues,
        negotiation_points,
        summary,
        source_text: text,
    }
}

/// Base score plus one increment per matched weight, clamped to `0..=100`.
pub fn score(weights: impl IntoIterator<Item = RiskLevel>) -> u8 {
    let raw = weights
        .into_iter()
        .fold(BASE_SCORE, |acc, w| acc.saturating_add(w.score_increment()));
    raw.clamp(0, 100) as u8
}

/// Fixed message for zero issues, otherwise a count and the first two names.
pub fn summarize(issues: &[ClauseIssue]) -> String {
    if issues.is_empty() {
        return NO_RISK_SUMMARY.to_string();
    }
    let focus: Vec<&str> = issues
        .iter()
        .take(SUMMARY_FOCUS)
        .map(|c| c.clause_name.as_str())
        .collect();
    let ellipsis = if issues.len() > SUMMARY_FOCUS { " …" } else { "" };
    format!(
        "{} sensitive clause(s) detected. Focus: {}{}",
        issues.len(),
        focus.join(", "),
        ellipsis
    )
}
