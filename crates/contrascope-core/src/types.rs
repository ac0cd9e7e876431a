//! Shared review types: risk levels, clause issues, and analysis results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source identifier used when the text was pasted rather than read from a file.
pub const PASTED_TEXT: &str = "pasted text";

/// Coarse severity bucket, used both as a rule weight and as the overall level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Points a matched rule of this weight adds to the global score.
    pub fn score_increment(self) -> i32 {
        match self {
            Self::Low => 8,
            Self::Medium => 15,
            Self::High => 25,
        }
    }

    /// Bucket a clamped global score: `>= 70` high, `>= 45` medium, else low.
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            Self::High
        } else if score >= 45 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected clause matching one rule of the rule set.
///
/// Serialized with the field names of the export format
/// (`clause`, `risk`, `issue`, `suggestion`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseIssue {
    #[serde(rename = "clause")]
    pub clause_name: String,
    #[serde(rename = "risk")]
    pub risk_weight: RiskLevel,
    #[serde(rename = "issue")]
    pub issue_description: String,
    #[serde(rename = "suggestion")]
    pub suggested_alternative: String,
}

/// A replacement clause offered for one [`ClauseIssue`], index-aligned with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationPoint {
    pub point: String,
    pub priority: RiskLevel,
    pub alternative: String,
}

/// Output of one analyzer run, before the caller stamps identity and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub global_score: u8,
    pub risk_level: RiskLevel,
    pub clause_issues: Vec<ClauseIssue>,
    pub negotiation_points: Vec<NegotiationPoint>,
    pub summary: String,
    /// Whitespace-normalized text every match and search runs against.
    pub source_text: String,
}

impl Analysis {
    /// Attach the source identity and the wall-clock time of the analysis call.
    pub fn stamp(
        self,
        source_identifier: impl Into<String>,
        file_size_bytes: Option<u64>,
        analyzed_at: DateTime<Utc>,
    ) -> AnalysisResult {
        AnalysisResult {
            source_identifier: source_identifier.into(),
            file_size_bytes,
            analyzed_at,
            analysis: self,
        }
    }
}

/// A complete, caller-stamped analysis of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// File name, or [`PASTED_TEXT`].
    pub source_identifier: String,
    pub file_size_bytes: Option<u64>,
    pub analyzed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: Analysis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(44), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(45), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn risk_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"medium\"");
        let parsed: RiskLevel = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, RiskLevel::High);
    }

    #[test]
    fn clause_issue_uses_export_field_names() {
        let issue = ClauseIssue {
            clause_name: "Automatic Renewal".into(),
            risk_weight: RiskLevel::Low,
            issue_description: "Renews without explicit action.".into(),
            suggested_alternative: "Require notice.".into(),
        };
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["clause"], "Automatic Renewal");
        assert_eq!(value["risk"], "low");
        assert_eq!(value["issue"], "Renews without explicit action.");
        assert_eq!(value["suggestion"], "Require notice.");
    }

    #[test]
    fn stamp_attaches_identity() {
        let analysis = Analysis {
            global_score: 30,
            risk_level: RiskLevel::Low,
            clause_issues: vec![],
            negotiation_points: vec![],
            summary: "none".into(),
            source_text: String::new(),
        };
        let at = DateTime::parse_from_rfc3339("2026-02-21T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = analysis.clone().stamp(PASTED_TEXT, None, at);
        assert_eq!(result.source_identifier, "pasted text");
        assert_eq!(result.file_size_bytes, None);
        assert_eq!(result.analyzed_at, at);
        assert_eq!(result.analysis, analysis);
    }
}
