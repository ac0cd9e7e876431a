//! JSON export document for downstream consumers.
//!
//! Field names are part of the interchange contract and are kept verbatim:
//! `fileName`, `analyzedAt`, `globalScore`, `riskLevel`, `summary`,
//! `clauseIssues`, `negotiationPoints`.

use serde::{Deserialize, Serialize};

use crate::signature::format_timestamp;
use crate::types::{AnalysisResult, ClauseIssue, NegotiationPoint, RiskLevel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub file_name: String,
    /// Millisecond RFC 3339 timestamp.
    pub analyzed_at: String,
    pub global_score: u8,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub clause_issues: Vec<ClauseIssue>,
    pub negotiation_points: Vec<NegotiationPoint>,
}

impl From<&AnalysisResult> for ExportDocument {
    fn from(result: &AnalysisResult) -> Self {
        let a = &result.analysis;
        Self {
            file_name: result.source_identifier.clone(),
            analyzed_at: format_timestamp(&result.analyzed_at),
            global_score: a.global_score,
            risk_level: a.risk_level,
            summary: a.summary.clone(),
            clause_issues: a.clause_issues.clone(),
            negotiation_points: a.negotiation_points.clone(),
        }
    }
}

impl ExportDocument {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
