pub mod analyzer;
pub mod diff;
pub mod export;
pub mod normalize;
pub mod render;
pub mod rules;
pub mod search;
pub mod signature;
pub mod types;

pub use analyzer::{analyze, analyze_with};
pub use diff::{DiffStatus, DiffSummary, DiffToken, diff};
pub use export::ExportDocument;
pub use normalize::normalize_text;
pub use rules::{ClauseRule, RuleDefinition, RuleError, RuleSet};
pub use search::{HitKind, SearchHit, search};
pub use signature::{SignatureLog, SignatureRecord, SignatureRequest, fingerprint};
pub use types::{Analysis, AnalysisResult, ClauseIssue, NegotiationPoint, PASTED_TEXT, RiskLevel};
