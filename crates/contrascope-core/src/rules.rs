//! Declarative clause rule table.
//!
//! A rule table is an ordered list of [`RuleDefinition`] records. The table
//! shipped with the crate lives in [`BUILTIN_RULES`]; alternative tables can be
//! loaded from JSON with [`RuleSet::from_json`] or [`RuleSet::load`]. Order is
//! significant: it fixes the order of issues in every analysis and therefore
//! which clause names appear in the summary.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::RiskLevel;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {name:?} has an invalid pattern: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("duplicate rule name {0:?}")]
    Duplicate(String),

    #[error("rule table is empty")]
    Empty,

    #[error("cannot read rule table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rule table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One uncompiled rule record, as it appears in a JSON rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    pub pattern: String,
    pub weight: RiskLevel,
    /// What is wrong with a matching clause.
    pub issue: String,
    /// Short advice attached to the clause issue.
    pub suggestion: String,
    /// Full replacement clause text offered as the negotiation point.
    pub alternative: String,
}

/// A compiled, immutable rule. Patterns always match case-insensitively.
#[derive(Debug, Clone)]
pub struct ClauseRule {
    pub name: String,
    pub weight: RiskLevel,
    pub issue: String,
    pub suggestion: String,
    pub alternative: String,
    pattern: Regex,
}

impl ClauseRule {
    pub fn compile(def: RuleDefinition) -> Result<Self, RuleError> {
        let pattern = RegexBuilder::new(&def.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError::Pattern {
                name: def.name.clone(),
                source,
            })?;
        Ok(Self {
            name: def.name,
            weight: def.weight,
            issue: def.issue,
            suggestion: def.suggestion,
            alternative: def.alternative,
            pattern,
        })
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// An ordered, validated set of [`ClauseRule`]s.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ClauseRule>,
}

impl RuleSet {
    /// Compile definitions in order. Names must be unique and the table non-empty.
    pub fn compile(defs: impl IntoIterator<Item = RuleDefinition>) -> Result<Self, RuleError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();
        for def in defs {
            if !seen.insert(def.name.clone()) {
                return Err(RuleError::Duplicate(def.name));
            }
            rules.push(ClauseRule::compile(def)?);
        }
        if rules.is_empty() {
            return Err(RuleError::Empty);
        }
        Ok(Self { rules })
    }

    /// Parse a JSON array of [`RuleDefinition`]s.
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let defs: Vec<RuleDefinition> = serde_json::from_str(json)?;
        Self::compile(defs)
    }

    /// Read and compile a JSON rule table from disk.
    pub fn load(path: &Path) -> Result<Self, RuleError> {
        let json = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::from_json(&json)?;
        debug!(path = %path.display(), rules = set.len(), "loaded rule table");
        Ok(set)
    }

    /// The built-in rule table, compiled once per process.
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN
    }

    pub fn rules(&self) -> &[ClauseRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// A `&'static` form of [`RuleDefinition`] for the compiled-in table.
pub struct BuiltinRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub weight: RiskLevel,
    pub issue: &'static str,
    pub suggestion: &'static str,
    pub alternative: &'static str,
}

impl From<&BuiltinRule> for RuleDefinition {
    fn from(rule: &BuiltinRule) -> Self {
        Self {
            name: rule.name.to_string(),
            pattern: rule.pattern.to_string(),
            weight: rule.weight,
            issue: rule.issue.to_string(),
            suggestion: rule.suggestion.to_string(),
            alternative: rule.alternative.to_string(),
        }
    }
}

/// Default rules. Patterns accept both French and English contract wording.
pub const BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        name: "Unilateral Termination",
        pattern: r"(résiliation|termination).*?(unilat|sans\s+préavis|without\s+notice)",
        weight: RiskLevel::High,
        issue: "Termination is possible by a single party, sometimes without notice.",
        suggestion: "Require at least 30 days' written notice and a legitimate reason.",
        alternative: "Any termination requires thirty (30) days' prior written notice stating the grounds.",
    },
    BuiltinRule {
        name: "Broad Liability Limitation",
        pattern: r"(limitation|responsabilit[eé]|liability).*(illimit|toutes\s+causes|any\s+cause)",
        weight: RiskLevel::Medium,
        issue: "Liability is limited for any cause whatsoever.",
        suggestion: "Carve out gross negligence and wilful misconduct and set a reasonable cap.",
        alternative: "Liability is limited to direct damages; gross negligence remains excluded from any limitation.",
    },
    BuiltinRule {
        name: "One-Way Indemnification",
        pattern: r"(indemn[iy]sation|hold\s+harmless).*(uniquement|one\s+way|b[eé]n[eé]fice\s+de)",
        weight: RiskLevel::Medium,
        issue: "The indemnity benefits only one party.",
        suggestion: "Make the indemnity mutual and proportionate to the risk.",
        alternative: "Indemnification obligations are mutual and proportionate to each party's respective risks.",
    },
    BuiltinRule {
        name: "Automatic Renewal",
        pattern: r"(renouvellement\s+automatique|auto\s*renew|tacite\s+reconduction)",
        weight: RiskLevel::Low,
        issue: "The contract renews without explicit action.",
        suggestion: "Require notification 30 days in advance with a simple right to object.",
        alternative: "Renewal requires a notification received 30 days before the expiry date.",
    },
    BuiltinRule {
        name: "Data/Confidentiality",
        pattern: r"(donn[eé]es|RGPD|GDPR|confidentialit[eé]|confidentiality)",
        weight: RiskLevel::Medium,
        issue: "Sensitive data or confidentiality terms need a proper framework.",
        suggestion: "Add a GDPR data processing agreement covering purposes, sub-processors and security measures.",
        alternative: "Data processing is governed by a GDPR-compliant DPA specifying purposes and security measures.",
    },
];

static BUILTIN: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::compile(BUILTIN_RULES.iter().map(RuleDefinition::from))
        .expect("built-in rule table compiles")
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn def(name: &str, pattern: &str) -> RuleDefinition {
        RuleDefinition {
            name: name.into(),
            pattern: pattern.into(),
            weight: RiskLevel::Low,
            issue: "issue".into(),
            suggestion: "suggestion".into(),
            alternative: "alternative".into(),
        }
    }

    #[test]
    fn builtin_table_order_and_size() {
        let names: Vec<&str> = RuleSet::builtin()
            .rules()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "Unilateral Termination",
                "Broad Liability Limitation",
                "One-Way Indemnification",
                "Automatic Renewal",
                "Data/Confidentiality",
            ]
        );
    }

    #[test]
    fn patterns_are_case_insensitive() {
        let rule = ClauseRule::compile(def("renewal", r"auto\s*renew")).unwrap();
        assert!(rule.matches("This agreement shall AUTO RENEW"));
        assert!(rule.matches("autorenewal applies"));
        assert!(!rule.matches("manual renewal only"));
    }

    #[test]
    fn case_folding_covers_accented_letters() {
        let termination = &RuleSet::builtin().rules()[0];
        assert!(termination.matches("RÉSILIATION SANS PRÉAVIS"));
        assert!(termination.matches("résiliation unilatérale"));
    }

    #[test]
    fn invalid_pattern_is_reported_with_rule_name() {
        let err = RuleSet::compile([def("broken", "(unclosed")]).unwrap_err();
        match err {
            RuleError::Pattern { name, .. } => assert_eq!(name, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = RuleSet::compile([def("a", "x"), def("a", "y")]).unwrap_err();
        assert!(matches!(err, RuleError::Duplicate(name) if name == "a"));
    }

    #[test]
    fn empty_table_rejected() {
        assert!(matches!(RuleSet::from_json("[]"), Err(RuleError::Empty)));
    }

    #[test]
    fn from_json_preserves_order() {
        let json = r#"[
            {"name": "second-hand", "pattern": "used", "weight": "high",
             "issue": "i", "suggestion": "s", "alternative": "a"},
            {"name": "escrow", "pattern": "escrow", "weight": "medium",
             "issue": "i", "suggestion": "s", "alternative": "a"}
        ]"#;
        let set = RuleSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[0].name, "second-hand");
        assert_eq!(set.rules()[0].weight, RiskLevel::High);
        assert!(set.rules()[1].matches("Escrow account"));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            RuleSet::from_json("{not json"),
            Err(RuleError::Json(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&vec![def("escrow", "escrow")]).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let set = RuleSet::load(file.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.rules()[0].matches("funds held in ESCROW"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = RuleSet::load(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(matches!(err, RuleError::Io { .. }));
    }
}
