//! Keyword spotlight search over analyzed text.
//!
//! A convenience scan rather than a clause index: each query word longer
//! than three characters is located case-insensitively everywhere in the
//! text, overlapping occurrences included, and every occurrence yields one
//! hit with up to [`CONTEXT_BEFORE`] characters of leading and
//! [`CONTEXT_AFTER`] characters of trailing context.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Characters of context kept before a match.
pub const CONTEXT_BEFORE: usize = 60;
/// Characters of context kept after a match.
pub const CONTEXT_AFTER: usize = 120;
/// Query words this short or shorter are ignored.
pub const MIN_KEYWORD_CHARS: usize = 3;

pub const NO_INPUT_LABEL: &str = "Analyze a contract first.";
pub const NO_MATCH_LABEL: &str = "No matching clause found.";
/// Context shown by placeholder hits.
pub const PLACEHOLDER_CONTEXT: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    Match,
    /// No analyzed text was available.
    NoInput,
    /// Text was searched but no keyword occurred.
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub context: String,
    pub label: String,
    pub kind: HitKind,
}

impl SearchHit {
    pub fn no_input() -> Self {
        Self {
            context: PLACEHOLDER_CONTEXT.to_string(),
            label: NO_INPUT_LABEL.to_string(),
            kind: HitKind::NoInput,
        }
    }

    pub fn no_match() -> Self {
        Self {
            context: PLACEHOLDER_CONTEXT.to_string(),
            label: NO_MATCH_LABEL.to_string(),
            kind: HitKind::NoMatch,
        }
    }

    fn found(context: &str, keyword: &str) -> Self {
        Self {
            context: context.to_string(),
            label: format!("Clause found: « {keyword} »"),
            kind: HitKind::Match,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind != HitKind::Match
    }
}

/// Lower-cased query words longer than [`MIN_KEYWORD_CHARS`], in query order.
pub fn keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

/// Search normalized text for every keyword of `query`.
///
/// Never empty: returns a single placeholder hit when `text` is empty or
/// when nothing matched.
pub fn search(text: &str, query: &str) -> Vec<SearchHit> {
    if text.trim().is_empty() {
        return vec![SearchHit::no_input()];
    }

    let mut hits = Vec::new();
    for keyword in keywords(query) {
        let pattern = match RegexBuilder::new(&regex::escape(&keyword))
            .case_insensitive(true)
            .build()
        {
            Ok(p) => p,
            Err(e) => {
                warn!(keyword = %keyword, error = %e, "skipping unsearchable keyword");
                continue;
            }
        };

        let mut from = 0;
        while let Some(m) = pattern.find_at(text, from) {
            hits.push(SearchHit::found(window(text, m.start(), m.end()), &keyword));
            // Resume one character past the match start so overlaps are found.
            from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            if from >= text.len() {
                break;
            }
        }
    }

    debug!(hits = hits.len(), "keyword search complete");
    if hits.is_empty() {
        vec![SearchHit::no_match()]
    } else {
        hits
    }
}

/// Slice of `text` around `start..end`, widened by the context limits.
fn window(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(CONTEXT_BEFORE)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_AFTER)
        .map_or(text.len(), |(i, _)| end + i);
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter()
            .filter(|h| h.kind == HitKind::Match)
            .map(|h| h.context.as_str())
            .collect()
    }

    #[test]
    fn empty_text_returns_analyze_first() {
        let hits = search("", "termination");
        assert_eq!(hits, vec![SearchHit::no_input()]);
        assert_eq!(hits[0].label, NO_INPUT_LABEL);
        assert!(hits[0].is_placeholder());
    }

    #[test]
    fn empty_text_ignores_query_content() {
        assert_eq!(search("", ""), vec![SearchHit::no_input()]);
        assert_eq!(search("", "a b c"), vec![SearchHit::no_input()]);
    }

    #[test]
    fn no_match_placeholder() {
        let hits = search("Payment is due within thirty days.", "termination");
        assert_eq!(hits, vec![SearchHit::no_match()]);
    }

    #[test]
    fn short_words_are_filtered() {
        assert_eq!(keywords("the due date of TERM"), vec!["date", "term"]);
        // Every word is three characters or fewer.
        let hits = search("The fee is due now.", "fee due now");
        assert_eq!(hits, vec![SearchHit::no_match()]);
    }

    #[test]
    fn match_is_case_insensitive_and_labelled() {
        let hits = search("Either party may request TERMINATION.", "termination");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, HitKind::Match);
        assert_eq!(hits[0].label, "Clause found: « termination »");
        assert_eq!(hits[0].context, "Either party may request TERMINATION.");
    }

    #[test]
    fn every_occurrence_yields_a_hit() {
        let text = "Notice is required. Written notice must be sent. Notice periods apply.";
        assert_eq!(matches(&search(text, "notice")).len(), 3);
    }

    #[test]
    fn overlapping_occurrences_are_not_deduplicated() {
        assert_eq!(matches(&search("aaaaa", "aaaa")).len(), 2);
    }

    #[test]
    fn hits_follow_keyword_order() {
        let hits = search("liability before renewal", "renewal liability");
        let labels: Vec<&str> = hits.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Clause found: « renewal »", "Clause found: « liability »"]
        );
    }

    #[test]
    fn context_window_is_bounded() {
        let before = "b".repeat(100);
        let after = "a".repeat(200);
        let text = format!("{before} clause {after}");
        let hits = search(&text, "clause");
        assert_eq!(hits.len(), 1);
        let ctx = &hits[0].context;
        // 60 before + "clause" + 120 after
        assert_eq!(ctx.chars().count(), 60 + 6 + 120);
        assert!(ctx.starts_with(&"b".repeat(59)));
        assert!(ctx.contains(" clause "));
    }

    #[test]
    fn context_window_respects_multibyte_chars() {
        let text = format!("{} résiliation {}", "é".repeat(80), "à".repeat(150));
        let hits = search(&text, "RÉSILIATION");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].context.chars().count(), 60 + "résiliation".chars().count() + 120);
    }

    #[test]
    fn keyword_is_matched_literally() {
        let hits = search("Fees (net) are payable.", "(net)");
        assert_eq!(matches(&hits), vec!["Fees (net) are payable."]);
        assert_eq!(search("Fees are payable.", "pay.*"), vec![SearchHit::no_match()]);
    }
}
