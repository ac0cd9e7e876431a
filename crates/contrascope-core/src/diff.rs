//! Word-level diff between two contract versions.
//!
//! Builds the full LCS table over whitespace tokens and backtracks from the
//! bottom-right corner. When both neighbouring subproblems are equally good
//! the backtrack takes the deletion. Since the backtrack walks from the end,
//! a tied deletion ends up after the competing insertion once the output is
//! put back into document order.
//!
//! # Complexity
//!
//! O(m·n) time and memory in the token counts of the two inputs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalize::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    /// Present in both versions.
    Equal,
    /// Present only in version A.
    Deleted,
    /// Present only in version B.
    Inserted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffToken {
    pub value: String,
    pub status: DiffStatus,
}

impl DiffToken {
    fn new(value: &str, status: DiffStatus) -> Self {
        Self {
            value: value.to_string(),
            status,
        }
    }
}

/// Token counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub equal: usize,
    pub deleted: usize,
    pub inserted: usize,
}

impl DiffSummary {
    pub fn of(tokens: &[DiffToken]) -> Self {
        let mut summary = Self::default();
        for token in tokens {
            match token.status {
                DiffStatus::Equal => summary.equal += 1,
                DiffStatus::Deleted => summary.deleted += 1,
                DiffStatus::Inserted => summary.inserted += 1,
            }
        }
        summary
    }

    /// True when the two versions have identical token sequences.
    pub fn is_unchanged(&self) -> bool {
        self.deleted == 0 && self.inserted == 0
    }
}

/// Diff two texts word by word.
pub fn diff(text_a: &str, text_b: &str) -> Vec<DiffToken> {
    let a = tokenize(text_a);
    let b = tokenize(text_b);
    let tokens = diff_tokens(&a, &b);
    debug!(
        tokens_a = a.len(),
        tokens_b = b.len(),
        output = tokens.len(),
        "word diff complete"
    );
    tokens
}

/// Diff two already-tokenized sequences.
pub fn diff_tokens(a: &[&str], b: &[&str]) -> Vec<DiffToken> {
    let (m, n) = (a.len(), b.len());
    let width = n + 1;

    // table[i * width + j] = LCS length of a[..i] and b[..j].
    let mut table = vec![0u32; (m + 1) * width];
    for i in 1..=m {
        for j in 1..=n {
            table[i * width + j] = if a[i - 1] == b[j - 1] {
                table[(i - 1) * width + (j - 1)] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + (j - 1)])
            };
        }
    }

    // Emissions in reverse document order.
    let mut reversed = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            reversed.push(DiffToken::new(a[i - 1], DiffStatus::Equal));
            i -= 1;
            j -= 1;
        } else if table[(i - 1) * width + j] >= table[i * width + (j - 1)] {
            reversed.push(DiffToken::new(a[i - 1], DiffStatus::Deleted));
            i -= 1;
        } else {
            reversed.push(DiffToken::new(b[j - 1], DiffStatus::Inserted));
            j -= 1;
        }
    }

    // At most one of these prefixes is non-empty once the backtrack stops.
    let mut out = Vec::with_capacity(i + j + reversed.len());
    out.extend(a[..i].iter().map(|t| DiffToken::new(t, DiffStatus::Deleted)));
    out.extend(b[..j].iter().map(|t| DiffToken::new(t, DiffStatus::Inserted)));
    out.extend(reversed.into_iter().rev());
    out
}
