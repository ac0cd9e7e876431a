//! Text normalisation and tokenisation shared by the analyzer, diff, and search.

/// Byte-order mark. Counts as a separator so a leading BOM never sticks to the first word.
const BOM: char = '\u{FEFF}';

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == BOM
}

/// Collapse every whitespace run (newlines included) to one space and trim.
///
/// The result is the canonical `source_text` of an analysis.
pub fn normalize_text(raw: &str) -> String {
    tokenize(raw).join(" ")
}

/// Split text into whitespace-delimited tokens. Empty tokens never appear.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(is_separator).filter(|t| !t.is_empty()).collect()
}
