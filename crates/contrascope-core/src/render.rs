//! Stateless renderers for diff output.

use crate::diff::{DiffStatus, DiffToken};

/// Render as an HTML fragment: `<span>`, `<del>`, `<ins>` joined by single spaces.
pub fn render_html(tokens: &[DiffToken]) -> String {
    tokens
        .iter()
        .map(|t| {
            let value = escape_html(&t.value);
            match t.status {
                DiffStatus::Equal => format!("<span>{value}</span>"),
                DiffStatus::Deleted => format!("<del>{value}</del>"),
                DiffStatus::Inserted => format!("<ins>{value}</ins>"),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render with inline word-diff markers: `[-deleted-]` and `{+inserted+}`.
pub fn render_markers(tokens: &[DiffToken]) -> String {
    tokens
        .iter()
        .map(|t| match t.status {
            DiffStatus::Equal => t.value.clone(),
            DiffStatus::Deleted => format!("[-{}-]", t.value),
            DiffStatus::Inserted => format!("{{+{}+}}", t.value),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
