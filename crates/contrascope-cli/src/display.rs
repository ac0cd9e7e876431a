//! Vertical card display for analyses, diffs, search hits, and signatures.
//!
//! Every renderer returns a `String` so `main` decides where it goes.

use contrascope_core::render::{render_html, render_markers};
use contrascope_core::signature::format_timestamp;
use contrascope_core::{AnalysisResult, DiffSummary, DiffToken, SearchHit, SignatureRecord};

// ── Public API ──

/// Render one analysis as a card: header, overview, clause issues, negotiation points.
pub fn analysis_card(result: &AnalysisResult) -> String {
    let a = &result.analysis;
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", result.source_identifier));
    out.push_str(&format!("{}\n\n", a.summary));

    out.push_str("Overview\n");
    field(&mut out, "source", &result.source_identifier);
    if let Some(size) = result.file_size_bytes {
        field(&mut out, "size", &format!("{size} bytes"));
    }
    field(&mut out, "analyzed at", &format_timestamp(&result.analyzed_at));
    field(&mut out, "score", &format!("{} / 100", a.global_score));
    field(&mut out, "risk level", a.risk_level.as_str());
    out.push('\n');

    if a.clause_issues.is_empty() {
        return out;
    }

    out.push_str(&format!("Clause Issues ({}):\n", a.clause_issues.len()));
    for issue in &a.clause_issues {
        out.push_str(&format!(
            "    {:<10}{}\n",
            format!("[{}]", issue.risk_weight),
            issue.clause_name
        ));
        out.push_str(&format!("      {}\n", issue.issue_description));
        out.push_str(&format!("      suggestion: {}\n", issue.suggested_alternative));
    }
    out.push('\n');

    out.push_str(&format!("Negotiation Points ({}):\n", a.negotiation_points.len()));
    for point in &a.negotiation_points {
        out.push_str(&format!(
            "    {:<10}{}\n",
            format!("[{}]", point.priority),
            point.point
        ));
        out.push_str(&format!("      {}\n", point.alternative));
    }
    out.push('\n');
    out
}

/// Render a diff as markers (or HTML) followed by a one-line count summary.
pub fn diff_view(tokens: &[DiffToken], html: bool) -> String {
    let body = if html {
        render_html(tokens)
    } else {
        render_markers(tokens)
    };
    format!("{body}\n\n{}\n", summary_line(&DiffSummary::of(tokens)))
}

pub fn hits_view(hits: &[SearchHit]) -> String {
    let mut out = String::new();
    for hit in hits {
        out.push_str(&format!("{}\n", hit.label));
        out.push_str(&format!("    {}\n", hit.context));
    }
    out
}

pub fn signature_card(record: &SignatureRecord) -> String {
    let mut out = String::from("Signature\n");
    field(&mut out, "id", &record.id);
    field(&mut out, "signer", &record.signer);
    field(&mut out, "email", &record.email);
    field(&mut out, "signed at", &format_timestamp(&record.signed_at));
    out
}

// ── Helpers ──

fn field(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!("  {:<26} {}\n", name, value));
}

fn summary_line(summary: &DiffSummary) -> String {
    if summary.is_unchanged() {
        return format!("No differences ({} words).", summary.equal);
    }
    format!(
        "{} unchanged, {} deleted, {} inserted",
        summary.equal, summary.deleted, summary.inserted
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use contrascope_core::{SignatureRequest, analyze, diff, search};

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn card_lists_issues_and_points() {
        let result = analyze("Termination without notice. Auto renew.").stamp(
            "msa.txt",
            Some(40),
            ts("2026-02-21T10:00:00Z"),
        );
        let card = analysis_card(&result);

        assert!(card.starts_with("=== msa.txt ===\n"));
        assert!(card.contains("  score                      63 / 100\n"));
        assert!(card.contains("  risk level                 medium\n"));
        assert!(card.contains("  size                       40 bytes\n"));
        assert!(card.contains("Clause Issues (2):\n    [high]    Unilateral Termination\n"));
        assert!(card.contains("Negotiation Points (2):\n"));
        assert!(card.contains("    [low]     Automatic Renewal\n"));
    }

    #[test]
    fn card_without_issues_stops_after_overview() {
        let result = analyze("Plain services agreement.").stamp(
            contrascope_core::PASTED_TEXT,
            None,
            ts("2026-02-21T10:00:00Z"),
        );
        let card = analysis_card(&result);
        assert!(card.contains("  score                      30 / 100\n"));
        assert!(!card.contains("size"));
        assert!(!card.contains("Clause Issues"));
    }

    #[test]
    fn diff_view_markers_and_summary() {
        let view = diff_view(&diff("a b", "a c"), false);
        assert_eq!(view, "a {+c+} [-b-]\n\n1 unchanged, 1 deleted, 1 inserted\n");
    }

    #[test]
    fn diff_view_html() {
        let view = diff_view(&diff("a b", "a c"), true);
        assert!(view.starts_with("<span>a</span> <ins>c</ins> <del>b</del>\n"));
    }

    #[test]
    fn identical_texts_report_no_differences() {
        let view = diff_view(&diff("same words", "same  words"), false);
        assert!(view.ends_with("No differences (2 words).\n"));
    }

    #[test]
    fn hits_show_label_then_context() {
        let view = hits_view(&search("", "termination"));
        assert_eq!(view, "Analyze a contract first.\n    —\n");
    }

    #[test]
    fn signature_card_fields() {
        let record = SignatureRecord::local(
            &SignatureRequest::new("Ada", "ada@example.com"),
            ts("2026-02-21T11:30:00Z"),
        );
        let card = signature_card(&record);
        assert!(card.contains(&format!("  id                         {}\n", record.id)));
        assert!(card.contains("  signed at                  2026-02-21T11:30:00.000Z\n"));
    }
}
