//! Simulated signature events and their short fingerprints.
//!
//! A fingerprint is a 32-bit rolling hash (`h = h * 31 + unit`, wrapping) over
//! the UTF-16 code units of the signature input, printed as eight zero-padded
//! lowercase hex digits. It identifies an event for display only and carries
//! no cryptographic meaning.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::AnalysisResult;

/// Stored for signer name or email when none was given.
pub const UNKNOWN_SIGNER: &str = "—";

/// Eight-hex-digit fingerprint of `input`.
pub fn fingerprint(input: &str) -> String {
    let mut h: i32 = 0;
    for unit in input.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    format!("{:08x}", h as u32)
}

/// Millisecond-precision RFC 3339 in UTC, e.g. `2026-02-21T10:00:00.000Z`.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Who signs what. Identity fields are empty when no analysis preceded the signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest {
    pub source_identifier: String,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub signer_name: String,
    pub signer_email: String,
}

impl SignatureRequest {
    pub fn new(signer_name: impl Into<String>, signer_email: impl Into<String>) -> Self {
        Self {
            signer_name: signer_name.into(),
            signer_email: signer_email.into(),
            ..Default::default()
        }
    }

    /// Bind the request to the analysis being signed.
    pub fn for_result(mut self, result: &AnalysisResult) -> Self {
        self.source_identifier = result.source_identifier.clone();
        self.analyzed_at = Some(result.analyzed_at);
        self
    }

    /// Concatenation hashed into the event id.
    pub fn fingerprint_input(&self, signed_at: &DateTime<Utc>) -> String {
        let analyzed_at = self
            .analyzed_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default();
        format!(
            "{}{}{}{}{}",
            self.source_identifier,
            analyzed_at,
            self.signer_name,
            self.signer_email,
            format_timestamp(signed_at)
        )
    }
}

/// One recorded signature event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub id: String,
    #[serde(rename = "at")]
    pub signed_at: DateTime<Utc>,
    pub signer: String,
    pub email: String,
}

impl SignatureRecord {
    /// Build a record for `request`, fingerprinted locally.
    pub fn local(request: &SignatureRequest, signed_at: DateTime<Utc>) -> Self {
        let id = fingerprint(&request.fingerprint_input(&signed_at));
        Self::with_id(id, request, signed_at)
    }

    /// Build a record with an id assigned elsewhere.
    pub fn with_id(id: String, request: &SignatureRequest, signed_at: DateTime<Utc>) -> Self {
        Self {
            id,
            signed_at,
            signer: or_unknown(&request.signer_name),
            email: or_unknown(&request.signer_email),
        }
    }
}

fn or_unknown(s: &str) -> String {
    if s.is_empty() {
        UNKNOWN_SIGNER.to_string()
    } else {
        s.to_string()
    }
}

/// In-memory signature history, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureLog {
    records: Vec<SignatureRecord>,
}

impl SignatureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint and prepend a signature made at `signed_at`.
    pub fn sign(&mut self, request: &SignatureRequest, signed_at: DateTime<Utc>) -> &SignatureRecord {
        self.push(SignatureRecord::local(request, signed_at))
    }

    /// Prepend an already-built record.
    pub fn push(&mut self, record: SignatureRecord) -> &SignatureRecord {
        info!(id = %record.id, signer = %record.signer, "signature recorded");
        self.records.insert(0, record);
        &self.records[0]
    }

    pub fn records(&self) -> &[SignatureRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&SignatureRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn fingerprint_known_values() {
        assert_eq!(fingerprint(""), "00000000");
        assert_eq!(fingerprint("a"), "00000061");
        assert_eq!(fingerprint("ab"), "00000c21");
        // Wraps past i32 and must still print as 8 digits.
        let long = fingerprint("hello world, this input overflows thirty-two bits");
        assert_eq!(long.len(), 8);
        assert!(long.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn fingerprint_hashes_utf16_units() {
        // 'é' is one UTF-16 unit (0xE9) but two UTF-8 bytes.
        assert_eq!(fingerprint("é"), "000000e9");
        // Astral characters hash as a surrogate pair.
        let pair = 0xD83D_i32.wrapping_mul(31).wrapping_add(0xDE00);
        assert_eq!(fingerprint("😀"), format!("{:08x}", pair as u32));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(fingerprint("contract.pdf"), fingerprint("contract.pdf"));
        assert_ne!(fingerprint("contract.pdf"), fingerprint("contract.pdg"));
    }

    #[test]
    fn timestamps_use_millisecond_rfc3339() {
        assert_eq!(
            format_timestamp(&ts("2026-02-21T10:00:00Z")),
            "2026-02-21T10:00:00.000Z"
        );
    }

    #[test]
    fn fingerprint_input_concatenates_fields() {
        let result = analyze("text").stamp("nda.txt", Some(4), ts("2026-02-21T10:00:00Z"));
        let req = SignatureRequest::new("Ada", "ada@example.com").for_result(&result);
        assert_eq!(
            req.fingerprint_input(&ts("2026-02-21T11:30:00Z")),
            "nda.txt2026-02-21T10:00:00.000ZAdaada@example.com2026-02-21T11:30:00.000Z"
        );
    }

    #[test]
    fn fingerprint_input_without_analysis() {
        let req = SignatureRequest::new("Ada", "");
        assert_eq!(
            req.fingerprint_input(&ts("2026-02-21T11:30:00Z")),
            "Ada2026-02-21T11:30:00.000Z"
        );
    }

    #[test]
    fn log_is_most_recent_first() {
        let mut log = SignatureLog::new();
        assert!(log.is_empty());

        log.sign(&SignatureRequest::new("First", "first@example.com"), ts("2026-02-21T10:00:00Z"));
        log.sign(&SignatureRequest::new("Second", "second@example.com"), ts("2026-02-21T10:05:00Z"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].signer, "Second");
        assert_eq!(log.records()[1].signer, "First");
        assert_eq!(log.latest().map(|r| r.signer.as_str()), Some("Second"));
    }

    #[test]
    fn record_id_matches_fingerprint_of_input() {
        let req = SignatureRequest::new("Ada", "ada@example.com");
        let at = ts("2026-02-21T11:30:00Z");
        let record = SignatureRecord::local(&req, at);
        assert_eq!(record.id, fingerprint(&req.fingerprint_input(&at)));
        assert_eq!(record.signed_at, at);
    }

    #[test]
    fn empty_signer_fields_use_placeholder() {
        let record = SignatureRecord::local(&SignatureRequest::new("", ""), ts("2026-02-21T11:30:00Z"));
        assert_eq!(record.signer, UNKNOWN_SIGNER);
        assert_eq!(record.email, UNKNOWN_SIGNER);
    }

    #[test]
    fn whitespace_signer_fields_are_kept() {
        let record = SignatureRecord::local(&SignatureRequest::new(" ", "\t"), ts("2026-02-21T11:30:00Z"));
        assert_eq!(record.signer, " ");
        assert_eq!(record.email, "\t");
    }

    #[test]
    fn record_serializes_with_at_field() {
        let record = SignatureRecord::local(&SignatureRequest::new("Ada", "a@b.c"), ts("2026-02-21T11:30:00Z"));
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("at").is_some());
        assert_eq!(value["signer"], "Ada");
    }
}
