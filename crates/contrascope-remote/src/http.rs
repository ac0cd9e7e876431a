//! HTTP client for the optional remote analysis, Q&A, and signature endpoints.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contrascope_core::signature::format_timestamp;
use contrascope_core::{
    Analysis, ClauseIssue, HitKind, NegotiationPoint, RiskLevel, SearchHit, SignatureRecord,
    SignatureRequest, normalize_text,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::RemoteError;
use crate::service::RemoteBackend;

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(12_000);

/// HTTP client for a ContraScope-compatible API (`/analyze`, `/qa`, `/sign`).
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    summary: String,
    score: i64,
    risk: RiskLevel,
    #[serde(default)]
    clauses: Vec<RemoteClause>,
    /// Replacement clause texts, index-aligned with `clauses` when present.
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteClause {
    title: String,
    risk: RiskLevel,
    issue: String,
    suggestion: String,
}

#[derive(Serialize)]
struct QaRequest<'a> {
    text: &'a str,
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct QaAnswer {
    clause: String,
    summary: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analyzed_at: Option<String>,
    signer: &'a str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    id: String,
    at: String,
}

impl AnalyzeResponse {
    /// Map onto the local analysis shape. `text` is normalized locally.
    ///
    /// The risk level is re-derived from the clamped score so that the
    /// score thresholds hold for remote results too.
    fn into_analysis(self, text: &str) -> Analysis {
        let global_score = self.score.clamp(0, 100) as u8;
        let risk_level = RiskLevel::from_score(global_score);
        if risk_level != self.risk {
            debug!(
                remote = %self.risk,
                derived = %risk_level,
                score = global_score,
                "remote risk level disagrees with its score"
            );
        }

        let mut suggestions = self.suggestions.into_iter();
        let mut clause_issues = Vec::with_capacity(self.clauses.len());
        let mut negotiation_points = Vec::with_capacity(self.clauses.len());
        for clause in self.clauses {
            let alternative = suggestions
                .next()
                .unwrap_or_else(|| clause.suggestion.clone());
            negotiation_points.push(NegotiationPoint {
                point: clause.title.clone(),
                priority: clause.risk,
                alternative,
            });
            clause_issues.push(ClauseIssue {
                clause_name: clause.title,
                risk_weight: clause.risk,
                issue_description: clause.issue,
                suggested_alternative: clause.suggestion,
            });
        }

        Analysis {
            global_score,
            risk_level,
            clause_issues,
            negotiation_points,
            summary: self.summary,
            source_text: normalize_text(text),
        }
    }
}

impl From<QaAnswer> for SearchHit {
    fn from(answer: QaAnswer) -> Self {
        Self {
            context: answer.clause,
            label: answer.summary,
            kind: HitKind::Match,
        }
    }
}

impl RemoteClient {
    /// Create a client for `base_url` with [`DEFAULT_TIMEOUT`].
    ///
    /// `base_url` should be like `http://localhost:8000` (a trailing slash is trimmed).
    pub fn new(base_url: String) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "posting to remote endpoint");

        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NoEndpoint(url));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RemoteBackend for RemoteClient {
    async fn analyze(&self, text: &str) -> Result<Analysis, RemoteError> {
        let resp: AnalyzeResponse = self.post_json("/analyze", &AnalyzeRequest { text }).await?;
        let analysis = resp.into_analysis(text);
        info!(
            score = analysis.global_score,
            clauses = analysis.clause_issues.len(),
            "remote analysis complete"
        );
        Ok(analysis)
    }

    async fn ask(&self, text: &str, question: &str) -> Result<Vec<SearchHit>, RemoteError> {
        let answers: Vec<QaAnswer> = self.post_json("/qa", &QaRequest { text, question }).await?;
        info!(count = answers.len(), "remote answers received");
        Ok(answers.into_iter().map(SearchHit::from).collect())
    }

    async fn sign(&self, request: &SignatureRequest) -> Result<SignatureRecord, RemoteError> {
        let payload = sign_payload(request);
        let resp: SignResponse = self.post_json("/sign", &payload).await?;
        let signed_at = DateTime::parse_from_rfc3339(&resp.at)
            .map_err(|e| RemoteError::Malformed(format!("signature time {:?}: {e}", resp.at)))?
            .with_timezone(&Utc);
        Ok(SignatureRecord::with_id(resp.id, request, signed_at))
    }
}

fn sign_payload(request: &SignatureRequest) -> SignPayload<'_> {
    SignPayload {
        file_name: Some(request.source_identifier.as_str()).filter(|s| !s.is_empty()),
        analyzed_at: request.analyzed_at.as_ref().map(format_timestamp),
        signer: &request.signer_name,
        email: &request.signer_email,
    }
}
