//! Review operations that prefer a remote backend and fall back to local rules.
//!
//! Any remote failure (unreachable host, timeout, 404, error status, bad
//! payload) is logged and answered locally. Callers never see a remote error.

use async_trait::async_trait;
use chrono::Utc;
use contrascope_core::{
    Analysis, RuleSet, SearchHit, SignatureLog, SignatureRecord, SignatureRequest, analyze_with,
    search,
};
use tracing::warn;

use crate::RemoteError;

/// A remote implementation of the review operations.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Analysis, RemoteError>;

    /// Answer a free-text question about `text`.
    async fn ask(&self, text: &str, question: &str) -> Result<Vec<SearchHit>, RemoteError>;

    async fn sign(&self, request: &SignatureRequest) -> Result<SignatureRecord, RemoteError>;
}

pub struct ReviewService {
    rules: RuleSet,
    remote: Option<Box<dyn RemoteBackend>>,
}

impl Default for ReviewService {
    fn default() -> Self {
        Self::local(RuleSet::default())
    }
}

impl ReviewService {
    /// A service that only ever uses `rules` locally.
    pub fn local(rules: RuleSet) -> Self {
        Self {
            rules,
            remote: None,
        }
    }

    /// Try `remote` first for every operation.
    pub fn with_remote(mut self, remote: impl RemoteBackend + 'static) -> Self {
        self.remote = Some(Box::new(remote));
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub async fn analyze(&self, raw: &str) -> Analysis {
        if let Some(remote) = &self.remote {
            match remote.analyze(raw).await {
                Ok(analysis) => return analysis,
                Err(e) => warn!(error = %e, "remote analysis unavailable, using local rules"),
            }
        }
        analyze_with(&self.rules, raw)
    }

    /// Search analyzed text. Empty text short-circuits to the "analyze first" hit.
    pub async fn search(&self, text: &str, question: &str) -> Vec<SearchHit> {
        if text.trim().is_empty() {
            return vec![SearchHit::no_input()];
        }
        if let Some(remote) = &self.remote {
            match remote.ask(text, question).await {
                Ok(hits) if hits.is_empty() => return vec![SearchHit::no_match()],
                Ok(hits) => return hits,
                Err(e) => warn!(error = %e, "remote Q&A unavailable, using keyword search"),
            }
        }
        search(text, question)
    }

    /// Record a signature in `log`, returning the stored record.
    pub async fn sign(&self, log: &mut SignatureLog, request: &SignatureRequest) -> SignatureRecord {
        if let Some(remote) = &self.remote {
            match remote.sign(request).await {
                Ok(record) => return log.push(record).clone(),
                Err(e) => warn!(error = %e, "remote signing unavailable, fingerprinting locally"),
            }
        }
        log.sign(request, Utc::now()).clone()
    }
}
