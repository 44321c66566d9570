//! Remote client for the analysis service.
//!
//! This module provides a trait-based abstraction over the three wire
//! operations - balance fetch, analysis submission, history fetch - with an
//! HTTP implementation behind it. All calls are single-attempt; retry
//! policy, if any, belongs to the caller (and blindly retrying `analyze` is
//! never safe, because the server may already have deducted a credit).

mod error;
mod http;

pub use error::{classify_http_status, RemoteError};
pub use http::HttpRemoteClient;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credential::BearerToken;

/// A single analysis submission.
///
/// # Invariants
/// - `prompt` is non-empty (enforced by the orchestrator's input validation).
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub prompt: String,
}

impl AnalysisRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Balance response body from `GET /me/credits`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CreditsResponse {
    pub credits_left: u64,
}

/// One past analysis from `GET /dream-history/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    pub dream: String,
    pub analysis: String,
    pub created_at: DateTime<Utc>,
}

/// Trait for the analysis service API.
///
/// Credentials are passed explicitly per call; the implementation never
/// reads them from ambient state.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Fetch the authoritative credit balance. Requires a credential; an
    /// absent one yields [`RemoteError::Unauthorized`] without a network
    /// call.
    async fn fetch_balance(&self, credential: Option<&BearerToken>) -> Result<u64, RemoteError>;

    /// Submit a prompt for analysis and return the raw response body.
    /// Anonymous submission is permitted; decoding is the caller's job.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        credential: Option<&BearerToken>,
    ) -> Result<Bytes, RemoteError>;

    /// Fetch the ordered analysis history for a user.
    async fn fetch_history(
        &self,
        user_id: &str,
        credential: Option<&BearerToken>,
    ) -> Result<Vec<HistoryEntry>, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_request_serializes_to_prompt_body() {
        let request = AnalysisRequest::new("I was flying");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, serde_json::json!({"prompt": "I was flying"}));
    }

    #[test]
    fn test_history_entry_tolerates_missing_names() {
        let body = r#"{
            "user_id": "u-1",
            "dream": "falling",
            "analysis": "fear of losing control",
            "created_at": "2025-12-13T10:00:00Z"
        }"#;
        let entry: HistoryEntry = serde_json::from_str(body).unwrap();
        assert!(entry.name.is_none());
        assert!(entry.surname.is_none());
        assert_eq!(entry.dream, "falling");
    }
}
