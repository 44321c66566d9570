//! HTTP implementation of the remote API.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::RequestBuilder;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::credential::BearerToken;

use super::error::{classify_http_status, RemoteError};
use super::{AnalysisRequest, CreditsResponse, HistoryEntry, RemoteApi};

/// `reqwest`-backed client for the analysis service.
///
/// Owns the connection pool; requests time out per [`Config`]. Each call is
/// a single attempt - status and transport anomalies are converted into
/// [`RemoteError`] and surfaced to the caller untouched.
pub struct HttpRemoteClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpRemoteClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        // Url::join treats the last path segment as a file unless the base
        // ends with a slash.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    fn with_credential(
        request: RequestBuilder,
        credential: Option<&BearerToken>,
    ) -> RequestBuilder {
        match credential {
            Some(token) => request.bearer_auth(token.secret()),
            None => request,
        }
    }

    /// Send a request, classify the status, and return the non-empty body.
    async fn send_expecting_body(request: RequestBuilder) -> Result<Bytes, RemoteError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        classify_http_status(status)?;

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(RemoteError::NoData);
        }
        Ok(body)
    }
}

#[async_trait]
impl RemoteApi for HttpRemoteClient {
    async fn fetch_balance(&self, credential: Option<&BearerToken>) -> Result<u64, RemoteError> {
        let Some(token) = credential else {
            return Err(RemoteError::Unauthorized);
        };

        let url = self.endpoint("me/credits")?;
        let request = self.http.get(url).bearer_auth(token.secret());
        let body = Self::send_expecting_body(request).await?;

        let credits: CreditsResponse =
            serde_json::from_slice(&body).map_err(|_| RemoteError::NoData)?;
        debug!(credits_left = credits.credits_left, "fetched balance");
        Ok(credits.credits_left)
    }

    async fn analyze(
        &self,
        request: &AnalysisRequest,
        credential: Option<&BearerToken>,
    ) -> Result<Bytes, RemoteError> {
        let url = self.endpoint("llm-chat")?;
        let http_request = Self::with_credential(self.http.post(url).json(request), credential);
        let body = Self::send_expecting_body(http_request).await?;

        debug!(
            bytes = body.len(),
            raw = %String::from_utf8_lossy(&body),
            "analysis response"
        );
        Ok(body)
    }

    async fn fetch_history(
        &self,
        user_id: &str,
        credential: Option<&BearerToken>,
    ) -> Result<Vec<HistoryEntry>, RemoteError> {
        let url = self.endpoint(&format!("dream-history/{user_id}"))?;
        let request = Self::with_credential(self.http.get(url), credential);
        let body = Self::send_expecting_body(request).await?;

        let entries: Vec<HistoryEntry> =
            serde_json::from_slice(&body).map_err(|_| RemoteError::NoData)?;
        debug!(count = entries.len(), "fetched history");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> HttpRemoteClient {
        HttpRemoteClient::new(&Config {
            base_url: base_url.to_string(),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoints_join_against_bare_host() {
        let client = client_for("https://example.com");
        assert_eq!(
            client.endpoint("llm-chat").unwrap().as_str(),
            "https://example.com/llm-chat"
        );
        assert_eq!(
            client.endpoint("me/credits").unwrap().as_str(),
            "https://example.com/me/credits"
        );
    }

    #[test]
    fn test_endpoints_preserve_base_path() {
        let client = client_for("https://example.com/api/v1");
        assert_eq!(
            client.endpoint("dream-history/u-1").unwrap().as_str(),
            "https://example.com/api/v1/dream-history/u-1"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(HttpRemoteClient::new(&Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        })
        .is_err());
    }

    #[tokio::test]
    async fn test_fetch_balance_without_credential_short_circuits() {
        let client = client_for("https://example.com");
        // No network call is made; the absent credential is rejected first.
        assert!(matches!(
            client.fetch_balance(None).await,
            Err(RemoteError::Unauthorized)
        ));
    }
}
