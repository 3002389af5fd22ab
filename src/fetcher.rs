use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::dates::{normalize_dates, DigestDate};
use crate::digest::Digest;
use crate::error::{upstream_message, FetchError};

/// Default bound on a single fetch, covering headers and body.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the digest API.
///
/// Speaks the upstream surface directly: `GET <base>/dates` and
/// `GET <base>/daily_digest?date=...`. Every call runs under one explicit
/// timeout, so a stalled upstream becomes [`FetchError::Timeout`] instead
/// of a hang.
pub struct DigestClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl DigestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("DailyDigest/1.0 (digest reader)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches the list of navigable dates.
    ///
    /// The payload must be a JSON array of `YYYY-MM-DD` strings; the result
    /// is ascending and deduplicated. An empty list is a valid outcome (no
    /// digests published yet) and is left to the caller to surface.
    pub async fn available_dates(&self) -> Result<Vec<DigestDate>, FetchError> {
        let url = format!("{}/dates", self.base_url);
        debug!("Fetching available dates from {}", url);
        let raw = self.bounded(self.fetch_dates_inner(&url)).await?;
        normalize_dates(raw)
    }

    /// Fetches the digest payload for one date.
    pub async fn daily_digest(&self, date: &DigestDate) -> Result<Digest, FetchError> {
        let url = format!("{}/daily_digest", self.base_url);
        debug!("Fetching digest for {} from {}", date, url);
        self.bounded(self.fetch_digest_inner(&url, date)).await
    }

    async fn fetch_dates_inner(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        response.json::<Vec<String>>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Validation(format!("dates payload is not an array of strings: {e}"))
            } else {
                FetchError::Network(e)
            }
        })
    }

    async fn fetch_digest_inner(&self, url: &str, date: &DigestDate) -> Result<Digest, FetchError> {
        let response = self
            .client
            .get(url)
            .query(&[("date", date.as_str())])
            .send()
            .await
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        response.json::<Digest>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Validation(format!(
                    "digest payload does not match the expected shape: {e}"
                ))
            } else {
                FetchError::Network(e)
            }
        })
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }
}

/// Builds [`FetchError::Upstream`] from a non-success response, carrying
/// whatever error text the upstream put in the body.
async fn upstream_error(response: reqwest::Response) -> FetchError {
    let status = response.status().as_u16();
    let message = match response.text().await {
        Ok(body) => upstream_message(status, &body),
        Err(_) => format!("Digest service returned status {status}"),
    };
    FetchError::Upstream { status, message }
}
