// ABOUTME: Single time probe against a server time endpoint
// ABOUTME: One bounded, cancellable HTTP round trip yielding a local/server time sample

use crate::protocol::messages::TimeResponse;
use crate::sync::clock::Clock;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Which endpoint produced a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSource {
    /// Same-origin time endpoint
    Local,
    /// Reservation service time endpoint
    Remote,
}

impl ProbeSource {
    /// Short name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeSource::Local => "local",
            ProbeSource::Remote => "remote",
        }
    }
}

impl fmt::Display for ProbeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single probe did not produce a sample
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Connection, DNS or protocol failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),

    /// No complete answer within the probe timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The surrounding synchronization was cancelled
    #[error("cancelled")]
    Cancelled,

    /// Body was not a time response
    #[error("invalid time response: {0}")]
    InvalidBody(String),
}

/// An endpoint to probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    /// Full URL of the time endpoint
    pub url: String,
    /// Local or remote
    pub source: ProbeSource,
}

impl ProbeTarget {
    /// Target the same-origin time endpoint
    pub fn local(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: ProbeSource::Local,
        }
    }

    /// Target the remote service, given its API base URL
    pub fn remote(api_base: &str) -> Self {
        Self {
            url: format!("{}/time/server-time", api_base.trim_end_matches('/')),
            source: ProbeSource::Remote,
        }
    }
}

/// Local timestamps around a request and the server time it reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSample {
    /// Local milliseconds just before the request
    pub t0: i64,
    /// Local milliseconds once the response arrived
    pub t1: i64,
    /// Server milliseconds from the response body
    pub server_ms: i64,
}

/// HTTP time probe
#[derive(Debug, Clone)]
pub struct TimeProbe {
    http: reqwest::Client,
    timeout: Duration,
}

impl TimeProbe {
    /// Create a probe with the given per-request timeout
    pub fn new(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one probe
    ///
    /// The request is dropped (and so aborted) when either the probe timeout
    /// elapses or `cancel` fires.
    pub async fn probe(
        &self,
        target: &ProbeTarget,
        clock: &dyn Clock,
        cancel: &CancellationToken,
    ) -> Result<ProbeSample, ProbeError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProbeError::Cancelled),
            res = tokio::time::timeout(self.timeout, self.round_trip(target, clock)) => {
                res.unwrap_or(Err(ProbeError::Timeout(self.timeout)))
            }
        }
    }

    async fn round_trip(
        &self,
        target: &ProbeTarget,
        clock: &dyn Clock,
    ) -> Result<ProbeSample, ProbeError> {
        let t0 = clock.now_millis();
        let response = self
            .http
            .get(&target.url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status));
        }
        let t1 = clock.now_millis();

        let body = response.bytes().await?;
        let server_ms = parse_server_time(&body)?;

        Ok(ProbeSample { t0, t1, server_ms })
    }
}

/// Extract the authoritative timestamp from a time response body
pub(crate) fn parse_server_time(body: &[u8]) -> Result<i64, ProbeError> {
    let response: TimeResponse =
        serde_json::from_slice(body).map_err(|e| ProbeError::InvalidBody(e.to_string()))?;
    if DateTime::<Utc>::from_timestamp_millis(response.timestamp).is_none() {
        return Err(ProbeError::InvalidBody(format!(
            "timestamp {} out of range",
            response.timestamp
        )));
    }
    Ok(response.timestamp)
}
