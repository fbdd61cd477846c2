//! Single-shot HTTP probe.
//!
//! # Responsibilities
//! - Perform one GET against the monitored endpoint
//! - Measure time to response headers
//! - Read the body fully so the connection can be released

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

const USER_AGENT: &str = concat!("health-checker/", env!("CARGO_PKG_VERSION"));

/// What came back from one probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: Bytes,
    pub elapsed: Duration,
}

impl ProbeResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Failure to get any response at all.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("reading response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl TransportError {
    fn from_request(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(e)
        }
    }
}

#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> Result<ProbeResponse, TransportError>;
}

/// Probe backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    url: String,
}

impl HttpProber {
    /// Build a prober for `url`. `timeout` bounds the whole request when set.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(0);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self) -> Result<ProbeResponse, TransportError> {
        let start = Instant::now();
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(TransportError::from_request)?;
        let elapsed = start.elapsed();

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Body(e)
            }
        })?;

        Ok(ProbeResponse {
            status,
            body,
            elapsed,
        })
    }
}
