use reqwest::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::types::{ChatQuery, RawReply};
use inshort_core::{Error, Result};

/// The remote summarization service, as seen by the chat client
///
/// Implementations return the raw status and body text; interpreting them is the caller's job.
#[async_trait::async_trait]
pub trait SummaryProvider: Send + Sync {
    async fn query(&self, query: &str) -> Result<RawReply>;
}

/// HTTP implementation: `POST <base_url>/api/chat` with a JSON body
pub struct HttpSummaryProvider {
    client: HttpClient,
    endpoint: String,
}

impl HttpSummaryProvider {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured client (proxies, TLS roots, ...)
    pub fn with_client(client: HttpClient, base_url: &str) -> Self {
        Self { client, endpoint: chat_endpoint(base_url) }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the outbound request without sending it
    pub fn build_request(&self, query: &str) -> Result<reqwest::Request> {
        self.client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&ChatQuery::new(query))
            .build()
            .map_err(|e| Error::Transport(format!("invalid request: {}", e)))
    }
}

#[async_trait::async_trait]
impl SummaryProvider for HttpSummaryProvider {
    async fn query(&self, query: &str) -> Result<RawReply> {
        let request = self.build_request(query)?;
        tracing::debug!(endpoint = %self.endpoint, chars = query.chars().count(), "sending chat query");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| Error::Transport(format!("chat request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

        tracing::debug!(status, bytes = body.len(), "chat response received");
        Ok(RawReply { status, body })
    }
}

/// `<base>/api/chat`, tolerating trailing slashes on the base
pub fn chat_endpoint(base_url: &str) -> String {
    format!("{}/api/chat", base_url.trim_end_matches('/'))
}
