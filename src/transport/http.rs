use super::{Transport, TransportError};
use crate::types::{CallDescriptor, ItemOutcome};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::Proxy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use tracing::debug;

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub url: String,
    pub timeout: Duration,
    pub bearer_token: Option<String>,
    pub headers: HashMap<String, String>,
    pub proxy_url: Option<String>,
}

impl HttpTransportConfig {
    /// Defaults are env-overridable: `BATCHWIRE_HTTP_TIMEOUT_SECS` (30) and
    /// `BATCHWIRE_PROXY_URL` (no proxy when unset).
    pub fn new(url: impl Into<String>) -> Self {
        let timeout_secs = env::var("BATCHWIRE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        Self {
            url: url.into(),
            timeout: Duration::from_secs(timeout_secs),
            bearer_token: None,
            headers: HashMap::new(),
            proxy_url: env::var("BATCHWIRE_PROXY_URL").ok(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[derive(Serialize)]
struct BatchEnvelope<'a> {
    requests: &'a [CallDescriptor],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchReply {
    Bare(Vec<ItemOutcome>),
    Wrapped { results: Vec<ItemOutcome> },
}

impl BatchReply {
    fn into_outcomes(self) -> Vec<ItemOutcome> {
        match self {
            BatchReply::Bare(results) => results,
            BatchReply::Wrapped { results } => results,
        }
    }
}

/// Sends a batch as one `POST` to a batch endpoint.
///
/// Request body: `{"requests": [{"endpoint", "method", "body"?}, ...]}`.
/// Accepted replies: `{"results": [...]}` or a bare array of outcomes.
pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        url::Url::parse(&config.url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid batch endpoint url: {}", e),
                ErrorContext::new()
                    .with_field_path("http.url")
                    .with_details(config.url.clone())
                    .with_source("http_transport"),
            )
        })?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        // Only an explicitly configured proxy is used; system proxy variables are ignored.
        builder = match config.proxy_url.as_deref().map(Proxy::all) {
            Some(Ok(proxy)) => builder.proxy(proxy),
            Some(Err(e)) => {
                return Err(Error::configuration_with_context(
                    format!("invalid proxy url: {}", e),
                    ErrorContext::new()
                        .with_field_path("http.proxy_url")
                        .with_source("http_transport"),
                ))
            }
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_batch(
        &self,
        calls: Vec<CallDescriptor>,
    ) -> std::result::Result<Vec<ItemOutcome>, TransportError> {
        debug!(url = %self.config.url, items = calls.len(), "posting batch");

        let mut req = self
            .client
            .post(&self.config.url)
            .json(&BatchEnvelope { requests: &calls });

        if let Some(token) = &self.config.bearer_token {
            req = req.bearer_auth(token);
        }
        for (k, v) in &self.config.headers {
            req = req.header(k, v);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let reply: BatchReply =
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(reply.into_outcomes())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
