//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use batchwire::transport::{Transport, TransportError};
use batchwire::types::{CallDescriptor, ItemOutcome};
use mockito::{Mock, Server, ServerGuard};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

type Responder =
    Box<dyn Fn(&[CallDescriptor]) -> Result<Vec<ItemOutcome>, TransportError> + Send + Sync>;

/// One batch as the transport received it.
#[derive(Debug, Clone)]
pub struct RecordedBatch {
    /// Offset from transport creation (Tokio clock, so it follows paused time).
    pub at: Duration,
    pub calls: Vec<CallDescriptor>,
}

impl RecordedBatch {
    pub fn endpoints(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.endpoint.as_str()).collect()
    }
}

/// Transport that records every batch and answers through a closure.
pub struct RecordingTransport {
    start: Instant,
    latency: Option<Duration>,
    batches: Mutex<Vec<RecordedBatch>>,
    responder: Responder,
}

impl RecordingTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&[CallDescriptor]) -> Result<Vec<ItemOutcome>, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            start: Instant::now(),
            latency: None,
            batches: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    pub fn with_latency<F>(latency: Duration, responder: F) -> Arc<Self>
    where
        F: Fn(&[CallDescriptor]) -> Result<Vec<ItemOutcome>, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            start: Instant::now(),
            latency: Some(latency),
            batches: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Answers every call with its own endpoint as data.
    pub fn echo() -> Arc<Self> {
        Self::new(|calls| {
            Ok(calls
                .iter()
                .map(|c| ItemOutcome::success(serde_json::json!(c.endpoint)))
                .collect())
        })
    }

    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_batch(
        &self,
        calls: Vec<CallDescriptor>,
    ) -> Result<Vec<ItemOutcome>, TransportError> {
        self.batches.lock().unwrap().push(RecordedBatch {
            at: self.start.elapsed(),
            calls: calls.clone(),
        });
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        (self.responder)(&calls)
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Mock batch endpoint backed by mockito.
pub struct MockBatchServer {
    pub server: ServerGuard,
    pub url: String,
}

impl MockBatchServer {
    pub const PATH: &'static str = "/api/batch";

    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let url = format!("{}{}", server.url(), Self::PATH);
        Self { server, url }
    }

    /// Expect one batch whose envelope equals `request` and answer with `reply`.
    pub async fn expect_batch(
        &mut self,
        request: serde_json::Value,
        status: usize,
        reply: &str,
    ) -> Mock {
        self.server
            .mock("POST", Self::PATH)
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(request))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(reply)
            .create_async()
            .await
    }
}
