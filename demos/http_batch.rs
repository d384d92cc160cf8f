//! HTTP Batch Endpoint Example
//!
//! Sends queued calls to a batch endpoint that accepts
//! `{"requests": [...]}` and answers `{"results": [...]}`.
//!
//! Usage:
//!   BATCHWIRE_URL=http://localhost:3000/api/batch cargo run --example http_batch
//!
//! Queue thresholds honour `BATCHWIRE_FLUSH_DELAY_MS` and `BATCHWIRE_MAX_BATCH_SIZE`.

use anyhow::Result;
use batchwire::transport::{HttpTransport, HttpTransportConfig};
use batchwire::{BatchingQueue, Method, QueueConfig};
use serde_json::json;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .with_target(false)
        .try_init();

    let url = env::var("BATCHWIRE_URL").unwrap_or_else(|_| "http://localhost:3000/api/batch".into());
    let mut config = HttpTransportConfig::new(&url);
    if let Ok(token) = env::var("BATCHWIRE_TOKEN") {
        config = config.with_bearer_token(token);
    }

    let queue = BatchingQueue::new(QueueConfig::from_env(), Arc::new(HttpTransport::new(config)?))?;
    println!("Batching to {} with {:?}", url, queue.config());

    let calls = vec![
        queue.enqueue("/api/users/1", Method::Get, None),
        queue.enqueue("/api/users/1/posts", Method::Get, None),
        queue.enqueue("/api/events", Method::Post, Some(json!({"type": "page_view"}))),
    ];
    for (i, call) in calls.into_iter().enumerate() {
        match call.await {
            Ok(data) => println!("[{}] {}", i, data),
            Err(e) if e.is_transport() => println!("[{}] batch failed: {}", i, e),
            Err(e) => println!("[{}] call failed: {}", i, e),
        }
    }

    queue.close().await;
    Ok(())
}
