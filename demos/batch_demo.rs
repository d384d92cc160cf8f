//! Batching Queue Example
//!
//! Shows the two flush triggers and how outcomes come back to callers:
//! - a full buffer flushes immediately
//! - a partial buffer flushes `flush_delay` after its first call
//! - per-item errors stay with their caller, transport errors hit the whole batch
//!
//! Usage:
//!   RUST_LOG=batchwire=debug cargo run --example batch_demo

use anyhow::Result;
use batchwire::transport::{FnTransport, TransportError};
use batchwire::types::{CallDescriptor, ItemOutcome};
use batchwire::{BatchingQueue, Method, QueueConfig};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== batchwire Demo ===\n");

    // Pretends to be a batch endpoint: odd item ids are missing.
    let transport = FnTransport::new(|calls: Vec<CallDescriptor>| async move {
        println!("  -> transport received {} call(s)", calls.len());
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<_, TransportError>(
            calls
                .iter()
                .map(|c| match c.endpoint.rsplit('/').next().and_then(|id| id.parse::<u32>().ok()) {
                    Some(id) if id % 2 == 1 => ItemOutcome::failure(json!({"message": "not found", "id": id})),
                    Some(id) => ItemOutcome::success(json!({"id": id, "method": c.method})),
                    None => ItemOutcome::failure("malformed endpoint"),
                })
                .collect::<Vec<_>>(),
        )
    });

    let queue = BatchingQueue::new(
        QueueConfig::new()
            .with_max_batch_size(4)
            .with_flush_delay(Duration::from_millis(100)),
        Arc::new(transport),
    )?;

    println!("--- Size trigger: 4 calls fill a batch ---");
    let started = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|i| queue.enqueue(format!("/items/{}", i), Method::Get, None))
        .collect();
    for (i, result) in futures::future::join_all(handles).await.into_iter().enumerate() {
        match result {
            Ok(v) => println!("  call {} ok: {}", i, v),
            Err(e) => println!("  call {} failed: {}", i, e),
        }
    }
    println!("  resolved after {:?}\n", started.elapsed());

    println!("--- Time trigger: 2 calls wait for the window ---");
    let started = Instant::now();
    let a = queue.enqueue("/items/10", Method::Get, None);
    let b = queue.enqueue("/items/12", Method::Delete, None);
    println!("  a: {}", a.await?);
    println!("  b: {}", b.await?);
    println!("  resolved after {:?}\n", started.elapsed());

    queue.close().await;
    let late = queue.enqueue("/items/14", Method::Get, None).await;
    println!("--- After close ---\n  late call: {:?}\n", late.err());

    let stats = queue.stats();
    println!(
        "Stats: {} batches (size {}, timer {}), avg size {:.1}, {} ok / {} failed",
        stats.batches,
        stats.size_flushes,
        stats.timer_flushes,
        stats.average_batch_size(),
        stats.succeeded,
        stats.failed
    );
    Ok(())
}
