//! 请求批处理模块：按数量或时间窗口合并调用，并将结果按位置分发回调用方。
//!
//! # Request Batching Module
//!
//! Callers enqueue individual logical calls and get a [`CallHandle`] back
//! immediately. The [`BatchingQueue`] groups calls into one physical batch as
//! soon as either threshold is met:
//!
//! - **size**: the buffer holds `max_batch_size` calls; flushed at once
//! - **time**: `flush_delay` has passed since the first call of the cycle
//!
//! The batch goes to a [`Transport`](crate::transport::Transport) in enqueue
//! order; outcome `i` resolves call `i`. A transport failure fails every call
//! of that batch with the same error. Nothing is retried.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchingQueue`] | Buffer, timer and dispatch |
//! | [`QueueConfig`] | `flush_delay` and `max_batch_size` |
//! | [`CallHandle`] | Future resolving to one call's outcome |
//! | [`PendingBuffer`] | Insertion-ordered buffer of pending items |
//! | [`FlushTimer`] | Single-slot delayed flush with idempotent cancel |
//! | [`QueueStats`] | Counters snapshot |
//!
//! ## Example
//!
//! ```rust
//! use batchwire::batch::{BatchingQueue, QueueConfig};
//! use batchwire::transport::{FnTransport, TransportError};
//! use batchwire::types::{CallDescriptor, ItemOutcome, Method};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> batchwire::Result<()> {
//! let transport = FnTransport::new(|calls: Vec<CallDescriptor>| async move {
//!     Ok::<_, TransportError>(
//!         calls
//!             .iter()
//!             .map(|c| ItemOutcome::success(serde_json::json!(c.endpoint.len())))
//!             .collect::<Vec<_>>(),
//!     )
//! });
//! let queue = BatchingQueue::new(QueueConfig::new().with_max_batch_size(2), Arc::new(transport))?;
//!
//! let a = queue.enqueue("/users/1", Method::Get, None);
//! let b = queue.enqueue("/users/22", Method::Get, None);
//! assert_eq!(a.await?, serde_json::json!(8));
//! assert_eq!(b.await?, serde_json::json!(9));
//! # Ok(())
//! # }
//! ```

mod buffer;
mod config;
mod pending;
mod queue;
mod stats;
mod timer;

pub use buffer::{BufferAddResult, PendingBuffer};
pub use config::QueueConfig;
pub use pending::{CallHandle, CallState, Completion, PendingCall};
pub use queue::BatchingQueue;
pub use stats::{FlushTrigger, QueueStats};
pub use timer::FlushTimer;
