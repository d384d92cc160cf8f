//! # batchwire
//!
//! 客户端请求批处理：在时间窗口或数量阈值内合并调用，并按顺序将结果分发回各调用方。
//!
//! Client-side request batching. Individual logical calls are coalesced into
//! one physical batch once a size or time threshold is reached; the batch's
//! ordered per-item outcomes are fanned back out to the original callers.
//!
//! ## Overview
//!
//! - **Size trigger**: a buffer reaching `max_batch_size` is flushed immediately
//! - **Time trigger**: otherwise the buffer is flushed `flush_delay` after the
//!   first call of the cycle
//! - **Positional fan-out**: outcome `i` of a batch resolves call `i`
//! - **Whole-batch failure**: a transport error fails every call in the batch
//! - **No hidden globals**: every [`BatchingQueue`] is an owned, independent value
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batchwire::transport::{HttpTransport, HttpTransportConfig};
//! use batchwire::{BatchingQueue, Method, QueueConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> batchwire::Result<()> {
//!     let transport = HttpTransport::new(HttpTransportConfig::new("http://localhost:3000/api/batch"))?;
//!     let queue = BatchingQueue::new(QueueConfig::from_env(), Arc::new(transport))?;
//!
//!     let user = queue.enqueue("/api/users/1", Method::Get, None);
//!     let posts = queue.enqueue("/api/users/1/posts", Method::Get, None);
//!     println!("{} {}", user.await?, posts.await?);
//!
//!     queue.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Batching queue, buffer, timer and handles |
//! | [`transport`] | Transport trait and the HTTP/closure implementations |
//! | [`types`] | Call descriptors and per-item outcomes |
//! | [`error`] | Error type and structured context |

pub mod batch;
pub mod error;
pub mod transport;
pub mod types;

pub use batch::{BatchingQueue, CallHandle, QueueConfig, QueueStats};
pub use error::{Error, ErrorContext};
pub use transport::{Transport, TransportError};
pub use types::{CallDescriptor, ItemError, ItemOutcome, Method};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
