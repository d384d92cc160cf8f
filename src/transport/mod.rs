//! 传输模块：执行一个批次并返回逐项结果的外部能力。
//!
//! # Transport Module
//!
//! A [`Transport`] receives the ordered descriptors of one batch and answers
//! with one [`ItemOutcome`] per descriptor, in the same order. Failing the
//! call as a whole (network, serialization, unexpected status) is reported as
//! a [`TransportError`] and fails every call in the batch.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Transport`] | Trait implemented by batch executors |
//! | [`FnTransport`] | Adapter turning an async closure into a transport |
//! | [`HttpTransport`] | POSTs the batch as JSON to a batch endpoint |
//! | [`TransportError`] | Whole-batch failure |

mod http;

pub use http::{HttpTransport, HttpTransportConfig};

use crate::types::{CallDescriptor, ItemOutcome};
use async_trait::async_trait;
use std::future::Future;

/// Failure of a batch as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode batch response: {0}")]
    Decode(String),

    #[error("Transport returned {actual} outcomes for a batch of {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Http {
                message: e.to_string(),
            }
        }
    }
}

/// Executes one batch.
///
/// Implementations must return exactly one outcome per descriptor, in input
/// order.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_batch(
        &self,
        calls: Vec<CallDescriptor>,
    ) -> std::result::Result<Vec<ItemOutcome>, TransportError>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Adapter for async closures.
///
/// ```rust
/// use batchwire::transport::{FnTransport, Transport};
/// use batchwire::types::ItemOutcome;
///
/// let echo = FnTransport::new(|calls: Vec<batchwire::types::CallDescriptor>| async move {
///     Ok::<_, batchwire::transport::TransportError>(calls
///         .into_iter()
///         .map(|c| ItemOutcome::success(serde_json::json!(c.endpoint)))
///         .collect::<Vec<_>>())
/// });
/// assert_eq!(echo.name(), "fn");
/// ```
pub struct FnTransport<F> {
    f: F,
}

impl<F> FnTransport<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(Vec<CallDescriptor>) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<Vec<ItemOutcome>, TransportError>> + Send,
{
    async fn send_batch(
        &self,
        calls: Vec<CallDescriptor>,
    ) -> std::result::Result<Vec<ItemOutcome>, TransportError> {
        (self.f)(calls).await
    }

    fn name(&self) -> &'static str {
        "fn"
    }
}
