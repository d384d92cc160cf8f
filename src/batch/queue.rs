//! The batching queue.

use super::buffer::{BufferAddResult, PendingBuffer};
use super::config::QueueConfig;
use super::pending::{CallHandle, Completion, PendingCall};
use super::stats::{AtomicStats, FlushTrigger, QueueStats};
use super::timer::FlushTimer;
use crate::transport::{Transport, TransportError};
use crate::types::{CallDescriptor, Method};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;
use tracing::{debug, warn};
use uuid::Uuid;

struct QueueState {
    buffer: PendingBuffer<PendingCall>,
    timer: FlushTimer,
    closed: bool,
}

struct Inner {
    config: QueueConfig,
    transport: Arc<dyn Transport>,
    runtime: Handle,
    state: Mutex<QueueState>,
    stats: AtomicStats,
}

/// Coalesces individual calls into batches and fans the batch's outcomes back
/// to each caller.
///
/// A batch is sent as soon as the buffer holds `max_batch_size` calls, or
/// `flush_delay` after the first call of the cycle, whichever comes first.
/// Clones share the same queue; independent queues are independent values.
#[derive(Clone)]
pub struct BatchingQueue {
    inner: Arc<Inner>,
}

impl BatchingQueue {
    /// Build a queue bound to the current Tokio runtime.
    pub fn new(config: QueueConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            Error::configuration_with_context(
                "BatchingQueue must be created inside a Tokio runtime",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("batching_queue"),
            )
        })?;
        Self::with_runtime(config, transport, runtime)
    }

    /// Build a queue whose timers and dispatches run on `runtime`.
    pub fn with_runtime(
        config: QueueConfig,
        transport: Arc<dyn Transport>,
        runtime: Handle,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                transport,
                runtime,
                state: Mutex::new(QueueState {
                    buffer: PendingBuffer::new(),
                    timer: FlushTimer::new(),
                    closed: false,
                }),
                stats: AtomicStats::default(),
            }),
        })
    }

    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    pub fn transport_name(&self) -> &'static str {
        self.inner.transport.name()
    }

    /// Queue one logical call. Never blocks on the transport.
    pub fn enqueue(
        &self,
        endpoint: impl Into<String>,
        method: Method,
        body: Option<Value>,
    ) -> CallHandle {
        self.submit(CallDescriptor {
            endpoint: endpoint.into(),
            method,
            body,
        })
    }

    /// Queue a prepared descriptor. An empty endpoint is rejected without
    /// touching the buffer.
    pub fn submit(&self, descriptor: CallDescriptor) -> CallHandle {
        if descriptor.endpoint.trim().is_empty() {
            AtomicStats::bump(&self.inner.stats.rejected, 1);
            return CallHandle::rejected(Error::validation_with_context(
                "endpoint must not be empty",
                ErrorContext::new()
                    .with_field_path("call.endpoint")
                    .with_source("batching_queue"),
            ));
        }
        let inner = &self.inner;
        let (batch, handle) = {
            let mut st = inner.lock_state();
            if st.closed {
                drop(st);
                AtomicStats::bump(&inner.stats.rejected, 1);
                return CallHandle::rejected(Error::QueueClosed);
            }
            let (call, handle) = PendingCall::new(descriptor);
            AtomicStats::bump(&inner.stats.enqueued, 1);

            match st.buffer.push(call, inner.config.max_batch_size) {
                BufferAddResult::ShouldFlush { count } => {
                    st.timer.cancel();
                    debug!(count, "size threshold reached");
                    (Some(st.buffer.drain()), handle)
                }
                BufferAddResult::Added { count } => {
                    if !st.timer.is_armed() {
                        debug_assert_eq!(count, 1);
                        let weak: Weak<Inner> = Arc::downgrade(inner);
                        st.timer.arm(&inner.runtime, inner.config.flush_delay, move |generation| {
                            async move {
                                if let Some(inner) = weak.upgrade() {
                                    inner.flush_timed(generation).await;
                                }
                            }
                        });
                        let delay_ms = inner.config.flush_delay.as_millis() as u64;
                        debug!(delay_ms, "flush timer armed");
                    }
                    (None, handle)
                }
            }
        };

        if let Some(batch) = batch {
            let inner = Arc::clone(inner);
            self.inner.runtime.spawn(async move {
                inner.dispatch(batch, FlushTrigger::Size).await;
            });
        }
        handle
    }

    /// Send whatever is buffered now and wait for the batch to resolve.
    /// No-op on an empty buffer.
    ///
    /// The batch runs on its own task, so dropping this future early does not
    /// abandon the calls it sent.
    pub async fn flush(&self) {
        let batch = {
            let mut st = self.inner.lock_state();
            st.timer.cancel();
            st.buffer.drain()
        };
        if batch.is_empty() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let task = self.inner.runtime.spawn(async move {
            inner.dispatch(batch, FlushTrigger::Manual).await;
        });
        if let Err(e) = task.await {
            warn!(error = %e, "manual flush task did not complete");
        }
    }

    /// Reject further calls and drain the buffer.
    ///
    /// Calls already in flight complete normally. Idempotent.
    pub async fn close(&self) {
        {
            let mut st = self.inner.lock_state();
            if !st.closed {
                debug!(pending = st.buffer.len(), "closing batching queue");
            }
            st.closed = true;
        }
        self.flush().await;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock_state().closed
    }

    /// Calls buffered and not yet handed to the transport.
    pub fn pending_len(&self) -> usize {
        self.inner.lock_state().buffer.len()
    }

    pub fn is_timer_armed(&self) -> bool {
        self.inner.lock_state().timer.is_armed()
    }

    pub fn stats(&self) -> QueueStats {
        self.inner.stats.to_stats()
    }
}

impl std::fmt::Debug for BatchingQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchingQueue")
            .field("config", &self.inner.config)
            .field("transport", &self.inner.transport.name())
            .field("pending", &self.pending_len())
            .finish()
    }
}

impl Inner {
    // The guarded state is updated in single steps, so a poisoned lock still
    // holds a consistent buffer.
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn flush_timed(&self, generation: u64) {
        let batch = {
            let mut st = self.lock_state();
            if !st.timer.disarm_if(generation) {
                debug!(generation, "stale flush timer ignored");
                return;
            }
            st.buffer.drain()
        };
        self.dispatch(batch, FlushTrigger::Timer).await;
    }

    async fn dispatch(&self, batch: Vec<PendingCall>, trigger: FlushTrigger) {
        if batch.is_empty() {
            return;
        }
        let size = batch.len();
        let batch_id = Uuid::new_v4();
        self.stats.record_flush(trigger, size);

        let (descriptors, mut completions): (Vec<CallDescriptor>, Vec<Completion>) =
            batch.into_iter().map(PendingCall::into_parts).unzip();

        debug!(
            %batch_id,
            size,
            ?trigger,
            transport = self.transport.name(),
            "dispatching batch"
        );

        match self.transport.send_batch(descriptors).await {
            Ok(outcomes) if outcomes.len() == size => {
                for (completion, outcome) in completions.iter_mut().zip(outcomes) {
                    match outcome.into_result() {
                        Ok(data) => {
                            completion.succeed(data);
                            AtomicStats::bump(&self.stats.succeeded, 1);
                        }
                        Err(e) => {
                            completion.fail(Error::Item(e));
                            AtomicStats::bump(&self.stats.failed, 1);
                        }
                    }
                }
                debug!(%batch_id, "batch resolved");
            }
            Ok(outcomes) => {
                warn!(
                    %batch_id,
                    expected = size,
                    actual = outcomes.len(),
                    "outcome count does not match batch size; failing whole batch"
                );
                self.fail_all(
                    &mut completions,
                    TransportError::LengthMismatch {
                        expected: size,
                        actual: outcomes.len(),
                    },
                );
            }
            Err(e) => {
                warn!(%batch_id, size, error = %e, "batch transport failed");
                self.fail_all(&mut completions, e);
            }
        }
    }

    fn fail_all(&self, completions: &mut [Completion], error: TransportError) {
        AtomicStats::bump(&self.stats.transport_failures, 1);
        for completion in completions.iter_mut() {
            completion.fail(Error::Transport(error.clone()));
        }
        AtomicStats::bump(&self.stats.failed, completions.len() as u64);
    }
}
