//! Single-slot delayed flush timer.

use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug)]
struct Armed {
    generation: u64,
    task: JoinHandle<()>,
}

/// At most one outstanding scheduled flush.
///
/// Every arming gets a new generation. A fired task must claim its slot with
/// [`FlushTimer::disarm_if`]; a task whose generation no longer matches was
/// cancelled or superseded and must do nothing.
#[derive(Debug, Default)]
pub struct FlushTimer {
    armed: Option<Armed>,
    generation: u64,
}

impl FlushTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Spawn `on_fire(generation)` after `delay`. Replaces (and cancels) any
    /// timer already armed.
    pub fn arm<F, Fut>(&mut self, runtime: &Handle, delay: Duration, on_fire: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(generation).await;
        });
        self.armed = Some(Armed { generation, task });
        generation
    }

    /// Abort the armed timer, if any. Idempotent.
    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some(armed) => {
                armed.task.abort();
                true
            }
            None => false,
        }
    }

    /// Called from a fired timer task: clears the slot without aborting the
    /// caller and returns true only if `generation` is the one still armed.
    pub fn disarm_if(&mut self, generation: u64) -> bool {
        match &self.armed {
            Some(armed) if armed.generation == generation => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for FlushTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
