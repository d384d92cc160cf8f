//! Queue counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// What started a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// Buffer reached `max_batch_size`.
    Size,
    /// `flush_delay` elapsed since the first call of the cycle.
    Timer,
    /// Explicit `flush()` or `close()`.
    Manual,
}

/// Point-in-time snapshot of a queue's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub enqueued: u64,
    pub rejected: u64,
    pub batches: u64,
    pub batched_calls: u64,
    pub size_flushes: u64,
    pub timer_flushes: u64,
    pub manual_flushes: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub transport_failures: u64,
}

impl QueueStats {
    pub fn average_batch_size(&self) -> f64 { if self.batches == 0 { 0.0 } else { self.batched_calls as f64 / self.batches as f64 } }
}

#[derive(Debug, Default)]
pub(crate) struct AtomicStats { pub enqueued: AtomicU64, pub rejected: AtomicU64, pub batches: AtomicU64, pub batched_calls: AtomicU64, pub size_flushes: AtomicU64, pub timer_flushes: AtomicU64, pub manual_flushes: AtomicU64, pub succeeded: AtomicU64, pub failed: AtomicU64, pub transport_failures: AtomicU64 }

impl AtomicStats {
    pub fn bump(counter: &AtomicU64, n: u64) { counter.fetch_add(n, Ordering::Relaxed); }

    pub fn record_flush(&self, trigger: FlushTrigger, size: usize) {
        Self::bump(&self.batches, 1);
        Self::bump(&self.batched_calls, size as u64);
        match trigger {
            FlushTrigger::Size => Self::bump(&self.size_flushes, 1),
            FlushTrigger::Timer => Self::bump(&self.timer_flushes, 1),
            FlushTrigger::Manual => Self::bump(&self.manual_flushes, 1),
        }
    }

    pub fn to_stats(&self) -> QueueStats {
        QueueStats {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            batched_calls: self.batched_calls.load(Ordering::Relaxed),
            size_flushes: self.size_flushes.load(Ordering::Relaxed),
            timer_flushes: self.timer_flushes.load(Ordering::Relaxed),
            manual_flushes: self.manual_flushes.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_flush_by_trigger() {
        let stats = AtomicStats::default();
        stats.record_flush(FlushTrigger::Size, 4);
        stats.record_flush(FlushTrigger::Timer, 1);
        stats.record_flush(FlushTrigger::Manual, 1);

        let snap = stats.to_stats();
        assert_eq!(snap.batches, 3);
        assert_eq!(snap.batched_calls, 6);
        assert_eq!((snap.size_flushes, snap.timer_flushes, snap.manual_flushes), (1, 1, 1));
        assert!((snap.average_batch_size() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_of_empty_stats() {
        assert_eq!(QueueStats::default().average_batch_size(), 0.0);
    }
}
