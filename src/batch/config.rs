//! Queue configuration.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Flush thresholds of a [`BatchingQueue`](super::BatchingQueue), fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawQueueConfig", into = "RawQueueConfig")]
pub struct QueueConfig {
    /// How long an under-threshold buffer may wait, measured from the first
    /// call of the cycle.
    pub flush_delay: Duration,
    /// Buffer length that triggers an immediate flush.
    pub max_batch_size: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            flush_delay: Duration::from_millis(50),
            max_batch_size: 10,
        }
    }
}

impl QueueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flush_delay(mut self, d: Duration) -> Self {
        self.flush_delay = d;
        self
    }

    pub fn with_max_batch_size(mut self, s: usize) -> Self {
        self.max_batch_size = s;
        self
    }

    /// Defaults overridden by `BATCHWIRE_FLUSH_DELAY_MS` and
    /// `BATCHWIRE_MAX_BATCH_SIZE`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(ms) = env::var("BATCHWIRE_FLUSH_DELAY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            cfg.flush_delay = Duration::from_millis(ms);
        }
        if let Some(n) = env::var("BATCHWIRE_MAX_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            cfg.max_batch_size = n;
        }
        cfg
    }

    /// Parse from YAML, e.g. `flush_delay_ms: 20` / `max_batch_size: 25`.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_batch_size == 0 {
            return Err(Error::configuration_with_context(
                "max_batch_size must be at least 1",
                ErrorContext::new()
                    .with_field_path("queue.max_batch_size")
                    .with_source("queue_config"),
            ));
        }
        // Serialized as whole milliseconds.
        if self.flush_delay < Duration::from_millis(1) {
            return Err(Error::configuration_with_context(
                "flush_delay must be at least 1ms",
                ErrorContext::new()
                    .with_field_path("queue.flush_delay_ms")
                    .with_source("queue_config"),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct RawQueueConfig {
    #[serde(default = "default_flush_delay_ms")]
    flush_delay_ms: u64,
    #[serde(default = "default_max_batch_size")]
    max_batch_size: usize,
}

fn default_flush_delay_ms() -> u64 {
    QueueConfig::default().flush_delay.as_millis() as u64
}

fn default_max_batch_size() -> usize {
    QueueConfig::default().max_batch_size
}

impl From<RawQueueConfig> for QueueConfig {
    fn from(raw: RawQueueConfig) -> Self {
        Self {
            flush_delay: Duration::from_millis(raw.flush_delay_ms),
            max_batch_size: raw.max_batch_size,
        }
    }
}

impl From<QueueConfig> for RawQueueConfig {
    fn from(cfg: QueueConfig) -> Self {
        Self {
            flush_delay_ms: cfg.flush_delay.as_millis() as u64,
            max_batch_size: cfg.max_batch_size,
        }
    }
}
