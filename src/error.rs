use crate::transport::TransportError;
use crate::types::ItemError;
use thiserror::Error;

/// Structured error context for configuration and validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.max_batch_size")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Component that raised the error (e.g., "queue_config", "batching_queue")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for batchwire.
///
/// Cloneable: a single transport failure is delivered to every caller in the
/// batch it belonged to.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Batch transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Call failed: {0}")]
    Item(#[from] ItemError),

    #[error("Batching queue is closed")]
    QueueClosed,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// True when the whole batch failed rather than this call alone.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// The per-item error payload, if the transport reported one for this call.
    pub fn item_error(&self) -> Option<&ItemError> {
        match self {
            Error::Item(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_rendered_in_display() {
        let err = Error::configuration_with_context(
            "max_batch_size must be at least 1",
            ErrorContext::new()
                .with_field_path("config.max_batch_size")
                .with_source("queue_config"),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("Configuration error: max_batch_size must be at least 1"));
        assert!(msg.contains("field: config.max_batch_size"));
        assert!(msg.contains("source: queue_config"));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("config.max_batch_size")
        );
    }

    #[test]
    fn test_empty_context_renders_nothing() {
        let err = Error::validation_with_context("bad", ErrorContext::default());
        assert_eq!(err.to_string(), "Validation error: bad");
    }

    #[test]
    fn test_classification_helpers() {
        let transport: Error = TransportError::Other("boom".into()).into();
        assert!(transport.is_transport());
        assert!(transport.item_error().is_none());
        assert!(transport.context().is_none());

        let item: Error = ItemError::new(serde_json::json!("x")).into();
        assert!(!item.is_transport());
        assert_eq!(item.item_error().map(|e| e.message()), Some("x".to_string()));
    }
}
