//! Per-item outcomes reported by a transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque error payload the transport attached to a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemError {
    payload: Value,
}

impl ItemError {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Human readable message: the payload itself when it is a string, its
    /// `message` field when it is an object carrying one, else its JSON text.
    pub fn message(&self) -> String {
        match &self.payload {
            Value::String(s) => s.clone(),
            Value::Object(map) => match map.get("message") {
                Some(Value::String(s)) => s.clone(),
                _ => self.payload.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ItemError {}

impl From<Value> for ItemError {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}

impl From<&str> for ItemError {
    fn from(s: &str) -> Self {
        Self::new(Value::String(s.to_string()))
    }
}

impl From<String> for ItemError {
    fn from(s: String) -> Self {
        Self::new(Value::String(s))
    }
}

/// Result of one item within a batch.
///
/// Wire form is `{"data": ...}` or `{"error": ...}`. A non-null `error` wins
/// over `data`; an object with neither is a success carrying `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOutcome", into = "RawOutcome")]
pub enum ItemOutcome {
    Success(Value),
    Failure(ItemError),
}

impl ItemOutcome {
    pub fn success(data: Value) -> Self {
        ItemOutcome::Success(data)
    }

    pub fn failure(error: impl Into<ItemError>) -> Self {
        ItemOutcome::Failure(error.into())
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failure(_))
    }

    pub fn into_result(self) -> Result<Value, ItemError> {
        match self {
            ItemOutcome::Success(v) => Ok(v),
            ItemOutcome::Failure(e) => Err(e),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawOutcome {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<Value>,
}

impl From<RawOutcome> for ItemOutcome {
    fn from(raw: RawOutcome) -> Self {
        match raw.error {
            Some(e) => ItemOutcome::Failure(ItemError::new(e)),
            None => ItemOutcome::Success(raw.data),
        }
    }
}

impl From<ItemOutcome> for RawOutcome {
    fn from(outcome: ItemOutcome) -> Self {
        match outcome {
            ItemOutcome::Success(data) => RawOutcome { data, error: None },
            ItemOutcome::Failure(e) => RawOutcome {
                data: Value::Null,
                error: Some(e.payload),
            },
        }
    }
}
