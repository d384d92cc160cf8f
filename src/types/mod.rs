//! 数据类型模块：批处理调用描述符与逐项结果。
//!
//! # Types Module
//!
//! Strongly-typed representations of what travels through a batch: the
//! descriptor for each logical call and the outcome the transport reports for
//! it.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Method`] | Request verb of a logical call |
//! | [`CallDescriptor`] | `{endpoint, method, body}` handed to the transport |
//! | [`ItemOutcome`] | Per-item result: data or error marker |
//! | [`ItemError`] | Opaque per-item error payload |
//!
//! ## Wire form
//!
//! ```rust
//! use batchwire::types::{CallDescriptor, ItemOutcome, Method};
//!
//! let call = CallDescriptor::new("/api/users/1", Method::Get);
//! assert_eq!(
//!     serde_json::to_value(&call).unwrap(),
//!     serde_json::json!({"endpoint": "/api/users/1", "method": "GET"})
//! );
//!
//! let outcome: ItemOutcome = serde_json::from_str(r#"{"error": "not found"}"#).unwrap();
//! assert!(outcome.is_failure());
//! ```

pub mod call;
pub mod outcome;

pub use call::{CallDescriptor, Method};
pub use outcome::{ItemError, ItemOutcome};
