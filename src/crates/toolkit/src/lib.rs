//! # toolkit - Tools the Model Can Call
//!
//! The tool side of the intent engine: a trait for executable,
//! schema-bound tools, a name-indexed registry the conversation loop
//! dispatches through, and a JSON-schema argument validator whose
//! failures are *recoverable conversation turns* rather than hard errors.
//!
//! # Quick Start
//!
//! ```rust
//! use toolkit::{Tool, ToolRegistry};
//! use async_trait::async_trait;
//! use serde_json::{json, Value};
//!
//! struct LookupOrder;
//!
//! #[async_trait]
//! impl Tool for LookupOrder {
//!     fn name(&self) -> &str {
//!         "lookup_order"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Fetch one order by id"
//!     }
//!
//!     fn schema(&self) -> Value {
//!         json!({
//!             "type": "object",
//!             "properties": {"order_id": {"type": "integer"}},
//!             "required": ["order_id"],
//!             "additionalProperties": false
//!         })
//!     }
//!
//!     async fn execute(&self, args: Value) -> toolkit::Result<Value> {
//!         Ok(json!({"order_id": args["order_id"], "status": "fulfilled"}))
//!     }
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(Box::new(LookupOrder));
//! assert!(registry.has("lookup_order"));
//! ```
//!
//! # Module Organization
//!
//! - [`registry`] - [`Tool`] trait and [`ToolRegistry`]
//! - [`validation`] - schema validation with multi-error reporting
//! - [`error`] - toolkit error types

pub mod error;
pub mod registry;
pub mod validation;

pub use error::{Result, ToolkitError};
pub use registry::{Tool, ToolRegistry};
pub use validation::{validate_arguments, FieldError, ValidationResult};
