//! The stable result envelope returned by every engine invocation.

use crate::error::EngineError;
use intent::Intent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What one engine invocation produced, in a shape that is identical
/// across handlers and transport modes.
///
/// `status` is HTTP-flavored so a thin admin endpoint can forward it
/// directly. `data` always carries `intent`; successful invocations add
/// `message`, failures add `error` and `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResult {
    /// Whether the invocation produced a usable answer.
    pub success: bool,

    /// HTTP-style status class.
    pub status: u16,

    /// Envelope payload: `intent`, `message` or `error`, plus handler
    /// extras such as `turns` and `usage`.
    pub data: Map<String, Value>,
}

impl EngineResult {
    /// A successful result carrying the final assistant message.
    pub fn ok(intent: Intent, message: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("intent".to_string(), Value::String(intent.as_str().to_string()));
        data.insert("message".to_string(), Value::String(message.into()));

        Self {
            success: true,
            status: 200,
            data,
        }
    }

    /// A failed result derived from a fatal engine error.
    pub fn from_error(intent: Intent, error: &EngineError) -> Self {
        let mut data = Map::new();
        data.insert("intent".to_string(), Value::String(intent.as_str().to_string()));
        data.insert("error".to_string(), Value::String(error.to_string()));
        data.insert("code".to_string(), Value::String(error.code().to_string()));
        data.insert("retryable".to_string(), Value::Bool(error.is_retryable()));

        Self {
            success: false,
            status: error.status_code(),
            data,
        }
    }

    /// Attach an extra data field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// The resolved intent's wire form.
    pub fn intent(&self) -> Option<&str> {
        self.data.get("intent").and_then(Value::as_str)
    }

    /// The final assistant message, when the invocation succeeded.
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }
}
