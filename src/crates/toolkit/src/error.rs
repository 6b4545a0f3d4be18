//! Error types for tool dispatch.

use thiserror::Error;

/// Result type for toolkit operations.
pub type Result<T> = std::result::Result<T, ToolkitError>;

/// Errors that can occur when dispatching tools.
#[derive(Debug, Error)]
pub enum ToolkitError {
    /// No tool registered under the requested name.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The tool itself failed.
    #[error("Tool execution failed: {0}")]
    Execution(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
