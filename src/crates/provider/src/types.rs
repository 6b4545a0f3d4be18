//! Wire types for the chat-completions protocol.
//!
//! [`ChatMessage`] is the conversation unit sent to the provider;
//! [`ToolCallRequest`] is a structured function invocation the provider
//! requests in lieu of free text; [`ParsedResponse`] is the single
//! normalized shape both parsers produce.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel id for tool calls synthesized from the legacy single
/// `function_call` field.
pub const LEGACY_TOOL_CALL_ID: &str = "legacy";

/// Message role on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and context for the model.
    System,
    /// The admin's input.
    User,
    /// Model output, possibly carrying tool calls.
    Assistant,
    /// A tool execution result, linked back via `tool_call_id`.
    Tool,
}

/// One message in the conversation sent to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role.
    pub role: Role,

    /// Content text.
    pub content: String,

    /// For tool-result messages, the id of the call being answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// For assistant messages, the tool calls the model issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool-result message answering `tool_call_id`.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: None,
        }
    }

    /// Attach tool calls to an assistant message.
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCallRequest>) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

/// The function part of a tool call: name plus a JSON document of
/// arguments, carried as a string exactly as the provider sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Tool name to invoke.
    #[serde(default)]
    pub name: String,

    /// Argument JSON document. During streaming this is assembled by
    /// strict append-only concatenation of fragments.
    #[serde(default)]
    pub arguments: String,
}

/// A structured tool invocation requested by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id; tool results echo it back.
    #[serde(default)]
    pub id: String,

    /// Call type, "function" for every current provider.
    #[serde(default, rename = "type")]
    pub call_type: String,

    /// The requested function and its arguments.
    #[serde(default)]
    pub function: FunctionCall,
}

/// Schema advertisement for one tool, as sent in the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Always "function".
    #[serde(rename = "type")]
    pub kind: String,

    /// Name, description, and parameter schema.
    pub function: ToolFunctionSpec,
}

/// The function body of a [`ToolDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolFunctionSpec {
    /// Tool name.
    pub name: String,

    /// Human/model-facing description.
    pub description: String,

    /// JSON schema of the arguments object.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Build a function tool definition.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            kind: "function".to_string(),
            function: ToolFunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// The transport-agnostic result of parsing one provider response.
///
/// Produced identically by [`crate::parser::parse_response`] and
/// [`crate::stream::parse_stream`]; consumed identically by the
/// conversation loop. `tool_calls` ordering matches the original
/// response/stream index ordering.
#[derive(Debug, Clone, Default)]
pub struct ParsedResponse {
    /// Accumulated assistant content.
    pub content: String,

    /// Finalized tool calls, in index order.
    pub tool_calls: Vec<ToolCallRequest>,

    /// Usage map passed through verbatim when present and well-typed.
    pub usage: Map<String, Value>,

    /// Model name, last seen.
    pub model: Option<String>,

    /// Diagnostic raw buffer: the decoded document (single-shot) or the
    /// first decoded chunks up to a fixed cap (streaming).
    pub raw: Vec<Value>,

    /// Set when the body could not be decoded at all. Parsers flag errors
    /// here instead of returning `Err`.
    pub error: Option<String>,
}

impl ParsedResponse {
    /// A response flagged as undecodable.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Whether the provider requested any tool calls.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = ChatMessage::tool("done", "call_7");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id, Some("call_7".to_string()));

        let msg = ChatMessage::user("hi");
        assert_eq!(msg.role, Role::User);
        assert!(msg.tool_call_id.is_none());
    }

    #[test]
    fn test_role_serialization_is_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_tool_call_id_omitted_when_absent() {
        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert!(json.get("tool_call_id").is_none());
        assert!(json.get("tool_calls").is_none());
    }

    #[test]
    fn test_tool_call_request_deserializes_with_defaults() {
        let call: ToolCallRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(call.id, "");
        assert_eq!(call.function.arguments, "");
    }

    #[test]
    fn test_malformed_response_is_empty_but_flagged() {
        let parsed = ParsedResponse::malformed("bad json");
        assert!(parsed.error.is_some());
        assert!(parsed.content.is_empty());
        assert!(!parsed.has_tool_calls());
    }
}
