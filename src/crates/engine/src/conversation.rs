//! The bounded multi-turn tool-calling loop.
//!
//! One turn is: send the conversation plus advertised tool schemas, parse
//! the response, and either finish on plain content or execute the
//! requested tool calls and feed their results back as `tool` messages.
//! The loop is bounded by the configured turn budget; turns spent on
//! validation failures count against it the same as productive ones, so a
//! model stuck re-sending bad arguments cannot spin forever.

use crate::error::EngineError;
use provider::parser::parse_response;
use provider::stream::parse_stream;
use provider::{
    ChatMessage, ChatRequest, ChatTransport, ParsedResponse, ProviderConfig, ToolCallRequest,
    ToolDefinition,
};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use toolkit::{validate_arguments, FieldError, ToolRegistry, ValidationResult};
use tracing::{debug, warn};

/// Cooperative cancellation handle, checked at every turn boundary.
///
/// Cancellation is prompt but not preemptive: a turn already in flight
/// completes, and no further provider or tool calls are made after the
/// flag is observed.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// What a completed conversation produced.
#[derive(Debug, Clone)]
pub struct ConversationOutcome {
    /// The model's final plain-content answer.
    pub message: String,

    /// Turns consumed, including tool-call and validation-failure turns.
    pub turns: usize,

    /// Accumulated provider usage counters (numeric values summed across
    /// turns, non-numeric values last-seen).
    pub usage: Map<String, Value>,
}

/// Runs the tool-calling loop against one transport and tool registry.
pub struct Conversation {
    transport: Arc<dyn ChatTransport>,
    registry: Arc<ToolRegistry>,
    config: ProviderConfig,
    cancel: CancelFlag,
}

impl Conversation {
    /// Create a loop runner.
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        registry: Arc<ToolRegistry>,
        config: ProviderConfig,
    ) -> Self {
        Self {
            transport,
            registry,
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Attach a cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the loop until the model answers with plain content, the turn
    /// budget is exhausted, or a fatal error occurs.
    ///
    /// `suggested_tools` is intersected with the registry; only tools the
    /// runtime can actually execute are advertised.
    pub async fn run(
        &self,
        mut messages: Vec<ChatMessage>,
        suggested_tools: &[String],
    ) -> Result<ConversationOutcome, EngineError> {
        let tools = self.advertised_tools(suggested_tools);
        let mut usage: Map<String, Value> = Map::new();

        for turn in 0..self.config.max_turns {
            if self.cancel.is_cancelled() {
                debug!(turn, "cancellation observed at turn boundary");
                return Err(EngineError::Cancelled);
            }

            let request = ChatRequest::new(messages.clone())
                .with_tools(tools.clone())
                .with_stream(self.config.streaming);

            let body = self.transport.complete(&request).await?;
            let parsed = if self.config.streaming {
                parse_stream(&body)
            } else {
                parse_response(&body)
            };

            if let Some(message) = parsed.error {
                return Err(EngineError::MalformedResponse(message));
            }

            accumulate_usage(&mut usage, &parsed.usage);

            if !parsed.has_tool_calls() {
                debug!(turn, "conversation finished with plain content");
                return Ok(ConversationOutcome {
                    message: parsed.content,
                    turns: turn + 1,
                    usage,
                });
            }

            debug!(turn, calls = parsed.tool_calls.len(), "executing tool calls");
            self.append_tool_turn(&mut messages, parsed).await;
        }

        warn!(max_turns = self.config.max_turns, "turn budget exhausted");
        Err(EngineError::LoopExhausted {
            turns: self.config.max_turns,
        })
    }

    fn advertised_tools(&self, suggested: &[String]) -> Vec<ToolDefinition> {
        self.registry
            .known(suggested)
            .into_iter()
            .filter_map(|name| self.registry.get(name))
            .map(|tool| ToolDefinition::function(tool.name(), tool.description(), tool.schema()))
            .collect()
    }

    /// Append the assistant's tool-call message and one `tool` message per
    /// call, in index order, each echoing the call id.
    async fn append_tool_turn(&self, messages: &mut Vec<ChatMessage>, parsed: ParsedResponse) {
        let calls = parsed.tool_calls;
        messages.push(ChatMessage::assistant(parsed.content).with_tool_calls(calls.clone()));

        for call in calls {
            let result = self.execute_call(&call).await;
            let content = result.to_string();
            messages.push(ChatMessage::tool(content, call.id.clone()));
        }
    }

    /// Execute one call, converting every failure into a recoverable JSON
    /// payload the model can see and correct.
    async fn execute_call(&self, call: &ToolCallRequest) -> Value {
        let name = &call.function.name;

        let args = match decode_arguments(&call.function.arguments) {
            Ok(args) => args,
            Err(message) => {
                return ValidationResult::invalid(
                    name,
                    vec![FieldError::new("arguments", message, "json")],
                )
                .to_error_payload();
            }
        };

        let Some(schema) = self.registry.schema(name) else {
            return json!({
                "success": false,
                "error": format!("Tool not found: {name}"),
                "code": "tool_not_found",
            });
        };

        let validation = validate_arguments(name, &schema, &args);
        if !validation.is_valid() {
            debug!(tool = %name, "tool arguments rejected by schema");
            return validation.to_error_payload();
        }

        match self.registry.dispatch(name, args).await {
            Ok(output) => output,
            Err(err) => {
                warn!(tool = %name, error = %err, "tool execution failed");
                json!({
                    "success": false,
                    "error": err.to_string(),
                    "code": "tool_execution_failed",
                })
            }
        }
    }
}

/// Decode the argument JSON document a tool call carries. A blank document
/// means "no arguments".
fn decode_arguments(arguments: &str) -> Result<Value, String> {
    let trimmed = arguments.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(trimmed).map_err(|e| format!("must be a valid JSON document: {e}"))
}

/// Merge one turn's usage counters into the running totals. Numeric
/// counters sum; anything else is last-seen.
fn accumulate_usage(totals: &mut Map<String, Value>, turn: &Map<String, Value>) {
    for (key, value) in turn {
        match (totals.get(key).and_then(Value::as_u64), value.as_u64()) {
            (Some(prior), Some(increment)) => {
                totals.insert(key.clone(), json!(prior + increment));
            }
            _ => {
                totals.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_is_shared_across_clones() {
        let flag = CancelFlag::new();
        let other = flag.clone();

        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_decode_arguments_blank_means_empty_object() {
        assert_eq!(decode_arguments("").unwrap(), json!({}));
        assert_eq!(decode_arguments("  ").unwrap(), json!({}));
        assert_eq!(
            decode_arguments(r#"{"order_id": 1}"#).unwrap(),
            json!({"order_id": 1})
        );
        assert!(decode_arguments(r#"{"order_id""#).is_err());
    }

    #[test]
    fn test_usage_accumulation_sums_counters() {
        let mut totals = Map::new();

        let first: Map<String, Value> =
            serde_json::from_value(json!({"total_tokens": 10, "model_tier": "fast"})).unwrap();
        let second: Map<String, Value> =
            serde_json::from_value(json!({"total_tokens": 7, "model_tier": "slow"})).unwrap();

        accumulate_usage(&mut totals, &first);
        accumulate_usage(&mut totals, &second);

        assert_eq!(totals["total_tokens"], json!(17));
        assert_eq!(totals["model_tier"], json!("slow"));
    }
}
