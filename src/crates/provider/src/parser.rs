//! Single-shot response parsing.
//!
//! Converts one complete provider response body into a [`ParsedResponse`].
//! Decode failures are flagged on the result, never raised: the
//! conversation loop treats an error-flagged result as a malformed
//! response, not a crash.

use crate::types::{FunctionCall, ParsedResponse, ToolCallRequest, LEGACY_TOOL_CALL_ID};
use serde_json::Value;

/// Maximum JSON nesting depth accepted from the provider.
///
/// Bounds stack cost against adversarial deeply-nested payloads; checked by
/// a linear pre-scan before deserialization.
pub const MAX_JSON_DEPTH: usize = 64;

/// Parse a complete response body into the normalized result shape.
pub fn parse_response(body: &str) -> ParsedResponse {
    let value = match decode_bounded(body) {
        Ok(value) => value,
        Err(message) => return ParsedResponse::malformed(message),
    };

    let mut parsed = ParsedResponse::default();

    if let Some(model) = value.get("model").and_then(Value::as_str) {
        parsed.model = Some(model.to_string());
    }
    if let Some(usage) = value.get("usage").and_then(Value::as_object) {
        parsed.usage = usage.clone();
    }

    // Missing choice/message means empty content and no tool calls, not a
    // failure.
    if let Some(message) = value
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
    {
        if let Some(content) = message.get("content").and_then(Value::as_str) {
            parsed.content = content.to_string();
        }
        parsed.tool_calls = extract_tool_calls(message);
    }

    parsed.raw = vec![value];
    parsed
}

/// Decode JSON with the nesting bound applied.
pub(crate) fn decode_bounded(body: &str) -> Result<Value, String> {
    if depth_exceeds(body, MAX_JSON_DEPTH) {
        return Err(format!(
            "response JSON exceeds maximum nesting depth of {MAX_JSON_DEPTH}"
        ));
    }

    serde_json::from_str(body).map_err(|e| format!("failed to decode response JSON: {e}"))
}

/// Linear scan for nesting depth, ignoring brackets inside strings.
fn depth_exceeds(body: &str, max: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in body.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > max {
                    return true;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    false
}

/// Pull tool calls out of a complete message object.
///
/// Prefers the modern `tool_calls` array; falls back to the legacy single
/// `function_call` field, synthesized as one call with a sentinel id.
fn extract_tool_calls(message: &Value) -> Vec<ToolCallRequest> {
    if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
        return calls.iter().map(tool_call_from_value).collect();
    }

    if let Some(function_call) = message.get("function_call").and_then(Value::as_object) {
        return vec![ToolCallRequest {
            id: LEGACY_TOOL_CALL_ID.to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: string_field(function_call.get("name")),
                arguments: string_field(function_call.get("arguments")),
            },
        }];
    }

    Vec::new()
}

/// Tolerant conversion: absent fields default to empty rather than failing
/// the whole response.
fn tool_call_from_value(value: &Value) -> ToolCallRequest {
    let function = value.get("function");
    ToolCallRequest {
        id: string_field(value.get("id")),
        call_type: string_field(value.get("type")),
        function: FunctionCall {
            name: string_field(function.and_then(|f| f.get("name"))),
            arguments: string_field(function.and_then(|f| f.get("arguments"))),
        },
    }
}

fn string_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_only_response() {
        let body = json!({
            "model": "gpt-4",
            "choices": [{"message": {"role": "assistant", "content": "Hello!"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2}
        })
        .to_string();

        let parsed = parse_response(&body);

        assert!(parsed.error.is_none());
        assert_eq!(parsed.content, "Hello!");
        assert!(parsed.tool_calls.is_empty());
        assert_eq!(parsed.model.as_deref(), Some("gpt-4"));
        assert_eq!(parsed.usage.get("prompt_tokens"), Some(&json!(10)));
    }

    #[test]
    fn test_modern_tool_calls() {
        let body = json!({
            "choices": [{"message": {
                "content": null,
                "tool_calls": [
                    {"id": "call_1", "type": "function",
                     "function": {"name": "lookup_order", "arguments": "{\"order_id\":123}"}},
                    {"id": "call_2", "type": "function",
                     "function": {"name": "stock_levels", "arguments": "{}"}}
                ]
            }}]
        })
        .to_string();

        let parsed = parse_response(&body);

        assert_eq!(parsed.tool_calls.len(), 2);
        assert_eq!(parsed.tool_calls[0].id, "call_1");
        assert_eq!(parsed.tool_calls[0].function.name, "lookup_order");
        assert_eq!(parsed.tool_calls[0].function.arguments, "{\"order_id\":123}");
        assert_eq!(parsed.tool_calls[1].function.name, "stock_levels");
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn test_legacy_function_call_fallback() {
        let body = json!({
            "choices": [{"message": {
                "content": "",
                "function_call": {"name": "prepare_refund", "arguments": "{\"order_id\":123}"}
            }}]
        })
        .to_string();

        let parsed = parse_response(&body);

        assert_eq!(parsed.tool_calls.len(), 1);
        assert_eq!(parsed.tool_calls[0].id, LEGACY_TOOL_CALL_ID);
        assert_eq!(parsed.tool_calls[0].call_type, "function");
        assert_eq!(parsed.tool_calls[0].function.name, "prepare_refund");
        assert_eq!(
            parsed.tool_calls[0].function.arguments,
            "{\"order_id\":123}"
        );
    }

    #[test]
    fn test_undecodable_body_is_flagged_not_raised() {
        let parsed = parse_response("{not json");
        assert!(parsed.error.is_some());
        assert!(parsed.content.is_empty());
    }

    #[test]
    fn test_missing_choices_is_empty_not_error() {
        let parsed = parse_response("{\"model\":\"gpt-4\"}");
        assert!(parsed.error.is_none());
        assert_eq!(parsed.content, "");
        assert!(parsed.tool_calls.is_empty());
    }

    #[test]
    fn test_wrongly_typed_usage_is_omitted() {
        let body = json!({"usage": "lots", "choices": []}).to_string();
        let parsed = parse_response(&body);
        assert!(parsed.usage.is_empty());
    }

    #[test]
    fn test_depth_bound_rejects_deep_nesting() {
        let mut body = String::new();
        for _ in 0..(MAX_JSON_DEPTH + 1) {
            body.push('[');
        }
        for _ in 0..(MAX_JSON_DEPTH + 1) {
            body.push(']');
        }

        let parsed = parse_response(&body);
        assert!(parsed.error.is_some());
        assert!(parsed.error.unwrap().contains("nesting depth"));
    }

    #[test]
    fn test_depth_scan_ignores_brackets_in_strings() {
        let body = json!({"choices": [{"message": {"content": "{{{{[[[["}}]}).to_string();
        let parsed = parse_response(&body);
        assert!(parsed.error.is_none());
        assert_eq!(parsed.content, "{{{{[[[[");
    }
}
