//! SSE stream parsing and tool-call delta merging.
//!
//! The provider sends `data: <json>` frames terminated by a literal
//! `[DONE]` sentinel. This parser produces the same [`ParsedResponse`]
//! shape as the single-shot parser so the conversation loop is agnostic to
//! transport mode.
//!
//! Tool calls arrive fragmented: each delta carries a stream `index`, and
//! `function.arguments` fragments for one index are successive substrings
//! of a single JSON document. Merging is strict append for arguments and
//! overwrite-only-when-supplied for `id`/`type`/`function.name` — no
//! fragment may erase a previously set value with empty data.

use crate::parser::decode_bounded;
use crate::types::{ParsedResponse, ToolCallRequest};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Event-data marker prefixing each payload line.
const DATA_PREFIX: &str = "data:";

/// Stream-termination sentinel value.
const DONE_SENTINEL: &str = "[DONE]";

/// Cap on the retained diagnostic raw-chunk buffer.
///
/// Bounds memory on very long completions; does not affect content or
/// tool-call accumulation.
pub const RAW_CHUNK_CAP: usize = 100;

/// Parse an event-stream body into the normalized result shape.
pub fn parse_stream(body: &str) -> ParsedResponse {
    parse_stream_with(body, |_| {})
}

/// Parse an event-stream body, invoking `on_chunk` synchronously for every
/// successfully decoded chunk before it is merged.
///
/// The callback enables progressive forwarding to a live client; it must
/// see chunks in arrival order.
pub fn parse_stream_with<F>(body: &str, mut on_chunk: F) -> ParsedResponse
where
    F: FnMut(&Value),
{
    let mut parsed = ParsedResponse::default();
    let mut pending: BTreeMap<u64, ToolCallRequest> = BTreeMap::new();

    for line in body.split(['\r', '\n']) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };
        let payload = payload.trim();

        if payload == DONE_SENTINEL {
            continue;
        }

        let chunk = match decode_bounded(payload) {
            Ok(chunk) => chunk,
            Err(message) => {
                // One malformed chunk must not abort the stream.
                debug!(%message, "skipping undecodable stream chunk");
                continue;
            }
        };

        on_chunk(&chunk);

        if parsed.raw.len() < RAW_CHUNK_CAP {
            parsed.raw.push(chunk.clone());
        }

        if let Some(model) = chunk.get("model").and_then(Value::as_str) {
            parsed.model = Some(model.to_string());
        }
        if let Some(usage) = chunk.get("usage").and_then(Value::as_object) {
            // Providers typically emit usage once, in the final chunk.
            parsed.usage = usage.clone();
        }

        let Some(delta) = chunk
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("delta"))
        else {
            continue;
        };

        if let Some(content) = delta.get("content").and_then(Value::as_str) {
            parsed.content.push_str(content);
        }

        if let Some(calls) = delta.get("tool_calls").and_then(Value::as_array) {
            for call in calls {
                let index = call.get("index").and_then(Value::as_u64).unwrap_or(0);
                merge_fragment(pending.entry(index).or_default(), call);
            }
        } else if let Some(function_call) = delta.get("function_call") {
            // Legacy single function_call deltas are index-0 fragments.
            let entry = pending.entry(0).or_default();
            if entry.id.is_empty() {
                entry.id = crate::types::LEGACY_TOOL_CALL_ID.to_string();
                entry.call_type = "function".to_string();
            }
            merge_function_fragment(entry, function_call);
        }
    }

    parsed.tool_calls = pending.into_values().collect();
    parsed
}

/// Merge one tool-call delta into the call accumulated for its index.
fn merge_fragment(entry: &mut ToolCallRequest, fragment: &Value) {
    if let Some(id) = non_empty_str(fragment.get("id")) {
        entry.id = id.to_string();
    }
    if let Some(call_type) = non_empty_str(fragment.get("type")) {
        entry.call_type = call_type.to_string();
    }
    if let Some(function) = fragment.get("function") {
        merge_function_fragment(entry, function);
    }
}

fn merge_function_fragment(entry: &mut ToolCallRequest, function: &Value) {
    if let Some(name) = non_empty_str(function.get("name")) {
        entry.function.name = name.to_string();
    }
    if let Some(arguments) = function.get("arguments").and_then(Value::as_str) {
        // Arguments are successive substrings of one JSON document and are
        // concatenated in arrival order, never overwritten.
        entry.function.arguments.push_str(arguments);
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
