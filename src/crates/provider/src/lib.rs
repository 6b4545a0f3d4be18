//! # provider - AI Provider Protocol Handling
//!
//! Client-side handling of the chat-completions wire protocol: request
//! types, single-shot response parsing, incremental (SSE) stream parsing
//! with tool-call fragment reassembly, and the HTTP transport.
//!
//! # Overview
//!
//! The provider returns either one JSON document or a text event stream of
//! `data: <json>` frames. Both forms normalize into the same
//! [`ParsedResponse`] shape so the conversation loop is agnostic to
//! transport mode:
//!
//! ```text
//! single-shot body ──▶ parser::parse_response ──┐
//!                                               ├──▶ ParsedResponse
//! SSE event stream ──▶ stream::parse_stream ────┘
//! ```
//!
//! Parsing never fails across the module boundary: a malformed body or
//! chunk produces an error-flagged (or partially accumulated) result, not a
//! panic or an `Err`.
//!
//! # Quick Start
//!
//! ```rust
//! use provider::parser::parse_response;
//!
//! let body = r#"{"model":"gpt-4","choices":[{"message":{"content":"Hi"}}]}"#;
//! let parsed = parse_response(body);
//!
//! assert_eq!(parsed.content, "Hi");
//! assert!(parsed.tool_calls.is_empty());
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Wire messages, tool-call requests, [`ParsedResponse`]
//! - [`parser`] - Single-shot response parsing
//! - [`stream`] - SSE stream parsing and delta merging
//! - [`client`] - [`ChatTransport`] trait and the reqwest implementation
//! - [`config`] - Provider configuration
//! - [`error`] - Provider error taxonomy

pub mod client;
pub mod config;
pub mod error;
pub mod parser;
pub mod stream;
pub mod types;

pub use client::{ChatRequest, ChatTransport, HttpChatTransport};
pub use config::ProviderConfig;
pub use error::{ProviderError, Result};
pub use types::{ChatMessage, FunctionCall, ParsedResponse, Role, ToolCallRequest, ToolDefinition};
