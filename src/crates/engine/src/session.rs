//! Write-mostly session recording.
//!
//! Every engine invocation is recorded after its result is known. The
//! engine never reads the store back for routing; it exists for audit
//! trails and offline analysis.

use crate::result::EngineResult;
use async_trait::async_trait;
use intent::Intent;
use std::sync::Mutex;
use tracing::debug;

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// The intent the invocation resolved to.
    pub intent: Intent,

    /// The raw user input.
    pub input: String,

    /// Whether the invocation succeeded.
    pub success: bool,

    /// The envelope status.
    pub status: u16,
}

/// Sink for completed invocations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record one completed invocation.
    async fn record(&self, intent: Intent, input: &str, result: &EngineResult);
}

/// In-memory store backing tests and single-process deployments.
#[derive(Default)]
pub struct MemorySessionStore {
    records: Mutex<Vec<SessionRecord>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<SessionRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn record(&self, intent: Intent, input: &str, result: &EngineResult) {
        debug!(intent = %intent, success = result.success, "recording session");

        if let Ok(mut records) = self.records.lock() {
            records.push(SessionRecord {
                intent,
                input: input.to_string(),
                success: result.success,
                status: result.status,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_records_in_order() {
        let store = MemorySessionStore::new();

        store
            .record(
                Intent::OrderRefund,
                "refund order 1",
                &EngineResult::ok(Intent::OrderRefund, "done"),
            )
            .await;
        store
            .record(
                Intent::Unknown,
                "hello",
                &EngineResult::ok(Intent::Unknown, "hi"),
            )
            .await;

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].intent, Intent::OrderRefund);
        assert_eq!(records[0].input, "refund order 1");
        assert!(records[0].success);
        assert_eq!(records[1].intent, Intent::Unknown);
    }
}
