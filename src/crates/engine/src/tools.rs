//! Built-in store tools.
//!
//! These return canned shapes so the loop, validator, and registry can be
//! exercised end to end without real commerce services; a deployment
//! registers its own [`Tool`] implementations alongside or instead of
//! them.

use async_trait::async_trait;
use serde_json::{json, Value};
use toolkit::{Result, Tool, ToolRegistry};

/// Fetch one order by id.
pub struct LookupOrder;

#[async_trait]
impl Tool for LookupOrder {
    fn name(&self) -> &str {
        "lookup_order"
    }

    fn description(&self) -> &str {
        "Fetch one order by its numeric id"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "order_id": {"type": "integer", "minimum": 1}
            },
            "required": ["order_id"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        Ok(json!({
            "success": true,
            "order": {
                "id": args["order_id"],
                "status": "fulfilled",
                "total": "42.50",
                "currency": "USD"
            }
        }))
    }
}

/// Stage a refund for an order.
pub struct PrepareRefund;

#[async_trait]
impl Tool for PrepareRefund {
    fn name(&self) -> &str {
        "prepare_refund"
    }

    fn description(&self) -> &str {
        "Stage a full or partial refund for an order; requires explicit confirmation to execute"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "order_id": {"type": "integer", "minimum": 1},
                "reason": {"type": "string"},
                "kind": {"type": "string", "enum": ["full", "partial"]}
            },
            "required": ["order_id"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        Ok(json!({
            "success": true,
            "refund": {
                "order_id": args["order_id"],
                "kind": args.get("kind").cloned().unwrap_or_else(|| json!("full")),
                "state": "staged"
            }
        }))
    }
}

/// Report inventory levels for a product.
pub struct StockLevels;

#[async_trait]
impl Tool for StockLevels {
    fn name(&self) -> &str {
        "stock_levels"
    }

    fn description(&self) -> &str {
        "Report current inventory levels for a product"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "product": {"type": "string", "minLength": 1}
            },
            "required": ["product"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        Ok(json!({
            "success": true,
            "product": args["product"],
            "available": 17,
            "incoming": 40
        }))
    }
}

/// A registry preloaded with every built-in tool.
pub fn builtin_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(LookupOrder));
    registry.register(Box::new(PrepareRefund));
    registry.register(Box::new(StockLevels));
    registry
}
