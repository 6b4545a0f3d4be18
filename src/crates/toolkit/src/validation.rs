//! Tool argument validation.
//!
//! Checks tool-call arguments against the tool's declared JSON schema
//! before execution. Every violation is collected (no short-circuit) so the
//! model sees the full list at once, and [`ValidationResult::to_error_payload`]
//! renders the standard recoverable payload that is fed back into the
//! conversation as a tool-result message. A schema violation is a
//! conversation turn the model can correct, not a terminal failure.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Error code carried by the recoverable payload.
pub const INVALID_ARGUMENTS_CODE: &str = "invalid_tool_arguments";

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field ("order_id", "customer.email").
    pub field: String,

    /// Human-readable message.
    pub message: String,

    /// Machine-readable violation code.
    pub code: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Outcome of validating one tool call's arguments.
///
/// Immutable once constructed via [`ValidationResult::valid`] or
/// [`ValidationResult::invalid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    tool_name: String,
    is_valid: bool,
    errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Arguments passed validation.
    pub fn valid(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Arguments failed validation with the given violations.
    pub fn invalid(tool_name: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            tool_name: tool_name.into(),
            is_valid: false,
            errors,
        }
    }

    /// Whether the arguments passed.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The tool these arguments were meant for.
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// The collected violations.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Render the standard recoverable payload fed back to the model.
    pub fn to_error_payload(&self) -> Value {
        let detail = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");

        json!({
            "success": false,
            "error": format!("Invalid arguments for tool \"{}\": {detail}", self.tool_name),
            "code": INVALID_ARGUMENTS_CODE,
            "validation_errors": self.errors,
        })
    }
}

/// Validate `args` against a tool's declared JSON schema.
///
/// Supports `type`, `required`, `enum`, `minimum`/`maximum`, `minLength`,
/// and `additionalProperties: false`, recursing through nested object
/// properties. All violations are reported in one result.
pub fn validate_arguments(tool_name: &str, schema: &Value, args: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    validate_value("", schema, args, &mut errors);

    if errors.is_empty() {
        ValidationResult::valid(tool_name)
    } else {
        ValidationResult::invalid(tool_name, errors)
    }
}

fn validate_value(path: &str, schema: &Value, value: &Value, errors: &mut Vec<FieldError>) {
    if let Some(expected) = schema.get("type").and_then(Value::as_str) {
        if !type_matches(expected, value) {
            errors.push(FieldError::new(
                display_path(path),
                format!("must be of type {expected}"),
                "type",
            ));
            // Remaining keyword checks assume the declared type.
            return;
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            errors.push(FieldError::new(
                display_path(path),
                format!("must be one of {}", Value::Array(allowed.clone())),
                "enum",
            ));
        }
    }

    if let Some(number) = value.as_f64() {
        if let Some(minimum) = schema.get("minimum").and_then(Value::as_f64) {
            if number < minimum {
                errors.push(FieldError::new(
                    display_path(path),
                    format!("must be at least {minimum}"),
                    "minimum",
                ));
            }
        }
        if let Some(maximum) = schema.get("maximum").and_then(Value::as_f64) {
            if number > maximum {
                errors.push(FieldError::new(
                    display_path(path),
                    format!("must be at most {maximum}"),
                    "maximum",
                ));
            }
        }
    }

    if let Some(text) = value.as_str() {
        if let Some(min_length) = schema.get("minLength").and_then(Value::as_u64) {
            if (text.chars().count() as u64) < min_length {
                errors.push(FieldError::new(
                    display_path(path),
                    format!("must be at least {min_length} characters"),
                    "min_length",
                ));
            }
        }
    }

    if let Some(object) = value.as_object() {
        validate_object(path, schema, object, errors);
    }
}

fn validate_object(
    path: &str,
    schema: &Value,
    object: &Map<String, Value>,
    errors: &mut Vec<FieldError>,
) {
    let properties = schema.get("properties").and_then(Value::as_object);

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(name) {
                errors.push(FieldError::new(join(path, name), "is required", "required"));
            }
        }
    }

    if let Some(properties) = properties {
        for (name, property_schema) in properties {
            if let Some(property_value) = object.get(name) {
                validate_value(&join(path, name), property_schema, property_value, errors);
            }
        }
    }

    let additional_allowed = schema
        .get("additionalProperties")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    if !additional_allowed {
        for name in object.keys() {
            let declared = properties.is_some_and(|p| p.contains_key(name));
            if !declared {
                errors.push(FieldError::new(
                    join(path, name),
                    "is not a recognized argument",
                    "additional_properties",
                ));
            }
        }
    }
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "arguments".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refund_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "order_id": {"type": "integer", "minimum": 1},
                "reason": {"type": "string", "minLength": 3},
                "kind": {"type": "string", "enum": ["full", "partial"]}
            },
            "required": ["order_id"],
            "additionalProperties": false
        })
    }

    #[test]
    fn test_valid_arguments() {
        let result = validate_arguments(
            "prepare_refund",
            &refund_schema(),
            &json!({"order_id": 123, "reason": "damaged", "kind": "full"}),
        );

        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_missing_required_property() {
        let result = validate_arguments("prepare_refund", &refund_schema(), &json!({}));

        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].field, "order_id");
        assert_eq!(result.errors()[0].message, "is required");
        assert_eq!(result.errors()[0].code, "required");
    }

    #[test]
    fn test_multiple_violations_reported_together() {
        let result = validate_arguments(
            "prepare_refund",
            &refund_schema(),
            &json!({"order_id": 0, "reason": "x", "kind": "half", "bogus": true}),
        );

        assert!(!result.is_valid());
        let codes: Vec<&str> = result.errors().iter().map(|e| e.code.as_str()).collect();
        assert!(codes.contains(&"minimum"));
        assert!(codes.contains(&"min_length"));
        assert!(codes.contains(&"enum"));
        assert!(codes.contains(&"additional_properties"));
        assert_eq!(result.errors().len(), 4);
    }

    #[test]
    fn test_type_violation() {
        let result = validate_arguments(
            "prepare_refund",
            &refund_schema(),
            &json!({"order_id": "123"}),
        );

        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].field, "order_id");
        assert_eq!(result.errors()[0].code, "type");
    }

    #[test]
    fn test_integer_rejects_float() {
        let schema = json!({"type": "object", "properties": {"n": {"type": "integer"}}});
        let result = validate_arguments("t", &schema, &json!({"n": 1.5}));
        assert!(!result.is_valid());
    }

    #[test]
    fn test_nested_object_recursion() {
        let schema = json!({
            "type": "object",
            "properties": {
                "customer": {
                    "type": "object",
                    "properties": {"email": {"type": "string", "minLength": 5}},
                    "required": ["email"]
                }
            }
        });

        let result = validate_arguments("t", &schema, &json!({"customer": {}}));
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].field, "customer.email");

        let result = validate_arguments("t", &schema, &json!({"customer": {"email": "a@b"}}));
        assert_eq!(result.errors()[0].field, "customer.email");
        assert_eq!(result.errors()[0].code, "min_length");
    }

    #[test]
    fn test_non_object_root() {
        let result = validate_arguments("t", &json!({"type": "object"}), &json!(42));
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].field, "arguments");
        assert_eq!(result.errors()[0].code, "type");
    }

    #[test]
    fn test_error_payload_shape() {
        let result = ValidationResult::invalid(
            "prepare_refund",
            vec![FieldError::new("order_id", "is required", "required")],
        );

        let payload = result.to_error_payload();

        assert_eq!(payload["success"], json!(false));
        assert_eq!(
            payload["error"],
            json!("Invalid arguments for tool \"prepare_refund\": order_id: is required")
        );
        assert_eq!(payload["code"], json!(INVALID_ARGUMENTS_CODE));
        assert_eq!(payload["validation_errors"][0]["field"], json!("order_id"));
    }

    #[test]
    fn test_error_payload_joins_multiple_errors() {
        let result = ValidationResult::invalid(
            "t",
            vec![
                FieldError::new("a", "is required", "required"),
                FieldError::new("b", "must be of type string", "type"),
            ],
        );

        assert_eq!(
            result.to_error_payload()["error"],
            json!("Invalid arguments for tool \"t\": a: is required; b: must be of type string")
        );
    }
}
