//! Structural verification of serialized validation results.
//!
//! Audit consumers and approval workflows match on the result's field names
//! and on the literal status and flag identifiers. `verify_result` checks a
//! JSON value against the published schema and reports every violation in
//! one pass.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use tally_contracts::{
    error::{TallyError, TallyResult},
    result::ValidationResult,
};

/// Identifier of the published result schema.
pub const RESULT_SCHEMA_ID: &str = "expense-validation-result-v1";

/// The outcome of checking one value against the result schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if no violation was found.
    pub passed: bool,
    pub failures: Vec<VerificationFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// JSON pointer to the offending location in the checked value.
    pub instance_path: String,
    pub message: String,
}

/// The JSON Schema every serialized `ValidationResult` conforms to.
pub fn result_schema() -> Value {
    json!({
        "type": "object",
        "required": [
            "success", "status", "total_amount", "category", "issues",
            "flags", "suggested_actions", "auto_approved", "raw_expense"
        ],
        "additionalProperties": false,
        "properties": {
            "success": { "const": true },
            "status": {
                "enum": ["auto_approved", "approved", "needs_correction", "requires_higher_approval"]
            },
            "total_amount": { "type": ["number", "null"] },
            "category": { "type": "string" },
            "issues": { "type": "array", "items": { "type": "string" } },
            "flags": {
                "type": "array",
                "items": {
                    "enum": [
                        "missing_receipt",
                        "lodging_limit_exceeded",
                        "airfare_limit_exceeded",
                        "invalid_category",
                        "incomplete_reporting",
                        "high_value_missing_justification",
                        "high_value_missing_receipt",
                        "high_value_missing_approval_info",
                        "route_for_higher_approval",
                        "auto_approved_routine"
                    ]
                }
            },
            "suggested_actions": { "type": "array", "items": { "type": "string" } },
            "auto_approved": { "type": "boolean" },
            "raw_expense": { "type": "object" }
        }
    })
}

/// Check `value` against [`result_schema`].
///
/// Every violation is collected. Returns `Err(SchemaValidation)` only if the
/// schema itself cannot be compiled.
pub fn verify_result(value: &Value) -> TallyResult<VerificationReport> {
    let schema = result_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| TallyError::SchemaValidation {
        reason: format!("invalid result schema '{}': {}", RESULT_SCHEMA_ID, e),
    })?;

    let failures: Vec<VerificationFailure> = validator
        .iter_errors(value)
        .map(|error| {
            let failure = VerificationFailure {
                instance_path: error.instance_path.to_string(),
                message: error.to_string(),
            };
            warn!(
                schema_id = RESULT_SCHEMA_ID,
                path = %failure.instance_path,
                message = %failure.message,
                "result schema violation"
            );
            failure
        })
        .collect();

    Ok(VerificationReport {
        passed: failures.is_empty(),
        failures,
    })
}

/// Serialize `result` and require it to conform to the result schema.
///
/// Returns `Err(SchemaValidation)` listing every violation otherwise.
pub fn ensure_conforms(result: &ValidationResult) -> TallyResult<()> {
    let value = serde_json::to_value(result).map_err(|e| TallyError::SchemaValidation {
        reason: format!("failed to serialize validation result: {}", e),
    })?;

    let report = verify_result(&value)?;
    if report.passed {
        return Ok(());
    }

    let summary = report
        .failures
        .iter()
        .map(|f| format!("[{}] {}", f.instance_path, f.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(TallyError::SchemaValidation { reason: summary })
}
