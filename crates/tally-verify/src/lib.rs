//! # tally-verify
//!
//! Conformance checks for serialized validation results.
//!
//! [`engine::verify_result`] validates a JSON value against the published
//! result schema (nine fixed fields, closed status and flag vocabularies,
//! no extra properties) using the `jsonschema` crate.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use tally_verify::engine::ensure_conforms;
//!
//! let result = validator.validate(&expense, &context)?;
//! ensure_conforms(&result)?;
//! ```

pub mod engine;

pub use engine::{ensure_conforms, result_schema, verify_result, VerificationReport};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use tally_contracts::{
        error::TallyError,
        expense::{EvaluationContext, ExpenseRecord},
        result::ValidationResult,
    };
    use tally_core::{traits::NullAuditSink, Validator};

    use super::{ensure_conforms, verify_result};

    fn validate(record: serde_json::Value, ctx: EvaluationContext) -> ValidationResult {
        let record: ExpenseRecord = serde_json::from_value(record).unwrap();
        Validator::with_defaults(Box::new(NullAuditSink))
            .validate(&record, &ctx)
            .unwrap()
    }

    #[test]
    fn test_real_results_conform() {
        let undocumented = validate(
            json!({
                "vendor_name": "Consulting Co",
                "date": "2025-12-01",
                "total_amount": 2500,
                "expense_category": "other"
            }),
            EvaluationContext::default(),
        );
        ensure_conforms(&undocumented).unwrap();

        // Unparsable amount serializes as null and still conforms.
        let garbled = validate(json!({ "total_amount": "n/a" }), EvaluationContext::default());
        assert_eq!(garbled.total_amount, None);
        ensure_conforms(&garbled).unwrap();
    }

    #[test]
    fn test_extra_field_is_rejected() {
        let result = validate(
            json!({ "vendor_name": "Office Supplies", "total_amount": 45 }),
            EvaluationContext::default(),
        );
        let mut value = serde_json::to_value(&result).unwrap();
        value["reviewer"] = json!("someone");

        let report = verify_result(&value).unwrap();
        assert!(!report.passed);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_all_violations_are_collected() {
        let value = json!({
            "success": false,
            "status": "rejected",
            "total_amount": "45",
            "category": "supplies",
            "issues": [],
            "flags": ["missing_receipt", "made_up_flag"],
            "suggested_actions": [],
            "auto_approved": false
        });

        let report = verify_result(&value).unwrap();
        assert!(!report.passed);
        // success, status, total_amount, unknown flag, missing raw_expense.
        assert!(
            report.failures.len() >= 5,
            "expected every violation, got {:?}",
            report.failures
        );
        assert!(report.failures.iter().any(|f| f.instance_path == "/flags/1"));
    }

    #[test]
    fn test_schema_validation_error_display() {
        let err = TallyError::SchemaValidation {
            reason: "[/status] not one of the allowed values".to_string(),
        };
        assert!(err.to_string().contains("/status"));
    }
}
