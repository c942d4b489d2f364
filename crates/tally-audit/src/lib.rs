//! # tally-audit
//!
//! Audit sinks for the TALLY validator.
//!
//! ## Overview
//!
//! - [`InMemoryAuditSink`] keeps entries in a SHA-256 hash chain. Tampering
//!   with any entry, even a single byte of its result data, breaks the chain
//!   and is detected by [`verify_chain`].
//! - [`JsonFileAuditSink`] keeps a `{"entries": [...]}` JSON document on disk
//!   and offers filtered queries and an [`AuditSummary`] over it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tally_audit::InMemoryAuditSink;
//! use tally_core::Validator;
//!
//! let sink = Arc::new(InMemoryAuditSink::new("expenses-2025-12"));
//! let validator = Validator::with_defaults(Box::new(sink.clone()));
//! validator.validate(&expense, &context)?;
//!
//! assert!(sink.verify_integrity());
//! ```

pub mod chain;
pub mod event;
pub mod file;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use event::{AuditLog, ChainedEntry};
pub use file::{AuditSummary, JsonFileAuditSink};
pub use memory::InMemoryAuditSink;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, sync::Arc};

    use serde_json::json;

    use tally_contracts::{
        audit::AuditEntry,
        expense::{EvaluationContext, ExpenseRecord},
        result::ValidationResult,
    };
    use tally_core::{traits::AuditSink, validator::AGENT_NAME, Validator};

    use super::{ChainedEntry, InMemoryAuditSink, JsonFileAuditSink};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Produce a real validation result for a vendor/amount pair.
    fn make_result(vendor: &str, amount: f64) -> ValidationResult {
        let record: ExpenseRecord = serde_json::from_value(json!({
            "vendor_name": vendor,
            "date": "2025-12-01",
            "total_amount": amount,
            "expense_category": "supplies"
        }))
        .unwrap();
        let validator = Validator::with_defaults(Box::new(tally_core::traits::NullAuditSink));
        validator.validate(&record, &EvaluationContext::default()).unwrap()
    }

    fn temp_log_path() -> PathBuf {
        std::env::temp_dir().join(format!("tally-audit-{}.json", uuid::Uuid::new_v4()))
    }

    // ── InMemoryAuditSink ─────────────────────────────────────────────────────

    /// Writing three entries and verifying produces a valid chain.
    #[test]
    fn test_hash_chain_integrity() {
        let sink = InMemoryAuditSink::new("ledger-integrity");
        sink.save(AGENT_NAME, &make_result("a", 10.0), "u-1").unwrap();
        sink.save(AGENT_NAME, &make_result("b", 20.0), "u-1").unwrap();
        sink.save(AGENT_NAME, &make_result("c", 30.0), "u-2").unwrap();

        assert_eq!(sink.len(), 3);
        assert!(sink.verify_integrity(), "chain must be valid after sequential writes");
    }

    /// Mutating a stored result breaks the chain.
    #[test]
    fn test_tamper_detection() {
        let sink = InMemoryAuditSink::new("ledger-tamper");
        sink.save(AGENT_NAME, &make_result("a", 10.0), "u-1").unwrap();
        sink.save(AGENT_NAME, &make_result("b", 20.0), "u-1").unwrap();

        {
            let mut state = sink.state.lock().unwrap();
            state.entries[0].entry.data["status"] = json!("approved");
        }

        assert!(
            !sink.verify_integrity(),
            "chain must detect tampering with a stored entry"
        );
    }

    #[test]
    fn test_genesis_and_sequence() {
        let sink = InMemoryAuditSink::new("ledger-seq");
        for i in 0..3 {
            sink.save(AGENT_NAME, &make_result("v", 10.0 * i as f64), "u").unwrap();
        }

        let log = sink.export_log();
        assert_eq!(log.entries[0].prev_hash, ChainedEntry::GENESIS_HASH);
        for (idx, chained) in log.entries.iter().enumerate() {
            assert_eq!(chained.sequence, idx as u64);
        }
        assert_eq!(log.terminal_hash, log.entries.last().unwrap().this_hash);
        assert!(super::verify_chain(&log.entries));
    }

    #[test]
    fn test_empty_log_is_valid() {
        let sink = InMemoryAuditSink::new("ledger-empty");
        assert!(sink.is_empty());
        assert!(sink.verify_integrity());
        assert_eq!(sink.export_log().terminal_hash, "");
        assert!(super::verify_chain(&[]));
    }

    #[test]
    fn test_entry_carries_result_and_attribution() {
        let sink = InMemoryAuditSink::new("ledger-entry");
        let result = make_result("Office Supplies", 45.0);
        let entry = sink.save(AGENT_NAME, &result, "u-9").unwrap();

        assert_eq!(entry.agent, AGENT_NAME);
        assert_eq!(entry.user_id, "u-9");
        assert_eq!(entry.success, Some(true));
        assert_eq!(entry.data["status"], json!("needs_correction"));
        assert_eq!(entry.data["flags"], json!(["missing_receipt"]));
        assert_eq!(sink.entries(), vec![entry]);
    }

    #[test]
    fn test_validator_writes_through_shared_sink() {
        let sink = Arc::new(InMemoryAuditSink::new("ledger-shared"));
        let validator = Validator::with_defaults(Box::new(sink.clone()));
        let record: ExpenseRecord = serde_json::from_value(json!({
            "vendor_name": "Hotel Simple",
            "date": "2025-12-01",
            "total_amount": 300,
            "expense_category": "lodging"
        }))
        .unwrap();
        let ctx = EvaluationContext {
            attachments: vec![json!("receipt.jpg")],
            user_id: Some("u-3".to_string()),
            ..Default::default()
        };

        validator.validate(&record, &ctx).unwrap();
        validator.validate(&record, &ctx).unwrap();

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.user_id == "u-3"));
        assert_eq!(entries[1].data["status"], json!("auto_approved"));
        assert!(sink.verify_integrity());
    }

    // ── JsonFileAuditSink ─────────────────────────────────────────────────────

    #[test]
    fn test_file_sink_round_trip_and_filters() {
        let path = temp_log_path();
        let sink = JsonFileAuditSink::new(&path);

        sink.save(AGENT_NAME, &make_result("a", 10.0), "alice").unwrap();
        sink.save(AGENT_NAME, &make_result("b", 20.0), "bob").unwrap();
        sink.save("Image Understanding Agent", &make_result("c", 30.0), "alice").unwrap();

        assert_eq!(sink.count(None), 3);
        assert_eq!(sink.count(Some(AGENT_NAME)), 2);
        assert_eq!(sink.entries(None, Some("alice"), None).len(), 2);

        let latest = sink.entries(None, None, Some(2));
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].user_id, "bob");

        let last = sink.last_entry(Some(AGENT_NAME)).unwrap();
        assert_eq!(last.user_id, "bob");
        assert_eq!(last.data["raw_expense"]["vendor_name"], json!("b"));

        // A second sink over the same file sees the same entries.
        assert_eq!(JsonFileAuditSink::new(&path).count(None), 3);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_sink_clear() {
        let path = temp_log_path();
        let sink = JsonFileAuditSink::new(&path);
        sink.save(AGENT_NAME, &make_result("a", 10.0), "u").unwrap();
        sink.clear().unwrap();

        assert_eq!(sink.count(None), 0);
        assert!(sink.last_entry(None).is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_sink_summary_counts_agents_and_successes() {
        let path = temp_log_path();
        let failed = AuditEntry::new(
            "Image Understanding Agent",
            "alice",
            json!({ "success": false, "extracted_data": null }),
        );
        std::fs::write(&path, json!({ "entries": [failed] }).to_string()).unwrap();

        let sink = JsonFileAuditSink::new(&path);
        sink.save(AGENT_NAME, &make_result("a", 10.0), "alice").unwrap();
        sink.save(AGENT_NAME, &make_result("b", 20.0), "bob").unwrap();

        let summary = sink.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_agent[AGENT_NAME], 2);
        assert_eq!(summary.by_agent["Image Understanding Agent"], 1);
        assert_eq!(summary.successful, 2);
        assert!((summary.success_rate().unwrap() - 2.0 / 3.0).abs() < 1e-9);

        sink.clear().unwrap();
        let empty = sink.summary();
        assert_eq!(empty.total, 0);
        assert!(empty.by_agent.is_empty());
        assert_eq!(empty.success_rate(), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_sink_recovers_from_corrupt_document() {
        let path = temp_log_path();
        std::fs::write(&path, "{ this is not json").unwrap();

        let sink = JsonFileAuditSink::new(&path);
        assert_eq!(sink.count(None), 0);
        sink.save(AGENT_NAME, &make_result("a", 10.0), "u").unwrap();
        assert_eq!(sink.count(None), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_sink_write_failure_is_reported() {
        let path = std::env::temp_dir()
            .join(format!("tally-missing-{}", uuid::Uuid::new_v4()))
            .join("audit.json");
        let sink = JsonFileAuditSink::new(&path);

        let err = sink.save(AGENT_NAME, &make_result("a", 10.0), "u").unwrap_err();
        assert!(err.to_string().contains("audit write failed"));
    }
}
