//! # tally-ref-expenses
//!
//! Reference claims for the TALLY validator.
//!
//! The catalogue covers the canonical dispositions (routine auto-approval,
//! missing data, undocumented high-value claims, lodging and airfare limits,
//! missing receipts) plus a few edge cases: unknown categories, per-request
//! policy overrides and amounts supplied only as `claimed_amount`.
//!
//! All data is fictional.

pub mod mock_data;
pub mod scenarios;

pub use scenarios::{catalogue, find, run_scenario, Scenario, ScenarioOutcome};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use tally_audit::InMemoryAuditSink;
    use tally_contracts::result::{Flag, Status};
    use tally_core::Validator;
    use tally_verify::ensure_conforms;

    use super::{catalogue, find, mock_data, run_scenario};

    #[test]
    fn test_every_scenario_matches() {
        let validator = Validator::with_defaults(Box::new(tally_core::traits::NullAuditSink));
        for scenario in catalogue() {
            let outcome = run_scenario(&scenario, &validator).unwrap();
            assert!(
                outcome.matched,
                "scenario '{}' expected {:?} {:?}, got {:?} {:?}",
                scenario.name,
                scenario.expected_status,
                scenario.expected_flags,
                outcome.result.status,
                outcome.result.flags
            );
            ensure_conforms(&outcome.result).unwrap();
            assert_eq!(outcome.result.auto_approved, outcome.result.status == Status::AutoApproved);
        }
    }

    #[test]
    fn test_scenario_names_are_unique() {
        let names: HashSet<&str> = catalogue().iter().map(|s| s.name).collect();
        assert_eq!(names.len(), catalogue().len());
        assert!(find("lodging-over-limit").is_some());
        assert!(find("no-such-scenario").is_none());
    }

    #[test]
    fn test_lodging_issue_text() {
        let validator = Validator::with_defaults(Box::new(tally_core::traits::NullAuditSink));
        let scenario = find("lodging-over-limit").unwrap();
        let outcome = run_scenario(&scenario, &validator).unwrap();
        assert_eq!(
            outcome.result.issues,
            vec!["Lodging per-night cost $300.00 exceeds policy limit $200.00".to_string()]
        );
        assert_eq!(
            outcome.result.suggested_actions,
            vec!["Provide justification or adjust lodging to policy-compliant rate".to_string()]
        );
    }

    #[test]
    fn test_claimed_amount_is_normalized() {
        let validator = Validator::with_defaults(Box::new(tally_core::traits::NullAuditSink));
        let outcome = run_scenario(&find("claimed-amount-taxi").unwrap(), &validator).unwrap();
        assert_eq!(outcome.result.total_amount, Some(42.0));
        assert_eq!(outcome.result.category, "transportation");
        assert!(outcome.result.has_flag(Flag::IncompleteReporting));
    }

    #[test]
    fn test_full_run_is_audited_per_user() {
        let sink = Arc::new(InMemoryAuditSink::new("ref-run"));
        let validator = Validator::with_defaults(Box::new(sink.clone()));
        for scenario in catalogue() {
            run_scenario(&scenario, &validator).unwrap();
        }

        let entries = sink.entries();
        assert_eq!(entries.len(), catalogue().len());
        assert_eq!(entries[0].user_id, "emp-1001");
        assert!(sink.verify_integrity());
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let validator = Validator::with_defaults(Box::new(tally_core::traits::NullAuditSink));
        for scenario in catalogue() {
            let first = run_scenario(&scenario, &validator).unwrap().result;
            let second = run_scenario(&scenario, &validator).unwrap().result;
            assert_eq!(first, second, "scenario '{}' is not deterministic", scenario.name);
        }
    }

    #[test]
    #[should_panic(expected = "fixture 'broken' is not a valid request")]
    fn test_malformed_fixture_fails_loudly() {
        mock_data::request(
            "broken",
            serde_json::json!({ "expense": "not a record", "policy_overrides": 5 }),
        );
    }
}
