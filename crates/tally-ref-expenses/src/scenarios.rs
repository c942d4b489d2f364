//! The reference scenario catalogue and its runner.
//!
//! Each scenario pairs a claim with the disposition the validator must
//! reach and the flags it must raise. `run_scenario` validates the claim and
//! reports whether the outcome matched.

use tracing::{info, warn};

use tally_contracts::{
    error::TallyResult,
    expense::ValidationRequest,
    result::{Flag, Status, ValidationResult},
};
use tally_core::Validator;

use crate::mock_data;

/// One reference claim with its expected disposition.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Stable kebab-case name, used on the demo command line.
    pub name: &'static str,
    pub description: &'static str,
    pub request: ValidationRequest,
    pub expected_status: Status,
    /// Flags that must appear, in this order, as the complete flag list.
    pub expected_flags: Vec<Flag>,
}

/// What happened when a scenario ran.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub result: ValidationResult,
    /// True when both status and flags matched expectations.
    pub matched: bool,
}

/// Every reference scenario, in presentation order.
pub fn catalogue() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "routine-lodging",
            description: "Hotel stay under the routine threshold with a receipt",
            request: mock_data::routine_lodging(),
            expected_status: Status::AutoApproved,
            expected_flags: vec![Flag::AutoApprovedRoutine],
        },
        Scenario {
            name: "incomplete-meal",
            description: "Meal claim with no date and no amount",
            request: mock_data::incomplete_meal(),
            expected_status: Status::NeedsCorrection,
            expected_flags: vec![Flag::IncompleteReporting],
        },
        Scenario {
            name: "undocumented-consulting",
            description: "High-value consulting invoice with no receipt, justification or approver",
            request: mock_data::undocumented_consulting(),
            expected_status: Status::RequiresHigherApproval,
            expected_flags: vec![
                Flag::MissingReceipt,
                Flag::HighValueMissingJustification,
                Flag::HighValueMissingReceipt,
                Flag::HighValueMissingApprovalInfo,
                Flag::RouteForHigherApproval,
            ],
        },
        Scenario {
            name: "lodging-over-limit",
            description: "Three nights at $300 per night against a $200 limit",
            request: mock_data::lodging_over_limit(),
            expected_status: Status::RequiresHigherApproval,
            expected_flags: vec![Flag::LodgingLimitExceeded],
        },
        Scenario {
            name: "supplies-no-receipt",
            description: "Small supplies purchase submitted without a receipt",
            request: mock_data::supplies_without_receipt(),
            expected_status: Status::NeedsCorrection,
            expected_flags: vec![Flag::MissingReceipt],
        },
        Scenario {
            name: "travel-over-limit",
            description: "Documented flight that exceeds the airfare limit",
            request: mock_data::travel_over_airfare_limit(),
            expected_status: Status::RequiresHigherApproval,
            expected_flags: vec![Flag::AirfareLimitExceeded],
        },
        Scenario {
            name: "unknown-category",
            description: "Purchase filed under a category the policy does not know",
            request: mock_data::unknown_category(),
            expected_status: Status::NeedsCorrection,
            expected_flags: vec![Flag::InvalidCategory],
        },
        Scenario {
            name: "documented-high-value",
            description: "High-value invoice with receipt, justification and approver",
            request: mock_data::documented_high_value(),
            expected_status: Status::Approved,
            expected_flags: vec![],
        },
        Scenario {
            name: "raised-lodging-limit",
            description: "The over-limit hotel stay with a per-request limit of $350",
            request: mock_data::lodging_with_raised_limit(),
            expected_status: Status::Approved,
            expected_flags: vec![],
        },
        Scenario {
            name: "claimed-amount-taxi",
            description: "Taxi ride whose amount comes only from the claimed amount",
            request: mock_data::taxi_with_claimed_amount(),
            expected_status: Status::AutoApproved,
            expected_flags: vec![Flag::IncompleteReporting, Flag::AutoApprovedRoutine],
        },
    ]
}

/// Look up a scenario by name.
pub fn find(name: &str) -> Option<Scenario> {
    catalogue().into_iter().find(|s| s.name == name)
}

/// Validate the scenario's claim and compare against its expectations.
pub fn run_scenario(scenario: &Scenario, validator: &Validator) -> TallyResult<ScenarioOutcome> {
    let result = validator.validate_request(&scenario.request)?;
    let matched =
        result.status == scenario.expected_status && result.flags == scenario.expected_flags;

    if matched {
        info!(scenario = scenario.name, status = %result.status, "scenario matched");
    } else {
        warn!(
            scenario = scenario.name,
            expected = %scenario.expected_status,
            actual = %result.status,
            flags = ?result.flags,
            "scenario did not match expectations"
        );
    }

    Ok(ScenarioOutcome { result, matched })
}
