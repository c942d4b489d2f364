//! Output types: flags, statuses, and the validation result.
//!
//! The serialized names of `Flag` and `Status` variants are consumed
//! literally by audit readers and approval workflows. Do not rename them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expense::ExpenseRecord;

/// A machine-readable tag recording that a specific policy rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    MissingReceipt,
    LodgingLimitExceeded,
    AirfareLimitExceeded,
    InvalidCategory,
    IncompleteReporting,
    HighValueMissingJustification,
    HighValueMissingReceipt,
    HighValueMissingApprovalInfo,
    RouteForHigherApproval,
    AutoApprovedRoutine,
}

impl Flag {
    /// The wire identifier of this flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::MissingReceipt => "missing_receipt",
            Flag::LodgingLimitExceeded => "lodging_limit_exceeded",
            Flag::AirfareLimitExceeded => "airfare_limit_exceeded",
            Flag::InvalidCategory => "invalid_category",
            Flag::IncompleteReporting => "incomplete_reporting",
            Flag::HighValueMissingJustification => "high_value_missing_justification",
            Flag::HighValueMissingReceipt => "high_value_missing_receipt",
            Flag::HighValueMissingApprovalInfo => "high_value_missing_approval_info",
            Flag::RouteForHigherApproval => "route_for_higher_approval",
            Flag::AutoApprovedRoutine => "auto_approved_routine",
        }
    }

    /// True for the three documentation flags raised on high-value claims.
    pub fn is_high_value(&self) -> bool {
        matches!(
            self,
            Flag::HighValueMissingJustification
                | Flag::HighValueMissingReceipt
                | Flag::HighValueMissingApprovalInfo
        )
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The final disposition of an expense claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Routine and compliant; no human review.
    AutoApproved,
    /// No blocking findings.
    Approved,
    /// The submitter must fix something before review.
    NeedsCorrection,
    /// A limit was exceeded or high-value documentation is missing.
    RequiresHigherApproval,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::AutoApproved => "auto_approved",
            Status::Approved => "approved",
            Status::NeedsCorrection => "needs_correction",
            Status::RequiresHigherApproval => "requires_higher_approval",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of validating one expense claim.
///
/// `issues` and `flags` are in rule evaluation order. Flags are not
/// deduplicated. `raw_expense` echoes the record exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Always true; a failed evaluation is an `Err`, not a result.
    pub success: bool,
    pub status: Status,
    /// The normalized amount, or `None` when it could not be interpreted.
    pub total_amount: Option<f64>,
    /// Lower-cased category, `"other"` when absent.
    pub category: String,
    pub issues: Vec<String>,
    pub flags: Vec<Flag>,
    pub suggested_actions: Vec<String>,
    pub auto_approved: bool,
    pub raw_expense: ExpenseRecord,
}

impl ValidationResult {
    /// True if `flag` was raised at least once.
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }
}
