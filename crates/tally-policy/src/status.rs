//! Reduction of a flag set to a single status.

use tally_contracts::result::{Flag, Status};

/// Decide the final status from the accumulated flags.
///
/// Precedence, first match wins:
///
/// 1. `auto_approved` → `AutoApproved`
/// 2. `route_for_higher_approval`, `lodging_limit_exceeded` or
///    `airfare_limit_exceeded` → `RequiresHigherApproval`
/// 3. `missing_receipt`, `incomplete_reporting` or `invalid_category`
///    → `NeedsCorrection`
/// 4. otherwise → `Approved`
///
/// A high-value claim that is also missing its receipt therefore needs
/// higher approval, not correction.
pub fn resolve_status(flags: &[Flag], auto_approved: bool) -> Status {
    if auto_approved {
        Status::AutoApproved
    } else if contains_any(flags, &[
        Flag::RouteForHigherApproval,
        Flag::LodgingLimitExceeded,
        Flag::AirfareLimitExceeded,
    ]) {
        Status::RequiresHigherApproval
    } else if contains_any(flags, &[
        Flag::MissingReceipt,
        Flag::IncompleteReporting,
        Flag::InvalidCategory,
    ]) {
        Status::NeedsCorrection
    } else {
        Status::Approved
    }
}

fn contains_any(flags: &[Flag], wanted: &[Flag]) -> bool {
    flags.iter().any(|f| wanted.contains(f))
}
