//! The expense rule set.
//!
//! `evaluate` runs every rule, in a fixed order, against the same normalized
//! snapshot. A rule only skips when its own precondition is false; no rule
//! short-circuits another. The order determines the order of `issues`,
//! `flags` and `suggested_actions` in the result, which audit readers rely on.
//!
//! 1. required fields
//! 2. receipt requirement
//! 3. lodging per-night limit
//! 4. airfare / travel / transportation limit
//! 5. category validity
//! 6. incomplete reporting
//! 7. high-value documentation
//! 8. routine auto-approval eligibility

use tracing::debug;

use tally_contracts::{
    expense::{EvaluationContext, ExpenseRecord},
    result::Flag,
};

use crate::{
    config::PolicyConfig,
    normalize::{coerce_nights, has_text, is_present, NormalizedExpense},
};

/// Categories accepted by the category validity rule.
pub const VALID_CATEGORIES: [&str; 7] = [
    "meals",
    "travel",
    "supplies",
    "entertainment",
    "lodging",
    "transportation",
    "other",
];

/// Categories checked against `airfare_limit`.
pub const AIRFARE_CATEGORIES: [&str; 3] = ["airfare", "travel", "transportation"];

/// Categories eligible for routine auto-approval.
pub const ROUTINE_CATEGORIES: [&str; 3] = ["lodging", "travel", "transportation"];

/// Everything the rule set produced for one claim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub issues: Vec<String>,
    pub flags: Vec<Flag>,
    pub suggested_actions: Vec<String>,
    /// Set only by the routine auto-approval rule.
    pub auto_approved: bool,
}

impl Findings {
    /// Record one violation: an issue, its flag, and the matching remedy.
    fn raise(&mut self, flag: Flag, issue: String, action: &str) {
        debug!(flag = %flag, issue = %issue, "policy rule fired");
        self.issues.push(issue);
        self.flags.push(flag);
        self.suggested_actions.push(action.to_string());
    }

    fn has_any(&self, flags: &[Flag]) -> bool {
        self.flags.iter().any(|f| flags.contains(f))
    }
}

/// Run every rule against `expense` and return the accumulated findings.
///
/// `normalized` must come from `normalize(expense, context)`; presence
/// checks (rules 1 and 6) read the raw record, thresholds read the
/// normalized amount.
pub fn evaluate(
    expense: &ExpenseRecord,
    context: &EvaluationContext,
    normalized: &NormalizedExpense,
    policy: &PolicyConfig,
) -> Findings {
    let mut findings = Findings::default();

    check_required_fields(expense, &mut findings);
    check_receipt(context, normalized, &mut findings);
    check_lodging(expense, context, normalized, policy, &mut findings);
    check_airfare(normalized, policy, &mut findings);
    check_category(normalized, &mut findings);
    check_incomplete_reporting(expense, &mut findings);
    check_high_value(expense, context, normalized, policy, &mut findings);
    check_routine(context, normalized, policy, &mut findings);

    findings
}

// ── Individual rules ──────────────────────────────────────────────────────────

fn check_required_fields(expense: &ExpenseRecord, findings: &mut Findings) {
    let mut missing = Vec::new();
    if !has_text(expense.date.as_deref()) {
        missing.push("date");
    }
    if !has_text(expense.vendor_name.as_deref()) {
        missing.push("vendor_name");
    }
    if !is_present(expense.expense_category.as_ref()) {
        missing.push("expense_category");
    }

    if !missing.is_empty() {
        debug!(missing = ?missing, "required fields missing");
        findings
            .issues
            .push(format!("Missing required fields: {}", missing.join(", ")));
    }
}

fn check_receipt(
    context: &EvaluationContext,
    normalized: &NormalizedExpense,
    findings: &mut Findings,
) {
    let Some(amount) = normalized.total_amount else {
        return;
    };
    if amount > 0.0 && !context.has_receipts() {
        findings.raise(
            Flag::MissingReceipt,
            "Missing receipt(s) for claimed amount".to_string(),
            "Attach receipt image(s) before submission",
        );
    }
}

/// Nights only count when someone actually supplied them; a lodging claim
/// without nights is not judged against the per-night limit at all.
fn check_lodging(
    expense: &ExpenseRecord,
    context: &EvaluationContext,
    normalized: &NormalizedExpense,
    policy: &PolicyConfig,
    findings: &mut Findings,
) {
    if normalized.category != "lodging" {
        return;
    }
    let Some(raw_nights) = context.nights.as_ref().or(expense.nights.as_ref()) else {
        return;
    };
    let Some(amount) = normalized.total_amount else {
        return;
    };

    let nights = coerce_nights(raw_nights);
    let per_night = amount / nights as f64;
    if per_night > policy.lodging_limit_per_night {
        findings.raise(
            Flag::LodgingLimitExceeded,
            format!(
                "Lodging per-night cost ${:.2} exceeds policy limit ${:.2}",
                per_night, policy.lodging_limit_per_night
            ),
            "Provide justification or adjust lodging to policy-compliant rate",
        );
    }
}

fn check_airfare(normalized: &NormalizedExpense, policy: &PolicyConfig, findings: &mut Findings) {
    if !AIRFARE_CATEGORIES.contains(&normalized.category.as_str()) {
        return;
    }
    let Some(amount) = normalized.total_amount else {
        return;
    };
    if amount > policy.airfare_limit {
        findings.raise(
            Flag::AirfareLimitExceeded,
            format!(
                "Airfare/Travel amount ${:.2} exceeds policy limit ${:.2}",
                amount, policy.airfare_limit
            ),
            "Route to travel manager for exception approval",
        );
    }
}

fn check_category(normalized: &NormalizedExpense, findings: &mut Findings) {
    if !VALID_CATEGORIES.contains(&normalized.category.as_str()) {
        findings.raise(
            Flag::InvalidCategory,
            format!("Unknown expense category: {}", normalized.category),
            "Select a valid expense category",
        );
    }
}

/// Independent of the required-fields rule: both may fire for the same claim.
/// A zero or empty amount counts as unreported.
fn check_incomplete_reporting(expense: &ExpenseRecord, findings: &mut Findings) {
    if !has_text(expense.date.as_deref()) || !is_present(expense.total_amount.as_ref()) {
        findings.raise(
            Flag::IncompleteReporting,
            "Incomplete reporting: date or total amount missing or unparsed".to_string(),
            "Provide the transaction date and total amount",
        );
    }
}

fn check_high_value(
    expense: &ExpenseRecord,
    context: &EvaluationContext,
    normalized: &NormalizedExpense,
    policy: &PolicyConfig,
    findings: &mut Findings,
) {
    let Some(amount) = normalized.total_amount else {
        return;
    };
    if amount < policy.high_value_threshold {
        return;
    }

    let justification = first_text(&context.justification, &expense.justification)
        .map(str::trim)
        .unwrap_or_default();
    let cost_center = first_text(&context.cost_center, &expense.cost_center);
    let approver = first_text(&context.approver, &expense.approver);

    let before = findings.flags.len();

    if justification.is_empty() {
        findings.raise(
            Flag::HighValueMissingJustification,
            "High-value expense requires a justification".to_string(),
            "Add a justification explaining the business need",
        );
    }

    if !context.has_receipts() {
        findings.raise(
            Flag::HighValueMissingReceipt,
            "High-value expense must include receipts".to_string(),
            "Attach all supporting receipts/documents",
        );
    }

    if cost_center.is_none() && approver.is_none() {
        findings.raise(
            Flag::HighValueMissingApprovalInfo,
            "High-value expense requires cost center or designated approver information"
                .to_string(),
            "Provide cost center or approver to route for higher approval",
        );
    }

    if findings.flags[before..].iter().any(Flag::is_high_value) {
        debug!(amount, "high-value claim routed for higher approval");
        findings.flags.push(Flag::RouteForHigherApproval);
    }
}

/// Sets state only; never adds an issue.
fn check_routine(
    context: &EvaluationContext,
    normalized: &NormalizedExpense,
    policy: &PolicyConfig,
    findings: &mut Findings,
) {
    let Some(amount) = normalized.total_amount else {
        return;
    };
    if amount > policy.routine_threshold || !context.has_receipts() {
        return;
    }
    if findings.has_any(&[
        Flag::LodgingLimitExceeded,
        Flag::AirfareLimitExceeded,
        Flag::InvalidCategory,
    ]) {
        return;
    }
    if ROUTINE_CATEGORIES.contains(&normalized.category.as_str()) {
        debug!(amount, category = %normalized.category, "routine claim auto-approved");
        findings.auto_approved = true;
        findings.flags.push(Flag::AutoApprovedRoutine);
    }
}

/// The first non-empty value, context before record.
fn first_text<'a>(context: &'a Option<String>, record: &'a Option<String>) -> Option<&'a str> {
    context
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| record.as_deref().filter(|s| !s.is_empty()))
}
