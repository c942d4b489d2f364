//! Input normalization.
//!
//! This is the one place malformed numeric and textual input is absorbed.
//! Nothing here fails: values that cannot be interpreted become `None` (for
//! amounts), `1` (for nights) or `"other"` (for categories).

use serde_json::Value;

use tally_contracts::expense::{EvaluationContext, ExpenseRecord};

/// Category used when none is supplied or the supplied one is not a string.
pub const DEFAULT_CATEGORY: &str = "other";

/// The canonical amount and category every rule reads.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedExpense {
    /// `None` when no amount was supplied or it could not be read as a number.
    pub total_amount: Option<f64>,
    /// Always lower-case.
    pub category: String,
}

/// Loose truthiness over JSON values.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are falsy; everything else is
/// truthy. Presence checks on raw extracted fields use this, so an empty
/// string or a zero amount counts as "not reported".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Same as [`is_truthy`] for optional JSON fields.
pub fn is_present(value: Option<&Value>) -> bool {
    value.is_some_and(is_truthy)
}

/// Same as [`is_truthy`] for optional text fields.
pub fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

/// Interpret a raw amount as `f64`.
///
/// Numbers convert directly; strings are trimmed and parsed. Every other
/// shape (and unparsable text) yields `None`.
pub fn coerce_amount(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Interpret a raw nights value as a positive night count.
///
/// Falsy values and anything that is not an integer, a float or an integer
/// string count as one night. The result is never below 1.
pub fn coerce_nights(value: &Value) -> i64 {
    if !is_truthy(value) {
        return 1;
    }
    let nights = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(true) => Some(1),
        _ => None,
    };
    nights.unwrap_or(1).max(1)
}

/// Produce the canonical amount and category for one claim.
///
/// The record's `total_amount` wins when it is truthy; otherwise the
/// context's `claimed_amount` is used. The record's category wins over the
/// context's for the same reason.
pub fn normalize(expense: &ExpenseRecord, context: &EvaluationContext) -> NormalizedExpense {
    let raw_amount = if is_present(expense.total_amount.as_ref()) {
        expense.total_amount.as_ref()
    } else {
        context.claimed_amount.as_ref()
    };

    let raw_category = if is_present(expense.expense_category.as_ref()) {
        expense.expense_category.as_ref()
    } else {
        context.expense_category.as_ref()
    };

    let category = match raw_category {
        Some(Value::String(s)) if !s.is_empty() => s.to_lowercase(),
        _ => DEFAULT_CATEGORY.to_string(),
    };

    NormalizedExpense {
        total_amount: coerce_amount(raw_amount),
        category,
    }
}
