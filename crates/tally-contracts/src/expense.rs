//! Input types: the expense record and its evaluation context.
//!
//! Fields that come straight out of receipt extraction (`total_amount`,
//! `expense_category`, `nights`) are kept as raw JSON values so garbled input
//! survives deserialization and is absorbed later by the normalizer.
//! Text fields accept any JSON value: falsy ones read as absent, other
//! non-strings are kept as their JSON text.
//! Keys the extraction service emits beyond the ones listed here are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single expense claim as produced by the extraction service or a form.
///
/// Every field is optional. Absence (`None`) and an invalid value (e.g. a
/// `total_amount` of `"twelve"`) are different situations and the rules
/// treat them differently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub vendor_name: Option<String>,
    /// Transaction date, free-form. Never parsed.
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    /// Claimed total. A number or a numeric string in well-formed input.
    #[serde(default)]
    pub total_amount: Option<Value>,
    /// Category label. Non-string values normalize to `"other"`.
    #[serde(default)]
    pub expense_category: Option<Value>,
    /// Nights stayed, for lodging.
    #[serde(default)]
    pub nights: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub justification: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cost_center: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub approver: Option<String>,
    /// Submitter, used for audit attribution when the context has none.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
}

/// Everything supplied alongside the record for one evaluation.
///
/// Context-level `nights`, `justification`, `cost_center` and `approver`
/// take precedence over the same fields on the record; `expense_category`
/// here is only a fallback for a record without one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawContext")]
pub struct EvaluationContext {
    /// Receipt images or attachment metadata. Opaque; only emptiness matters.
    pub attachments: Vec<Value>,
    /// Fallback amount when the record carries none.
    pub claimed_amount: Option<Value>,
    /// Per-request policy overrides keyed by `PolicyConfig` field name.
    pub policy_overrides: Option<BTreeMap<String, Value>>,
    pub user_id: Option<String>,
    pub nights: Option<Value>,
    pub justification: Option<String>,
    pub cost_center: Option<String>,
    pub approver: Option<String>,
    pub expense_category: Option<Value>,
}

impl EvaluationContext {
    /// True when at least one attachment accompanies the claim.
    pub fn has_receipts(&self) -> bool {
        !self.attachments.is_empty()
    }
}

/// Wire form of [`EvaluationContext`]. `attachments` and `receipts` are read
/// separately and the first truthy one wins.
#[derive(Deserialize)]
struct RawContext {
    #[serde(default)]
    attachments: Option<Value>,
    #[serde(default)]
    receipts: Option<Value>,
    #[serde(default)]
    claimed_amount: Option<Value>,
    #[serde(default)]
    policy_overrides: Option<BTreeMap<String, Value>>,
    #[serde(default, deserialize_with = "lenient_text")]
    user_id: Option<String>,
    #[serde(default)]
    nights: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    justification: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    cost_center: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    approver: Option<String>,
    #[serde(default)]
    expense_category: Option<Value>,
}

impl From<RawContext> for EvaluationContext {
    fn from(raw: RawContext) -> Self {
        let attachments = match first_truthy(raw.attachments, raw.receipts) {
            Some(Value::Array(items)) => items,
            Some(single) => vec![single],
            None => Vec::new(),
        };
        Self {
            attachments,
            claimed_amount: raw.claimed_amount,
            policy_overrides: raw.policy_overrides,
            user_id: raw.user_id,
            nights: raw.nights,
            justification: raw.justification,
            cost_center: raw.cost_center,
            approver: raw.approver,
            expense_category: raw.expense_category,
        }
    }
}

/// The envelope a caller hands over in one piece: the record plus context.
///
/// The record is read from `expense`, or from `extracted_data` when
/// `expense` is missing, null or empty.
///
/// ```json
/// { "extracted_data": { "vendor_name": "Hotel Simple", "total_amount": 300 },
///   "attachments": ["receipt.jpg"], "user_id": "u-17" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest")]
pub struct ValidationRequest {
    pub expense: ExpenseRecord,
    #[serde(flatten)]
    pub context: EvaluationContext,
}

#[derive(Deserialize)]
struct RawRequest {
    #[serde(default)]
    expense: Option<Value>,
    #[serde(default)]
    extracted_data: Option<Value>,
    #[serde(flatten)]
    context: EvaluationContext,
}

impl TryFrom<RawRequest> for ValidationRequest {
    type Error = serde_json::Error;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let expense = match first_truthy(raw.expense, raw.extracted_data) {
            Some(value) => serde_json::from_value(value)?,
            None => ExpenseRecord::default(),
        };
        Ok(Self {
            expense,
            context: raw.context,
        })
    }
}

/// First of two optional values that is neither absent nor falsy.
fn first_truthy(primary: Option<Value>, fallback: Option<Value>) -> Option<Value> {
    primary
        .filter(truthy)
        .or_else(|| fallback.filter(truthy))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Read a text field from any JSON value.
///
/// Strings pass through unchanged (the empty string included). Other falsy
/// values become `None`; remaining non-strings keep their JSON text, so a
/// numeric date like `20251201` reads as `"20251201"`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(other) if truthy(&other) => Some(other.to_string()),
        _ => None,
    })
}
