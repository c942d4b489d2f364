//! The audit entry shape shared by every audit sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One persisted record of an agent's output.
///
/// `data` holds the full serialized `ValidationResult`. `error` and `notes`
/// are carried for other agents writing to the same log; the validator leaves
/// them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: uuid::Uuid,
    pub timestamp: DateTime<Utc>,
    /// Name of the producing agent, e.g. "Validation Agent".
    pub agent: String,
    pub user_id: String,
    pub success: Option<bool>,
    pub data: Value,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub metadata: Value,
}

impl AuditEntry {
    /// Build a fresh entry stamped with a new id and the current time.
    ///
    /// `success` is lifted from the top-level `success` field of `data` when
    /// present.
    pub fn new(agent: impl Into<String>, user_id: impl Into<String>, data: Value) -> Self {
        let success = data.get("success").and_then(Value::as_bool);
        Self {
            entry_id: uuid::Uuid::new_v4(),
            timestamp: Utc::now(),
            agent: agent.into(),
            user_id: user_id.into(),
            success,
            data,
            error: None,
            notes: Vec::new(),
            metadata: Value::Null,
        }
    }
}
