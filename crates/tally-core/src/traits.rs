//! The audit sink contract.
//!
//! The validator forwards every result it produces to exactly one sink.
//! Sinks are shared by concurrent validations and must be append-only and
//! safe for concurrent writers; the validator does not serialize access.

use std::sync::Arc;

use tally_contracts::{audit::AuditEntry, error::TallyResult, result::ValidationResult};

/// Durable record of every evaluation.
pub trait AuditSink: Send + Sync {
    /// Append one result to the audit log and return the entry written.
    ///
    /// Implementations report failures as `TallyError::AuditWriteFailed`.
    /// The validator discards them; a failed audit never blocks a decision.
    fn save(
        &self,
        agent_name: &str,
        result: &ValidationResult,
        user_id: &str,
    ) -> TallyResult<AuditEntry>;
}

/// Lets a caller keep a handle on a sink it also hands to a `Validator`.
impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn save(
        &self,
        agent_name: &str,
        result: &ValidationResult,
        user_id: &str,
    ) -> TallyResult<AuditEntry> {
        (**self).save(agent_name, result, user_id)
    }
}

/// A sink that records nothing. For callers that audit elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn save(
        &self,
        agent_name: &str,
        result: &ValidationResult,
        user_id: &str,
    ) -> TallyResult<AuditEntry> {
        let data = serde_json::to_value(result).unwrap_or(serde_json::Value::Null);
        Ok(AuditEntry::new(agent_name, user_id, data))
    }
}
