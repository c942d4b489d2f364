//! The TALLY validator: one expense claim in, one disposition out.
//!
//! Pipeline per call:
//!
//!   Policy overrides → Normalize → Evaluate rules → Resolve status → Assemble → Audit
//!
//! Every step but the first is infallible. The audit write is a best-effort
//! side effect: its failure is logged and the result is returned regardless.

use tracing::{debug, info, warn};

use tally_contracts::{
    error::TallyResult,
    expense::{EvaluationContext, ExpenseRecord, ValidationRequest},
    result::ValidationResult,
};
use tally_policy::{evaluate, normalize, resolve_status, PolicyConfig};

use crate::traits::AuditSink;

/// Agent name the validator's audit entries are filed under.
pub const AGENT_NAME: &str = "Validation Agent";

/// User id recorded when neither the context nor the record names one.
pub const UNKNOWN_USER: &str = "unknown";

/// Validates expense claims against a base policy.
///
/// A validator holds no per-claim state and may be shared across threads;
/// each call derives its own policy from the base plus that request's
/// overrides.
pub struct Validator {
    policy: PolicyConfig,
    audit: Box<dyn AuditSink>,
}

impl Validator {
    /// Create a validator with an explicit base policy.
    pub fn new(policy: PolicyConfig, audit: Box<dyn AuditSink>) -> Self {
        Self { policy, audit }
    }

    /// Create a validator using the default policy limits.
    pub fn with_defaults(audit: Box<dyn AuditSink>) -> Self {
        Self::new(PolicyConfig::default(), audit)
    }

    /// The base policy before per-request overrides.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Validate one claim.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::ConfigError` when `context.policy_overrides`
    /// carries a non-numeric value for a known policy field. Every other
    /// problem with the claim is reported on the returned result.
    pub fn validate(
        &self,
        expense: &ExpenseRecord,
        context: &EvaluationContext,
    ) -> TallyResult<ValidationResult> {
        let policy = self.policy.resolve(context.policy_overrides.as_ref())?;

        let normalized = normalize(expense, context);
        debug!(
            total_amount = ?normalized.total_amount,
            category = %normalized.category,
            receipts = context.attachments.len(),
            "expense normalized"
        );

        let findings = evaluate(expense, context, &normalized, &policy);
        let status = resolve_status(&findings.flags, findings.auto_approved);

        let result = ValidationResult {
            success: true,
            status,
            total_amount: normalized.total_amount,
            category: normalized.category,
            issues: findings.issues,
            flags: findings.flags,
            suggested_actions: findings.suggested_actions,
            auto_approved: findings.auto_approved,
            raw_expense: expense.clone(),
        };

        let user_id = context
            .user_id
            .as_deref()
            .or(expense.user_id.as_deref())
            .unwrap_or(UNKNOWN_USER);

        info!(
            user_id = %user_id,
            status = %result.status,
            flag_count = result.flags.len(),
            issue_count = result.issues.len(),
            "expense validated"
        );

        // Best effort: a failed audit write never changes the decision.
        if let Err(e) = self.audit.save(AGENT_NAME, &result, user_id) {
            warn!(
                user_id = %user_id,
                status = %result.status,
                error = %e,
                "audit write failed; returning result without audit record"
            );
        }

        Ok(result)
    }

    /// Validate a claim delivered as a single request envelope.
    pub fn validate_request(&self, request: &ValidationRequest) -> TallyResult<ValidationResult> {
        self.validate(&request.expense, &request.context)
    }
}
