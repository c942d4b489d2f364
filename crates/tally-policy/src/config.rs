//! Policy limits and their override/merge semantics.
//!
//! A `PolicyConfig` is a plain value. The validator holds a base policy
//! (defaults, or loaded from TOML) and derives a per-request copy from the
//! request's `policy_overrides`; nothing is shared or mutated across calls.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use tally_contracts::error::{TallyError, TallyResult};

/// Numeric limits applied by the expense rules.
///
/// Example TOML (every key optional; omitted keys keep their defaults):
/// ```toml
/// lodging_limit_per_night = 250.0
/// airfare_limit = 2000.0
/// high_value_threshold = 1000.0
/// routine_threshold = 500.0
/// min_receipt_amount = 0.01
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Maximum lodging cost per night before the claim needs higher approval.
    pub lodging_limit_per_night: f64,
    /// Maximum airfare/travel/transportation amount per claim.
    pub airfare_limit: f64,
    /// Claims at or above this amount need justification, receipts and routing info.
    pub high_value_threshold: f64,
    /// Claims at or below this amount may be auto-approved.
    pub routine_threshold: f64,
    /// Smallest amount for which a receipt is expected. Carried for policy
    /// documents and audit readers; the receipt rule fires on any positive amount.
    pub min_receipt_amount: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            lodging_limit_per_night: 200.0,
            airfare_limit: 1500.0,
            high_value_threshold: 1000.0,
            routine_threshold: 500.0,
            min_receipt_amount: 0.01,
        }
    }
}

impl PolicyConfig {
    /// Parse `s` as a TOML policy document.
    ///
    /// Returns `TallyError::ConfigError` if the TOML is malformed, a value has
    /// the wrong type, or an unknown key is present.
    pub fn from_toml_str(s: &str) -> TallyResult<Self> {
        toml::from_str(s).map_err(|e| TallyError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as a TOML policy document.
    pub fn from_file(path: &Path) -> TallyResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TallyError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Return a copy of this policy with `overrides` applied.
    ///
    /// Each key naming a known field replaces that field. Unknown keys are
    /// ignored. A known key whose value is not a JSON number is a caller
    /// contract violation and yields `ConfigError`.
    pub fn resolve(&self, overrides: Option<&BTreeMap<String, Value>>) -> TallyResult<Self> {
        let mut policy = *self;
        let Some(overrides) = overrides else {
            return Ok(policy);
        };

        for (key, value) in overrides {
            let slot = match key.as_str() {
                "lodging_limit_per_night" => &mut policy.lodging_limit_per_night,
                "airfare_limit" => &mut policy.airfare_limit,
                "high_value_threshold" => &mut policy.high_value_threshold,
                "routine_threshold" => &mut policy.routine_threshold,
                "min_receipt_amount" => &mut policy.min_receipt_amount,
                _ => {
                    debug!(key = %key, "ignoring unknown policy override");
                    continue;
                }
            };

            *slot = value.as_f64().ok_or_else(|| TallyError::ConfigError {
                reason: format!("policy override '{}' must be a number, got {}", key, value),
            })?;
        }

        Ok(policy)
    }
}
