//! In-memory, hash-chained implementation of `AuditSink`.
//!
//! Entries live in a `Vec` behind a `Mutex`, so one sink can be shared by
//! every validation running in the process.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use tally_contracts::{
    audit::AuditEntry,
    error::{TallyError, TallyResult},
    result::ValidationResult,
};
use tally_core::traits::AuditSink;

use crate::{
    chain::{hash_entry, verify_chain},
    event::{AuditLog, ChainedEntry},
};

pub(crate) struct InMemoryState {
    pub(crate) entries: Vec<ChainedEntry>,
    /// The next sequence number to assign.
    pub(crate) sequence: u64,
    /// `this_hash` of the last entry, `GENESIS_HASH` before the first.
    pub(crate) last_hash: String,
}

/// An append-only audit sink backed by a SHA-256 hash chain.
///
/// Clones share the same ledger.
#[derive(Clone)]
pub struct InMemoryAuditSink {
    ledger_id: String,
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryAuditSink {
    pub fn new(ledger_id: impl Into<String>) -> Self {
        let state = InMemoryState {
            entries: Vec::new(),
            sequence: 0,
            last_hash: ChainedEntry::GENESIS_HASH.to_string(),
        };
        Self {
            ledger_id: ledger_id.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// The audit entries written so far, in append order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        let state = self.state.lock().expect("audit state lock poisoned");
        state.entries.iter().map(|c| c.entry.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().expect("audit state lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export a snapshot of the ledger with its terminal hash.
    pub fn export_log(&self) -> AuditLog {
        let state = self.state.lock().expect("audit state lock poisoned");
        let terminal_hash = state
            .entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        AuditLog {
            ledger_id: self.ledger_id.clone(),
            entries: state.entries.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        }
    }

    /// Verify that the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        let state = self.state.lock().expect("audit state lock poisoned");
        verify_chain(&state.entries)
    }
}

impl AuditSink for InMemoryAuditSink {
    /// Wrap `result` in an `AuditEntry`, chain it to the previous entry and
    /// append it.
    fn save(
        &self,
        agent_name: &str,
        result: &ValidationResult,
        user_id: &str,
    ) -> TallyResult<AuditEntry> {
        let data = serde_json::to_value(result).map_err(|e| TallyError::AuditWriteFailed {
            reason: format!("failed to serialize validation result: {}", e),
        })?;
        let entry = AuditEntry::new(agent_name, user_id, data);

        let mut state = self.state.lock().map_err(|e| TallyError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })?;

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let this_hash = hash_entry(&self.ledger_id, sequence, &entry, &prev_hash);

        state.entries.push(ChainedEntry {
            sequence,
            ledger_id: self.ledger_id.clone(),
            entry: entry.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.sequence += 1;
        state.last_hash = this_hash;

        debug!(
            ledger_id = %self.ledger_id,
            sequence,
            agent = %agent_name,
            user_id = %user_id,
            "audit entry appended"
        );

        Ok(entry)
    }
}
