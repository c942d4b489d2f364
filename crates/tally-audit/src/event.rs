//! Chained audit entries and the exported log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tally_contracts::audit::AuditEntry;

/// An `AuditEntry` positioned in a SHA-256 hash chain.
///
/// Modifying any field, including the embedded entry's result data,
/// invalidates `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainedEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,
    /// The ledger this entry belongs to.
    pub ledger_id: String,
    pub entry: AuditEntry,
    /// Hash of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,
    /// Hash over (ledger_id, sequence, prev_hash, entry).
    pub this_hash: String,
}

impl ChainedEntry {
    /// The `prev_hash` of the first entry in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A snapshot of a ledger, as produced by `InMemoryAuditSink::export_log()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub ledger_id: String,
    /// All entries in chain order.
    pub entries: Vec<ChainedEntry>,
    pub exported_at: DateTime<Utc>,
    /// `this_hash` of the last entry. Empty string for an empty log.
    pub terminal_hash: String,
}
