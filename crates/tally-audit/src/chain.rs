//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. ledger_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the audit entry

use sha2::{Digest, Sha256};

use tally_contracts::audit::AuditEntry;

use crate::event::ChainedEntry;

/// Compute the SHA-256 hash for one chained audit entry.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `entry` cannot be serialized to JSON, which cannot happen for
/// `AuditEntry` (non-finite floats inside `data` serialize as `null`).
pub fn hash_entry(ledger_id: &str, sequence: u64, entry: &AuditEntry, prev_hash: &str) -> String {
    let entry_json =
        serde_json::to_vec(entry).expect("AuditEntry must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(ledger_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&entry_json);

    hex::encode(hasher.finalize())
}

/// Verify the integrity of a hash chain.
///
/// Valid when every entry's `prev_hash` equals the previous entry's
/// `this_hash` (or `GENESIS_HASH` for the first) and every `this_hash`
/// matches the value recomputed from the entry itself. An empty chain is
/// valid.
pub fn verify_chain(entries: &[ChainedEntry]) -> bool {
    let mut expected_prev = ChainedEntry::GENESIS_HASH.to_string();

    for chained in entries {
        if chained.prev_hash != expected_prev {
            return false;
        }

        let recomputed = hash_entry(
            &chained.ledger_id,
            chained.sequence,
            &chained.entry,
            &chained.prev_hash,
        );
        if chained.this_hash != recomputed {
            return false;
        }

        expected_prev = chained.this_hash.clone();
    }

    true
}
