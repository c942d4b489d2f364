//! JSON-file implementation of `AuditSink`.
//!
//! The log is a single JSON document:
//!
//! ```json
//! { "entries": [ { "agent": "Validation Agent", "user_id": "u-1", ... } ] }
//! ```
//!
//! Every `save` loads the document, appends one entry and rewrites the file.
//! A missing or unreadable document is treated as an empty log. Access is
//! serialized within the process; concurrent writers in other processes are
//! not coordinated.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tally_contracts::{
    audit::AuditEntry,
    error::{TallyError, TallyResult},
    result::ValidationResult,
};
use tally_core::traits::AuditSink;

#[derive(Debug, Default, Serialize, Deserialize)]
struct AuditDocument {
    #[serde(default)]
    entries: Vec<AuditEntry>,
}

/// Per-agent counts and success tally over a whole audit file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditSummary {
    pub total: usize,
    pub by_agent: BTreeMap<String, usize>,
    /// Entries whose `success` is explicitly `true`.
    pub successful: usize,
}

impl AuditSummary {
    /// `successful / total`, or `None` for an empty log.
    pub fn success_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.successful as f64 / self.total as f64)
    }
}

/// An audit sink that persists entries to a JSON document on disk.
pub struct JsonFileAuditSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries matching the optional filters, oldest first.
    ///
    /// `limit` keeps only the most recent `n` matches.
    pub fn entries(
        &self,
        agent: Option<&str>,
        user_id: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<AuditEntry> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries: Vec<AuditEntry> = self
            .load()
            .entries
            .into_iter()
            .filter(|e| agent.map_or(true, |a| e.agent == a))
            .filter(|e| user_id.map_or(true, |u| e.user_id == u))
            .collect();

        if let Some(n) = limit {
            let skip = entries.len().saturating_sub(n);
            entries.drain(..skip);
        }
        entries
    }

    /// The most recent entry, optionally restricted to one agent.
    pub fn last_entry(&self, agent: Option<&str>) -> Option<AuditEntry> {
        self.entries(agent, None, Some(1)).pop()
    }

    pub fn count(&self, agent: Option<&str>) -> usize {
        self.entries(agent, None, None).len()
    }

    pub fn summary(&self) -> AuditSummary {
        let entries = self.entries(None, None, None);
        let mut by_agent = BTreeMap::new();
        for entry in &entries {
            *by_agent.entry(entry.agent.clone()).or_insert(0) += 1;
        }
        AuditSummary {
            total: entries.len(),
            by_agent,
            successful: entries.iter().filter(|e| e.success == Some(true)).count(),
        }
    }

    /// Replace the document with an empty log.
    pub fn clear(&self) -> TallyResult<()> {
        let _guard = self.lock.lock().map_err(|e| TallyError::AuditWriteFailed {
            reason: format!("audit file lock poisoned: {}", e),
        })?;
        self.store(&AuditDocument::default())
    }

    fn load(&self) -> AuditDocument {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "audit file not readable; starting empty");
                return AuditDocument::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "audit file is not a valid log; starting empty");
            AuditDocument::default()
        })
    }

    fn store(&self, document: &AuditDocument) -> TallyResult<()> {
        let json = serde_json::to_string_pretty(document).map_err(|e| TallyError::AuditWriteFailed {
            reason: format!("failed to serialize audit log: {}", e),
        })?;
        fs::write(&self.path, json).map_err(|e| TallyError::AuditWriteFailed {
            reason: format!("failed to write audit file '{}': {}", self.path.display(), e),
        })
    }
}

impl AuditSink for JsonFileAuditSink {
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

        let _guard = self.lock.lock().map_err(|e| TallyError::AuditWriteFailed {
            reason: format!("audit file lock poisoned: {}", e),
        })?;

        let mut document = self.load();
        document.entries.push(entry.clone());
        self.store(&document)?;

        debug!(
            path = %self.path.display(),
            entry_count = document.entries.len(),
            agent = %agent_name,
            "audit entry saved"
        );

        Ok(entry)
    }
}
