//! Error types for the TALLY validation pipeline.
//!
//! Almost nothing in an evaluation is an error: bad amounts, unknown
//! categories and missing fields are reported as findings on the result.
//! What remains here are caller contract violations and sink failures.

use thiserror::Error;

/// The unified error type for the TALLY crates.
#[derive(Debug, Error)]
pub enum TallyError {
    /// A policy value or policy document is malformed.
    ///
    /// Raised for override values of the wrong type and for TOML policy
    /// files that cannot be read or parsed. This is the only error a
    /// caller of `Validator::validate` can observe.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// An audit sink could not persist an entry.
    ///
    /// The validator logs and discards this; sinks still report it so
    /// direct callers can react.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// A serialized result did not conform to the published result schema.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },
}

/// Convenience alias used throughout the TALLY crates.
pub type TallyResult<T> = Result<T, TallyError>;
