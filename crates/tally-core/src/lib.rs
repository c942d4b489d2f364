//! # tally-core
//!
//! The expense validation pipeline for TALLY.
//!
//! This crate provides:
//! - The `AuditSink` trait every audit backend implements
//! - The `Validator` that runs normalization, the rule set and status
//!   resolution, then hands the result to the sink
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::{traits::NullAuditSink, Validator};
//!
//! let validator = Validator::with_defaults(Box::new(NullAuditSink));
//! let result = validator.validate(&expense, &context)?;
//! ```

pub mod traits;
pub mod validator;

pub use validator::Validator;

// ── Tests ────────────────────────────────────────────────────────────────────
