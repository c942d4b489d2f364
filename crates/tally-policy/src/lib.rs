//! # tally-policy
//!
//! The decision logic of the TALLY expense engine.
//!
//! ## Overview
//!
//! Evaluation is three pure steps over one claim:
//!
//! 1. [`normalize`] coerces the raw amount and category into canonical form.
//! 2. [`evaluate`] runs the eight expense rules and collects issues, flags
//!    and suggested actions.
//! 3. [`resolve_status`] reduces the flags to exactly one [`Status`].
//!
//! Limits come from a [`PolicyConfig`] passed in by value, so concurrent
//! evaluations with different overrides never interfere.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use tally_policy::{evaluate, normalize, resolve_status, PolicyConfig};
//!
//! let policy = PolicyConfig::default().resolve(ctx.policy_overrides.as_ref())?;
//! let normalized = normalize(&expense, &ctx);
//! let findings = evaluate(&expense, &ctx, &normalized, &policy);
//! let status = resolve_status(&findings.flags, findings.auto_approved);
//! ```
//!
//! [`Status`]: tally_contracts::result::Status

pub mod config;
pub mod normalize;
pub mod rules;
pub mod status;

pub use config::PolicyConfig;
pub use normalize::{normalize, NormalizedExpense};
pub use rules::{evaluate, Findings};
pub use status::resolve_status;

// ── Tests ─────────────────────────────────────────────────────────────────────
