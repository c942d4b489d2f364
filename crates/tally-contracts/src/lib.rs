//! # tally-contracts
//!
//! Shared types for the TALLY expense policy engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod audit;
pub mod error;
pub mod expense;
pub mod result;
