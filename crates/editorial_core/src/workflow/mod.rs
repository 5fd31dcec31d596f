//! Publication lifecycle workflow.
//!
//! # Responsibility
//! - Hold the static transition policy table.
//! - Validate and execute status transitions as a pure computation.
//!
//! # Invariants
//! - The workflow never persists anything; callers own the record.
//! - Default configuration is permissive.

pub mod config;
pub mod engine;
pub mod policy;
