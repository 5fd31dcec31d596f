//! Domain model for editorial publications.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep status representation closed and exhaustive.
//!
//! # Invariants
//! - Every publication is identified by a stable `PublicationId`.
//! - Deletion is represented by soft-delete tombstones, not hard delete.

pub mod publication;
pub mod status;
