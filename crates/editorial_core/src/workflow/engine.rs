//! Publication lifecycle engine.
//!
//! # Responsibility
//! - Decide whether a requested status transition is legal.
//! - Produce the resulting lifecycle state for the caller to persist.
//!
//! # Invariants
//! - Pure: no hidden state, no I/O, no logging. Identical inputs always
//!   produce identical outputs.
//! - Reviewer notes are overwritten on success, never merged.

use crate::model::status::PublicationStatus;
use crate::workflow::policy::TransitionPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lifecycle-relevant slice of a publication record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleState {
    pub status: PublicationStatus,
    pub reviewer_notes: String,
}

impl LifecycleState {
    /// Initial state of every newly created publication.
    pub fn initial() -> Self {
        Self {
            status: PublicationStatus::Draft,
            reviewer_notes: String::new(),
        }
    }
}

/// Transition rejection reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Input status literal is outside the six-member enumeration.
    InvalidStatus { value: String },
    /// Requested pair is not in the active policy table.
    IllegalTransition {
        from: PublicationStatus,
        to: PublicationStatus,
    },
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus { value } => write!(f, "invalid publication status `{value}`"),
            Self::IllegalTransition { from, to } => {
                write!(f, "Cannot transition from {from} to {to}")
            }
        }
    }
}

impl Error for TransitionError {}

/// Stateless transition executor bound to one policy table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleEngine {
    policy: TransitionPolicy,
}

impl LifecycleEngine {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Validates and executes `current -> target`.
    ///
    /// # Errors
    /// - `IllegalTransition` when the pair is not in the policy table.
    pub fn transition(
        &self,
        current: PublicationStatus,
        target: PublicationStatus,
        notes: impl Into<String>,
    ) -> Result<LifecycleState, TransitionError> {
        if !self.policy.allows(current, target) {
            return Err(TransitionError::IllegalTransition {
                from: current,
                to: target,
            });
        }

        Ok(LifecycleState {
            status: target,
            reviewer_notes: notes.into(),
        })
    }

    /// Wire-level entry point taking status literals.
    ///
    /// # Errors
    /// - `InvalidStatus` when either literal is not an exact wire value;
    ///   `current` is checked first.
    /// - `IllegalTransition` as for [`LifecycleEngine::transition`].
    pub fn transition_wire(
        &self,
        current: &str,
        target: &str,
        notes: impl Into<String>,
    ) -> Result<LifecycleState, TransitionError> {
        let current = parse_status(current)?;
        let target = parse_status(target)?;
        self.transition(current, target, notes)
    }

    /// Applies a requested state on top of a stored one.
    ///
    /// This is the repository-facing contract: stored `{status, notes}` plus
    /// requested `{status, notes}` in, state to persist out.
    pub fn apply(
        &self,
        stored: &LifecycleState,
        requested: LifecycleState,
    ) -> Result<LifecycleState, TransitionError> {
        self.transition(stored.status, requested.status, requested.reviewer_notes)
    }
}

/// Parses a wire status literal into the closed enum.
pub fn parse_status(value: &str) -> Result<PublicationStatus, TransitionError> {
    PublicationStatus::parse(value).ok_or_else(|| TransitionError::InvalidStatus {
        value: value.to_string(),
    })
}
