//! Transition policy table.
//!
//! # Responsibility
//! - Declare every legal `(from, to)` status pair as static data.
//! - Select between the permissive and strict tables from configuration.
//!
//! # Invariants
//! - The permissive table contains all 36 pairs, identity pairs included.
//! - The strict table contains no identity pairs and no exits from `ARCHIVED`.

use crate::model::status::PublicationStatus::{
    self, Approved, Archived, Draft, InReview, Published, Rejected,
};
use crate::workflow::config::WorkflowConfig;

/// Ordered editorial lifecycle.
const STRICT_TRANSITIONS: &[(PublicationStatus, PublicationStatus)] = &[
    (Draft, InReview),
    (InReview, Approved),
    (InReview, Rejected),
    (Approved, Published),
    (Published, Archived),
    (Rejected, Archived),
];

/// Which table a [`TransitionPolicy`] consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    /// Any status may move to any status.
    Permissive,
    /// Only the ordered editorial lifecycle is allowed.
    Strict,
}

/// Authoritative set of legal transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPolicy {
    mode: PolicyMode,
}

impl TransitionPolicy {
    pub const fn permissive() -> Self {
        Self {
            mode: PolicyMode::Permissive,
        }
    }

    pub const fn strict() -> Self {
        Self {
            mode: PolicyMode::Strict,
        }
    }

    /// Builds the policy selected by `strict_workflow`.
    pub fn from_config(config: &WorkflowConfig) -> Self {
        if config.strict_workflow {
            Self::strict()
        } else {
            Self::permissive()
        }
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    /// Returns whether `(from, to)` is present in the table.
    pub fn allows(&self, from: PublicationStatus, to: PublicationStatus) -> bool {
        match self.mode {
            PolicyMode::Permissive => true,
            PolicyMode::Strict => STRICT_TRANSITIONS.contains(&(from, to)),
        }
    }

    /// Legal targets from `from`, in status declaration order.
    pub fn allowed_targets(&self, from: PublicationStatus) -> Vec<PublicationStatus> {
        PublicationStatus::ALL
            .into_iter()
            .filter(|to| self.allows(from, *to))
            .collect()
    }

    /// Returns whether no transition leaves `from`.
    pub fn is_terminal(&self, from: PublicationStatus) -> bool {
        self.allowed_targets(from).is_empty()
    }

    /// Every legal pair, ordered by source then target declaration order.
    pub fn pairs(&self) -> Vec<(PublicationStatus, PublicationStatus)> {
        PublicationStatus::ALL
            .into_iter()
            .flat_map(|from| {
                self.allowed_targets(from)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

#[cfg(test)]
mod tests {
    use super::{PolicyMode, TransitionPolicy};
    use crate::model::status::PublicationStatus::{self, *};
    use crate::workflow::config::WorkflowConfig;

    #[test]
    fn default_policy_is_permissive() {
        assert_eq!(TransitionPolicy::default().mode(), PolicyMode::Permissive);
        assert_eq!(TransitionPolicy::default().pairs().len(), 36);
    }

    #[test]
    fn from_config_selects_strict_table() {
        let config = WorkflowConfig {
            strict_workflow: true,
        };
        assert_eq!(TransitionPolicy::from_config(&config), TransitionPolicy::strict());
    }

    #[test]
    fn strict_targets_follow_editorial_order() {
        let policy = TransitionPolicy::strict();
        assert_eq!(policy.allowed_targets(Draft), vec![InReview]);
        assert_eq!(policy.allowed_targets(InReview), vec![Approved, Rejected]);
        assert_eq!(policy.allowed_targets(Approved), vec![Published]);
        assert_eq!(policy.allowed_targets(Published), vec![Archived]);
        assert_eq!(policy.allowed_targets(Rejected), vec![Archived]);
        assert!(policy.is_terminal(Archived));
    }

    #[test]
    fn strict_table_has_no_identity_pairs() {
        let policy = TransitionPolicy::strict();
        for status in PublicationStatus::ALL {
            assert!(!policy.allows(status, status), "{status} -> {status}");
        }
        assert_eq!(policy.pairs().len(), 6);
    }
}
