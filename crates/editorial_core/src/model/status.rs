//! Publication status enumeration.
//!
//! # Responsibility
//! - Define the closed set of editorial lifecycle states.
//! - Own the wire/storage string form of every state.
//!
//! # Invariants
//! - Exactly six states exist; no other value is representable.
//! - Wire literals are upper snake case and stable across releases.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Editorial lifecycle state of a publication.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicationStatus {
    /// Being prepared by the author.
    #[default]
    Draft,
    /// Under editorial review.
    InReview,
    /// Accepted and ready to publish.
    Approved,
    /// Available to readers.
    Published,
    /// Not accepted by review.
    Rejected,
    /// No longer active.
    Archived,
}

impl PublicationStatus {
    /// All states in declaration order.
    pub const ALL: [PublicationStatus; 6] = [
        Self::Draft,
        Self::InReview,
        Self::Approved,
        Self::Published,
        Self::Rejected,
        Self::Archived,
    ];

    /// Stable wire literal (`DRAFT`, `IN_REVIEW`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::InReview => "IN_REVIEW",
            Self::Approved => "APPROVED",
            Self::Published => "PUBLISHED",
            Self::Rejected => "REJECTED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Parses an exact wire literal. Matching is case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(Self::Draft),
            "IN_REVIEW" => Some(Self::InReview),
            "APPROVED" => Some(Self::Approved),
            "PUBLISHED" => Some(Self::Published),
            "REJECTED" => Some(Self::Rejected),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Draft => "Draft - Being prepared",
            Self::InReview => "In Review - Under editorial review",
            Self::Approved => "Approved - Ready to publish",
            Self::Published => "Published - Available to readers",
            Self::Rejected => "Rejected - Not accepted",
            Self::Archived => "Archived - No longer active",
        }
    }
}

impl Display for PublicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::PublicationStatus;

    #[test]
    fn wire_literals_parse_back() {
        for status in PublicationStatus::ALL {
            assert_eq!(PublicationStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(PublicationStatus::parse("draft"), None);
        assert_eq!(PublicationStatus::parse(" DRAFT"), None);
        assert_eq!(PublicationStatus::parse("LIVE"), None);
    }

    #[test]
    fn serde_uses_wire_literals() {
        let json = serde_json::to_string(&PublicationStatus::InReview).unwrap();
        assert_eq!(json, "\"IN_REVIEW\"");
        let decoded: PublicationStatus = serde_json::from_str("\"ARCHIVED\"").unwrap();
        assert_eq!(decoded, PublicationStatus::Archived);
    }
}
