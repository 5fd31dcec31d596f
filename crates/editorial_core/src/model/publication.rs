//! Publication domain model.
//!
//! # Responsibility
//! - Define the canonical publication record managed by the editorial core.
//! - Enforce field-level invariants before persistence.
//!
//! # Invariants
//! - `id` is stable, non-nil, and never reused for another publication.
//! - `status` starts as `DRAFT` and changes only through the lifecycle engine.
//! - `reviewer_notes` is always present; an empty string means "no notes".
//! - `is_active == false` is the soft-delete tombstone.

use crate::model::status::PublicationStatus;
use crate::workflow::engine::LifecycleState;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of a publication.
pub type PublicationId = Uuid;

/// Identifier of an author owned by the external authors service.
pub type AuthorId = i64;

pub const TITLE_MAX_CHARS: usize = 500;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;
pub const KEYWORDS_MAX_CHARS: usize = 500;
pub const CATEGORY_MAX_CHARS: usize = 100;
pub const LANGUAGE_MAX_CHARS: usize = 50;
pub const NOTES_MAX_CHARS: usize = 1000;
pub const DEFAULT_LANGUAGE: &str = "ES";

static KEYWORD_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;]+").expect("valid keyword separator regex"));

/// Field-level validation failures for publication records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationValidationError {
    NilId,
    BlankTitle,
    BlankContent,
    InvalidAuthorId(AuthorId),
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
}

impl Display for PublicationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "publication id cannot be nil"),
            Self::BlankTitle => write!(f, "Title is required"),
            Self::BlankContent => write!(f, "Content is required"),
            Self::InvalidAuthorId(id) => write!(f, "Valid Author ID is required, got {id}"),
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{field} cannot exceed {max_chars} characters (got {actual_chars})"
            ),
        }
    }
}

impl Error for PublicationValidationError {}

/// Canonical publication record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: PublicationId,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub author_id: AuthorId,
    pub status: PublicationStatus,
    /// Normalized comma separated list, see [`normalize_keywords`].
    pub keywords: Option<String>,
    pub category: Option<String>,
    pub language: String,
    pub views_count: u64,
    /// Overwritten on every status transition.
    pub reviewer_notes: String,
    pub rejection_reason: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    /// Unix epoch milliseconds of the latest entry into `PUBLISHED`.
    pub published_at: Option<i64>,
    pub is_active: bool,
}

impl Publication {
    /// Creates a draft publication with a generated stable ID.
    pub fn new(title: impl Into<String>, content: impl Into<String>, author_id: AuthorId) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            content: content.into(),
            author_id,
            status: PublicationStatus::Draft,
            keywords: None,
            category: None,
            language: DEFAULT_LANGUAGE.to_string(),
            views_count: 0,
            reviewer_notes: String::new(),
            rejection_reason: None,
            created_at: now,
            updated_at: now,
            published_at: None,
            is_active: true,
        }
    }

    /// Creates a draft publication with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: PublicationId,
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: AuthorId,
    ) -> Result<Self, PublicationValidationError> {
        if id.is_nil() {
            return Err(PublicationValidationError::NilId);
        }
        let mut publication = Self::new(title, content, author_id);
        publication.id = id;
        Ok(publication)
    }

    /// Validates field-level invariants.
    pub fn validate(&self) -> Result<(), PublicationValidationError> {
        if self.id.is_nil() {
            return Err(PublicationValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(PublicationValidationError::BlankTitle);
        }
        if self.content.trim().is_empty() {
            return Err(PublicationValidationError::BlankContent);
        }
        if self.author_id <= 0 {
            return Err(PublicationValidationError::InvalidAuthorId(self.author_id));
        }

        check_len("title", &self.title, TITLE_MAX_CHARS)?;
        if let Some(description) = &self.description {
            check_len("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        if let Some(keywords) = &self.keywords {
            check_len("keywords", keywords, KEYWORDS_MAX_CHARS)?;
        }
        if let Some(category) = &self.category {
            check_len("category", category, CATEGORY_MAX_CHARS)?;
        }
        check_len("language", &self.language, LANGUAGE_MAX_CHARS)?;
        check_len("reviewerNotes", &self.reviewer_notes, NOTES_MAX_CHARS)?;
        if let Some(reason) = &self.rejection_reason {
            check_len("rejectionReason", reason, NOTES_MAX_CHARS)?;
        }

        Ok(())
    }

    /// Lifecycle-relevant projection consumed by the workflow engine.
    pub fn lifecycle_state(&self) -> LifecycleState {
        LifecycleState {
            status: self.status,
            reviewer_notes: self.reviewer_notes.clone(),
        }
    }

    /// Applies an engine result and stamps timestamps.
    ///
    /// `published_at` is refreshed whenever the new status is `PUBLISHED`.
    pub fn apply_lifecycle(&mut self, state: LifecycleState, now_ms: i64) {
        if state.status == PublicationStatus::Published {
            self.published_at = Some(now_ms);
        }
        self.status = state.status;
        self.reviewer_notes = state.reviewer_notes;
        self.updated_at = now_ms;
    }

    /// One-line human summary used by listing views.
    pub fn summary(&self) -> String {
        format!(
            "{} (Status: {}, Author ID: {})",
            self.title,
            self.status.description(),
            self.author_id
        )
    }
}

/// Normalizes a free-form keyword list.
///
/// Splits on `,`/`;`, trims, lowercases and de-duplicates entries, then joins
/// them with `", "` in sorted order. Returns `None` when nothing remains.
pub fn normalize_keywords(raw: &str) -> Option<String> {
    let unique = KEYWORD_SEPARATOR_RE
        .split(raw)
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect::<BTreeSet<_>>();
    if unique.is_empty() {
        return None;
    }
    Some(unique.into_iter().collect::<Vec<_>>().join(", "))
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn check_len(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), PublicationValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(PublicationValidationError::FieldTooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::normalize_keywords;

    #[test]
    fn normalize_keywords_dedupes_and_sorts() {
        assert_eq!(
            normalize_keywords(" Rust; editing,, rust ,Review").as_deref(),
            Some("editing, review, rust")
        );
    }

    #[test]
    fn normalize_keywords_returns_none_for_separators_only() {
        assert_eq!(normalize_keywords(" ,; , "), None);
    }
}
