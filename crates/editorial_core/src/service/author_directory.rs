//! Author existence lookups.
//!
//! Authors are owned by a separate service; the publication core only needs
//! to know whether an author id refers to a known author.

use crate::model::publication::AuthorId;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lookup failure raised by an author directory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorLookupError(pub String);

impl Display for AuthorLookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "author lookup failed: {}", self.0)
    }
}

impl Error for AuthorLookupError {}

/// Source of truth for author existence.
pub trait AuthorDirectory {
    fn author_exists(&self, author_id: AuthorId) -> Result<bool, AuthorLookupError>;
}

/// Fixed in-memory author set, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorDirectory {
    known: BTreeSet<AuthorId>,
}

impl StaticAuthorDirectory {
    pub fn new(known: impl IntoIterator<Item = AuthorId>) -> Self {
        Self {
            known: known.into_iter().collect(),
        }
    }
}

impl AuthorDirectory for StaticAuthorDirectory {
    fn author_exists(&self, author_id: AuthorId) -> Result<bool, AuthorLookupError> {
        Ok(self.known.contains(&author_id))
    }
}

/// Directory that accepts every author id.
///
/// Used when the authors service is not wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyAuthorDirectory;

impl AuthorDirectory for AnyAuthorDirectory {
    fn author_exists(&self, _author_id: AuthorId) -> Result<bool, AuthorLookupError> {
        Ok(true)
    }
}
