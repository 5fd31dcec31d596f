//! Publication use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/search/status/delete entry points for callers.
//! - Route every status change through the lifecycle engine.
//! - Check author existence through the `AuthorDirectory` seam.
//!
//! # Invariants
//! - New publications are always persisted as `DRAFT` with empty notes.
//! - A failed transition leaves the stored record untouched.
//! - Service layer remains storage-agnostic.

use crate::model::publication::{
    normalize_keywords, now_epoch_ms, AuthorId, Publication, PublicationId,
    PublicationValidationError,
};
use crate::model::status::PublicationStatus;
use crate::repo::publication_repo::{
    Page, PublicationFilter, PublicationListQuery, PublicationRepository, RepoError,
};
use crate::service::author_directory::{AuthorDirectory, AuthorLookupError};
use crate::workflow::config::WorkflowConfig;
use crate::workflow::engine::{LifecycleEngine, LifecycleState, TransitionError};
use crate::workflow::policy::TransitionPolicy;
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, PublicationServiceError>;

/// Service error for publication use-cases.
#[derive(Debug)]
pub enum PublicationServiceError {
    /// Request or record failed field validation.
    Validation(PublicationValidationError),
    /// Referenced author is unknown to the author directory.
    AuthorNotFound(AuthorId),
    /// Target publication does not exist or is inactive.
    PublicationNotFound(PublicationId),
    /// Lifecycle engine rejected the status change.
    Transition(TransitionError),
    /// Author directory backend failed.
    AuthorLookup(AuthorLookupError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl PublicationServiceError {
    /// Stable snake_case error code for envelopes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::AuthorNotFound(_) => "author_not_found",
            Self::PublicationNotFound(_) => "publication_not_found",
            Self::Transition(TransitionError::InvalidStatus { .. }) => "invalid_status",
            Self::Transition(TransitionError::IllegalTransition { .. }) => "illegal_transition",
            Self::AuthorLookup(_) => "author_lookup_failed",
            Self::Repo(_) => "storage_failed",
        }
    }

    /// Whether the caller's request was at fault (4xx-equivalent).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::AuthorLookup(_) | Self::Repo(_))
    }
}

impl Display for PublicationServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::AuthorNotFound(author_id) => write!(f, "Author not found with id: {author_id}"),
            Self::PublicationNotFound(id) => write!(f, "Publication not found with id: {id}"),
            Self::Transition(err) => write!(f, "{err}"),
            Self::AuthorLookup(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PublicationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Transition(err) => Some(err),
            Self::AuthorLookup(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::AuthorNotFound(_) | Self::PublicationNotFound(_) => None,
        }
    }
}

impl From<RepoError> for PublicationServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PublicationNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<PublicationValidationError> for PublicationServiceError {
    fn from(value: PublicationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<TransitionError> for PublicationServiceError {
    fn from(value: TransitionError) -> Self {
        Self::Transition(value)
    }
}

impl From<AuthorLookupError> for PublicationServiceError {
    fn from(value: AuthorLookupError) -> Self {
        Self::AuthorLookup(value)
    }
}

/// Request model for creating a publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublicationRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content: String,
    pub author_id: AuthorId,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Falls back to `ES` when absent or blank.
    #[serde(default)]
    pub language: Option<String>,
}

/// Request model for a status transition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: PublicationStatus,
    /// Replaces stored notes; absent means empty.
    #[serde(default)]
    pub reviewer_notes: String,
    /// Replaces the stored rejection reason only when present.
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl UpdateStatusRequest {
    pub fn new(status: PublicationStatus, reviewer_notes: impl Into<String>) -> Self {
        Self {
            status,
            reviewer_notes: reviewer_notes.into(),
            rejection_reason: None,
        }
    }
}

/// Zero-based page selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: Option<u32>,
}

/// Use-case service wrapper for publication operations.
pub struct PublicationService<R: PublicationRepository, A: AuthorDirectory> {
    repo: R,
    authors: A,
    engine: LifecycleEngine,
    clock: fn() -> i64,
}

impl<R: PublicationRepository, A: AuthorDirectory> PublicationService<R, A> {
    /// Creates a service using the given repository, author directory and
    /// workflow configuration.
    pub fn new(repo: R, authors: A, config: WorkflowConfig) -> Self {
        Self {
            repo,
            authors,
            engine: LifecycleEngine::new(TransitionPolicy::from_config(&config)),
            clock: now_epoch_ms,
        }
    }

    /// Replaces the wall clock used for `updated_at`/`published_at` stamps.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a new draft publication.
    ///
    /// # Errors
    /// - `Validation` for blank/oversized fields or non-positive author ids.
    /// - `AuthorNotFound` when the author directory does not know the author.
    pub fn create_publication(
        &self,
        request: &CreatePublicationRequest,
    ) -> ServiceResult<Publication> {
        info!(
            "event=publication_create module=service status=start author_id={}",
            request.author_id
        );

        let mut publication = Publication::new(
            request.title.trim(),
            request.content.as_str(),
            request.author_id,
        );
        publication.created_at = (self.clock)();
        publication.updated_at = publication.created_at;
        publication.description = non_blank(request.description.as_deref());
        publication.keywords = request.keywords.as_deref().and_then(normalize_keywords);
        publication.category = non_blank(request.category.as_deref());
        if let Some(language) = non_blank(request.language.as_deref()) {
            publication.language = language;
        }
        publication.validate()?;

        if !self.authors.author_exists(request.author_id)? {
            warn!(
                "event=publication_create module=service status=error error_code=author_not_found author_id={}",
                request.author_id
            );
            return Err(PublicationServiceError::AuthorNotFound(request.author_id));
        }

        let id = self.repo.create_publication(&publication)?;
        info!("event=publication_create module=service status=ok publication_id={id}");
        Ok(publication)
    }

    /// Gets one active publication by ID.
    pub fn get_publication(&self, id: PublicationId) -> ServiceResult<Publication> {
        debug!("event=publication_get module=service publication_id={id}");
        self.repo
            .get_publication(id, false)?
            .ok_or(PublicationServiceError::PublicationNotFound(id))
    }

    /// Gets one active publication and counts the read as a view.
    pub fn view_publication(&self, id: PublicationId) -> ServiceResult<Publication> {
        self.repo.increment_view_count(id)?;
        self.get_publication(id)
    }

    /// Lists active publications.
    pub fn list_publications(&self, page: PageRequest) -> ServiceResult<Page<Publication>> {
        self.list(PublicationFilter::default(), page)
    }

    /// Lists active publications written by `author_id`.
    pub fn list_by_author(
        &self,
        author_id: AuthorId,
        page: PageRequest,
    ) -> ServiceResult<Page<Publication>> {
        let filter = PublicationFilter {
            author_id: Some(author_id),
            ..PublicationFilter::default()
        };
        self.list(filter, page)
    }

    /// Lists active publications currently in `status`.
    pub fn list_by_status(
        &self,
        status: PublicationStatus,
        page: PageRequest,
    ) -> ServiceResult<Page<Publication>> {
        let filter = PublicationFilter {
            status: Some(status),
            ..PublicationFilter::default()
        };
        self.list(filter, page)
    }

    /// Lists active publications by `author_id` currently in `status`.
    pub fn list_by_author_and_status(
        &self,
        author_id: AuthorId,
        status: PublicationStatus,
        page: PageRequest,
    ) -> ServiceResult<Page<Publication>> {
        let filter = PublicationFilter {
            author_id: Some(author_id),
            status: Some(status),
            ..PublicationFilter::default()
        };
        self.list(filter, page)
    }

    /// Case-insensitive search over title and description.
    pub fn search_publications(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> ServiceResult<Page<Publication>> {
        let filter = PublicationFilter {
            keyword: Some(keyword.to_string()),
            ..PublicationFilter::default()
        };
        self.list(filter, page)
    }

    /// Moves a publication to a new status through the lifecycle engine.
    ///
    /// # Contract
    /// - Reviewer notes always overwrite the stored notes.
    /// - `published_at` is stamped whenever the target is `PUBLISHED`.
    /// - `rejection_reason` is replaced only when the request carries one.
    pub fn update_status(
        &self,
        id: PublicationId,
        request: &UpdateStatusRequest,
    ) -> ServiceResult<Publication> {
        info!(
            "event=publication_transition module=service status=start publication_id={id} to={}",
            request.status
        );

        let mut publication = self.get_publication(id)?;
        let from = publication.status;
        let requested = LifecycleState {
            status: request.status,
            reviewer_notes: request.reviewer_notes.clone(),
        };
        let next = self
            .engine
            .apply(&publication.lifecycle_state(), requested)
            .map_err(|err| {
                error!(
                    "event=publication_transition module=service status=error publication_id={id} error_code=illegal_transition from={from} to={}",
                    request.status
                );
                err
            })?;

        publication.apply_lifecycle(next, (self.clock)());
        if let Some(reason) = &request.rejection_reason {
            publication.rejection_reason = Some(reason.clone());
        }
        self.repo.update_publication(&publication)?;

        info!(
            "event=publication_transition module=service status=ok publication_id={id} from={from} to={}",
            publication.status
        );
        Ok(publication)
    }

    /// Soft-deletes a publication by ID.
    pub fn delete_publication(&self, id: PublicationId) -> ServiceResult<()> {
        info!("event=publication_delete module=service status=start publication_id={id}");
        self.repo.soft_delete_publication(id, (self.clock)())?;
        info!("event=publication_delete module=service status=ok publication_id={id}");
        Ok(())
    }

    pub fn total_publications(&self) -> ServiceResult<u64> {
        Ok(self.repo.count_publications(&PublicationFilter::default())?)
    }

    pub fn total_by_status(&self, status: PublicationStatus) -> ServiceResult<u64> {
        let filter = PublicationFilter {
            status: Some(status),
            ..PublicationFilter::default()
        };
        Ok(self.repo.count_publications(&filter)?)
    }

    pub fn total_by_author(&self, author_id: AuthorId) -> ServiceResult<u64> {
        let filter = PublicationFilter {
            author_id: Some(author_id),
            ..PublicationFilter::default()
        };
        Ok(self.repo.count_publications(&filter)?)
    }

    pub fn total_by_author_and_status(
        &self,
        author_id: AuthorId,
        status: PublicationStatus,
    ) -> ServiceResult<u64> {
        let filter = PublicationFilter {
            author_id: Some(author_id),
            status: Some(status),
            ..PublicationFilter::default()
        };
        Ok(self.repo.count_publications(&filter)?)
    }

    fn list(
        &self,
        filter: PublicationFilter,
        page: PageRequest,
    ) -> ServiceResult<Page<Publication>> {
        debug!(
            "event=publication_list module=service page={} size={:?}",
            page.page, page.size
        );
        let query = PublicationListQuery {
            filter,
            page: page.page,
            size: page.size,
        };
        Ok(self.repo.list_publications(&query)?)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
