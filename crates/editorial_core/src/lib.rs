//! Core domain logic for the editorial platform.
//! This crate is the single source of truth for publication lifecycle rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod workflow;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::publication::{
    normalize_keywords, AuthorId, Publication, PublicationId, PublicationValidationError,
};
pub use model::status::PublicationStatus;
pub use repo::publication_repo::{
    Page, PublicationFilter, PublicationListQuery, PublicationRepository, RepoError, RepoResult,
    SqlitePublicationRepository,
};
pub use service::author_directory::{
    AnyAuthorDirectory, AuthorDirectory, AuthorLookupError, StaticAuthorDirectory,
};
pub use service::publication_service::{
    CreatePublicationRequest, PageRequest, PublicationService, PublicationServiceError,
    ServiceResult, UpdateStatusRequest,
};
pub use workflow::config::{ConfigError, WorkflowConfig};
pub use workflow::engine::{parse_status, LifecycleEngine, LifecycleState, TransitionError};
pub use workflow::policy::{PolicyMode, TransitionPolicy};

/// Validates and executes one status transition under `config`.
///
/// Convenience wrapper over [`LifecycleEngine::transition`] for callers that
/// do not keep an engine around.
pub fn transition(
    config: &WorkflowConfig,
    current: PublicationStatus,
    target: PublicationStatus,
    notes: impl Into<String>,
) -> Result<LifecycleState, TransitionError> {
    LifecycleEngine::new(TransitionPolicy::from_config(config)).transition(current, target, notes)
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
