//! Publication repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and paging APIs over `publications` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Publication::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Inactive (soft-deleted) rows are hidden unless explicitly requested.

use crate::db::migrations::ensure_latest;
use crate::db::{register_functions, DbError};
use crate::model::publication::{
    AuthorId, Publication, PublicationId, PublicationValidationError,
};
use crate::model::status::PublicationStatus;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const PAGE_SIZE_DEFAULT: u32 = 10;
pub const PAGE_SIZE_MAX: u32 = 100;

const PUBLICATION_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    content,
    author_id,
    status,
    keywords,
    category,
    language,
    views_count,
    reviewer_notes,
    rejection_reason,
    created_at,
    updated_at,
    published_at,
    is_active
FROM publications";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for publication persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PublicationValidationError),
    Db(DbError),
    NotFound(PublicationId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "Publication not found with id: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted publication data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<PublicationValidationError> for RepoError {
    fn from(value: PublicationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row filters shared by list and count queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationFilter {
    pub status: Option<PublicationStatus>,
    pub author_id: Option<AuthorId>,
    /// Case-insensitive substring match on title or description.
    pub keyword: Option<String>,
    pub include_inactive: bool,
}

/// Query options for listing publications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationListQuery {
    pub filter: PublicationFilter,
    /// Zero-based page index.
    pub page: u32,
    /// `None`/`0` fall back to [`PAGE_SIZE_DEFAULT`]; capped at [`PAGE_SIZE_MAX`].
    pub size: Option<u32>,
}

/// One page of results plus totals for the unpaged query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Repository interface for publication persistence.
pub trait PublicationRepository {
    fn create_publication(&self, publication: &Publication) -> RepoResult<PublicationId>;
    fn update_publication(&self, publication: &Publication) -> RepoResult<()>;
    fn get_publication(
        &self,
        id: PublicationId,
        include_inactive: bool,
    ) -> RepoResult<Option<Publication>>;
    fn list_publications(&self, query: &PublicationListQuery) -> RepoResult<Page<Publication>>;
    fn count_publications(&self, filter: &PublicationFilter) -> RepoResult<u64>;
    /// Marks a publication inactive and stamps `updated_at` with `now_ms`.
    fn soft_delete_publication(&self, id: PublicationId, now_ms: i64) -> RepoResult<()>;
    /// Increments the view counter of an active publication and returns the new value.
    fn increment_view_count(&self, id: PublicationId) -> RepoResult<u64>;
}

/// SQLite-backed publication repository.
pub struct SqlitePublicationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePublicationRepository<'conn> {
    /// Wraps a connection that is already at the latest schema version.
    ///
    /// # Errors
    /// - `RepoError::Db(DbError::SchemaNotReady)` when migrations are missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_latest(conn)?;
        register_functions(conn)?;
        Ok(Self { conn })
    }
}

impl PublicationRepository for SqlitePublicationRepository<'_> {
    fn create_publication(&self, publication: &Publication) -> RepoResult<PublicationId> {
        publication.validate()?;

        self.conn.execute(
            "INSERT INTO publications (
                id,
                title,
                description,
                content,
                author_id,
                status,
                keywords,
                category,
                language,
                views_count,
                reviewer_notes,
                rejection_reason,
                created_at,
                updated_at,
                published_at,
                is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16);",
            params![
                publication.id.to_string(),
                publication.title.as_str(),
                publication.description.as_deref(),
                publication.content.as_str(),
                publication.author_id,
                publication.status.as_str(),
                publication.keywords.as_deref(),
                publication.category.as_deref(),
                publication.language.as_str(),
                views_to_db(publication.views_count)?,
                publication.reviewer_notes.as_str(),
                publication.rejection_reason.as_deref(),
                publication.created_at,
                publication.updated_at,
                publication.published_at,
                bool_to_int(publication.is_active),
            ],
        )?;

        Ok(publication.id)
    }

    fn update_publication(&self, publication: &Publication) -> RepoResult<()> {
        publication.validate()?;

        let changed = self.conn.execute(
            "UPDATE publications
             SET
                title = ?1,
                description = ?2,
                content = ?3,
                author_id = ?4,
                status = ?5,
                keywords = ?6,
                category = ?7,
                language = ?8,
                views_count = ?9,
                reviewer_notes = ?10,
                rejection_reason = ?11,
                updated_at = ?12,
                published_at = ?13,
                is_active = ?14
             WHERE id = ?15;",
            params![
                publication.title.as_str(),
                publication.description.as_deref(),
                publication.content.as_str(),
                publication.author_id,
                publication.status.as_str(),
                publication.keywords.as_deref(),
                publication.category.as_deref(),
                publication.language.as_str(),
                views_to_db(publication.views_count)?,
                publication.reviewer_notes.as_str(),
                publication.rejection_reason.as_deref(),
                publication.updated_at,
                publication.published_at,
                bool_to_int(publication.is_active),
                publication.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(publication.id));
        }

        Ok(())
    }

    fn get_publication(
        &self,
        id: PublicationId,
        include_inactive: bool,
    ) -> RepoResult<Option<Publication>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PUBLICATION_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR is_active = 1);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_inactive)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_publication_row(row)?));
        }

        Ok(None)
    }

    fn list_publications(&self, query: &PublicationListQuery) -> RepoResult<Page<Publication>> {
        let size = normalize_page_size(query.size);
        let total_items = self.count_publications(&query.filter)?;

        let (where_sql, mut bind_values) = build_where(&query.filter);
        let sql = format!(
            "{PUBLICATION_SELECT_SQL}{where_sql}
             ORDER BY created_at DESC, id ASC
             LIMIT ? OFFSET ?"
        );
        bind_values.push(Value::Integer(i64::from(size)));
        bind_values.push(Value::Integer(i64::from(query.page) * i64::from(size)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_publication_row(row)?);
        }

        Ok(Page {
            items,
            page: query.page,
            size,
            total_items,
            total_pages: total_items.div_ceil(u64::from(size)),
        })
    }

    fn count_publications(&self, filter: &PublicationFilter) -> RepoResult<u64> {
        let (where_sql, bind_values) = build_where(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM publications{where_sql}"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }

    fn soft_delete_publication(&self, id: PublicationId, now_ms: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE publications
             SET
                is_active = 0,
                updated_at = ?2
             WHERE id = ?1;",
            params![id.to_string(), now_ms],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn increment_view_count(&self, id: PublicationId) -> RepoResult<u64> {
        let changed = self.conn.execute(
            "UPDATE publications
             SET views_count = views_count + 1
             WHERE id = ?1 AND is_active = 1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        let views: Option<i64> = self
            .conn
            .query_row(
                "SELECT views_count FROM publications WHERE id = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let views = views.ok_or(RepoError::NotFound(id))?;
        views_from_db(views)
    }
}

/// Normalizes page size according to the listing contract.
pub fn normalize_page_size(size: Option<u32>) -> u32 {
    match size {
        Some(0) | None => PAGE_SIZE_DEFAULT,
        Some(value) if value > PAGE_SIZE_MAX => PAGE_SIZE_MAX,
        Some(value) => value,
    }
}

fn build_where(filter: &PublicationFilter) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut bind_values = Vec::new();

    if !filter.include_inactive {
        sql.push_str(" AND is_active = 1");
    }

    if let Some(status) = filter.status {
        sql.push_str(" AND status = ?");
        bind_values.push(Value::Text(status.as_str().to_string()));
    }

    if let Some(author_id) = filter.author_id {
        sql.push_str(" AND author_id = ?");
        bind_values.push(Value::Integer(author_id));
    }

    if let Some(keyword) = filter.keyword.as_deref().map(str::trim) {
        if !keyword.is_empty() {
            let pattern = format!("%{}%", escape_like(&keyword.to_lowercase()));
            sql.push_str(
                " AND (fold_case(title) LIKE ? ESCAPE '\\' OR fold_case(coalesce(description, '')) LIKE ? ESCAPE '\\')",
            );
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }
    }

    (sql, bind_values)
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_publication_row(row: &Row<'_>) -> RepoResult<Publication> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in publications.id"))
    })?;

    let status_text: String = row.get("status")?;
    let status = PublicationStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in publications.status"
        ))
    })?;

    let is_active = match row.get::<_, i64>("is_active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_active value `{other}` in publications.is_active"
            )));
        }
    };

    let publication = Publication {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        content: row.get("content")?,
        author_id: row.get("author_id")?,
        status,
        keywords: row.get("keywords")?,
        category: row.get("category")?,
        language: row.get("language")?,
        views_count: views_from_db(row.get("views_count")?)?,
        reviewer_notes: row.get("reviewer_notes")?,
        rejection_reason: row.get("rejection_reason")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        published_at: row.get("published_at")?,
        is_active,
    };
    publication.validate()?;
    Ok(publication)
}

fn views_to_db(views: u64) -> RepoResult<i64> {
    i64::try_from(views)
        .map_err(|_| RepoError::InvalidData(format!("views_count `{views}` exceeds storage range")))
}

fn views_from_db(views: i64) -> RepoResult<u64> {
    u64::try_from(views).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid views_count `{views}` in publications.views_count"
        ))
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{build_where, escape_like, normalize_page_size, PublicationFilter};
    use crate::model::status::PublicationStatus;

    #[test]
    fn page_size_falls_back_and_caps() {
        assert_eq!(normalize_page_size(None), 10);
        assert_eq!(normalize_page_size(Some(0)), 10);
        assert_eq!(normalize_page_size(Some(25)), 25);
        assert_eq!(normalize_page_size(Some(1_000)), 100);
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn blank_keyword_adds_no_clause() {
        let filter = PublicationFilter {
            keyword: Some("   ".to_string()),
            status: Some(PublicationStatus::Draft),
            ..PublicationFilter::default()
        };
        let (sql, binds) = build_where(&filter);
        assert!(!sql.contains("LIKE"));
        assert_eq!(binds.len(), 1);
    }
}
