use editorial_core::db::open_db_in_memory;
use editorial_core::{
    Publication, PublicationFilter, PublicationListQuery, PublicationRepository,
    PublicationStatus, PublicationValidationError, RepoError, SqlitePublicationRepository,
};
use rusqlite::Connection;

fn publication(title: &str, author_id: i64, created_at: i64) -> Publication {
    let mut publication = Publication::new(title, "body", author_id);
    publication.created_at = created_at;
    publication.updated_at = created_at;
    publication
}

#[test]
fn create_and_get_preserves_every_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let mut original = Publication::new("Rust in Production", "long body", 7);
    original.description = Some("case study".to_string());
    original.keywords = Some("rust, systems".to_string());
    original.category = Some("engineering".to_string());
    original.language = "EN".to_string();
    original.status = PublicationStatus::Approved;
    original.reviewer_notes = "ship it".to_string();
    original.rejection_reason = Some("earlier draft was thin".to_string());
    original.views_count = 3;
    original.published_at = Some(1_700_000_000_000);
    let id = repo.create_publication(&original).unwrap();

    let loaded = repo.get_publication(id, false).unwrap().unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn create_rejects_invalid_records_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let blank = Publication::new("   ", "body", 1);
    let err = repo.create_publication(&blank).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PublicationValidationError::BlankTitle)
    ));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let missing = Publication::new("missing", "body", 1);
    let err = repo.update_publication(&missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing.id));
}

#[test]
fn update_overwrites_status_and_notes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let mut record = Publication::new("draft", "body", 1);
    repo.create_publication(&record).unwrap();

    record.status = PublicationStatus::InReview;
    record.reviewer_notes = "please review".to_string();
    repo.update_publication(&record).unwrap();

    let loaded = repo.get_publication(record.id, false).unwrap().unwrap();
    assert_eq!(loaded.status, PublicationStatus::InReview);
    assert_eq!(loaded.reviewer_notes, "please review");
}

#[test]
fn soft_deleted_rows_are_hidden_by_default() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let kept = publication("kept", 1, 1_000);
    let removed = publication("removed", 1, 2_000);
    repo.create_publication(&kept).unwrap();
    repo.create_publication(&removed).unwrap();
    repo.soft_delete_publication(removed.id, 5_000).unwrap();
    repo.soft_delete_publication(removed.id, 5_000).unwrap();

    assert!(repo.get_publication(removed.id, false).unwrap().is_none());
    let tombstone = repo.get_publication(removed.id, true).unwrap().unwrap();
    assert!(!tombstone.is_active);
    assert_eq!(tombstone.updated_at, 5_000);

    let visible = repo
        .list_publications(&PublicationListQuery::default())
        .unwrap();
    assert_eq!(visible.total_items, 1);
    assert_eq!(visible.items[0].id, kept.id);

    let all = PublicationFilter {
        include_inactive: true,
        ..PublicationFilter::default()
    };
    assert_eq!(repo.count_publications(&all).unwrap(), 2);
}

#[test]
fn soft_delete_missing_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let ghost = Publication::new("ghost", "body", 1);
    let err = repo.soft_delete_publication(ghost.id, 5_000).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost.id));
}

#[test]
fn list_pages_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    for index in 0..5 {
        let record = publication(&format!("post {index}"), 1, 1_000 + index);
        repo.create_publication(&record).unwrap();
    }

    let first = repo
        .list_publications(&PublicationListQuery {
            page: 0,
            size: Some(2),
            ..PublicationListQuery::default()
        })
        .unwrap();
    assert_eq!(first.total_items, 5);
    assert_eq!(first.total_pages, 3);
    let titles: Vec<_> = first.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["post 4", "post 3"]);

    let last = repo
        .list_publications(&PublicationListQuery {
            page: 2,
            size: Some(2),
            ..PublicationListQuery::default()
        })
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].title, "post 0");
}

#[test]
fn filters_by_status_author_and_keyword() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let mut reviewed = publication("Borrow Checker Basics", 1, 1_000);
    reviewed.status = PublicationStatus::InReview;
    let mut described = publication("Untitled", 2, 2_000);
    described.description = Some("All about the BORROW checker".to_string());
    let other = publication("Async runtimes", 2, 3_000);
    for record in [&reviewed, &described, &other] {
        repo.create_publication(record).unwrap();
    }

    let by_status = PublicationFilter {
        status: Some(PublicationStatus::InReview),
        ..PublicationFilter::default()
    };
    assert_eq!(repo.count_publications(&by_status).unwrap(), 1);

    let by_author = PublicationFilter {
        author_id: Some(2),
        ..PublicationFilter::default()
    };
    assert_eq!(repo.count_publications(&by_author).unwrap(), 2);

    let by_keyword = PublicationListQuery {
        filter: PublicationFilter {
            keyword: Some("borrow".to_string()),
            ..PublicationFilter::default()
        },
        ..PublicationListQuery::default()
    };
    let hits = repo.list_publications(&by_keyword).unwrap();
    let ids: Vec<_> = hits.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![described.id, reviewed.id]);
}

#[test]
fn keyword_wildcards_match_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    repo.create_publication(&publication("100% coverage", 1, 1_000))
        .unwrap();
    repo.create_publication(&publication("1000 tests", 1, 2_000))
        .unwrap();

    let filter = PublicationFilter {
        keyword: Some("0%".to_string()),
        ..PublicationFilter::default()
    };
    assert_eq!(repo.count_publications(&filter).unwrap(), 1);
}

#[test]
fn keyword_search_folds_non_ascii_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let mut ethics = publication("ÉTICA PERIODÍSTICA", 1, 1_000);
    ethics.description = Some("Guía de ÁMBITO editorial".to_string());
    repo.create_publication(&ethics).unwrap();
    repo.create_publication(&publication("Política local", 1, 2_000))
        .unwrap();

    let count = |keyword: &str| {
        let filter = PublicationFilter {
            keyword: Some(keyword.to_string()),
            ..PublicationFilter::default()
        };
        repo.count_publications(&filter).unwrap()
    };
    assert_eq!(count("ÉTICA"), 1);
    assert_eq!(count("ética"), 1);
    assert_eq!(count("Periodística"), 1);
    assert_eq!(count("ámbito"), 1);
    assert_eq!(count("TICA"), 2);
}

#[test]
fn increment_view_count_returns_new_total() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let record = Publication::new("popular", "body", 1);
    repo.create_publication(&record).unwrap();

    assert_eq!(repo.increment_view_count(record.id).unwrap(), 1);
    assert_eq!(repo.increment_view_count(record.id).unwrap(), 2);

    repo.soft_delete_publication(record.id, 5_000).unwrap();
    let err = repo.increment_view_count(record.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn invalid_persisted_status_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePublicationRepository::try_new(&conn).unwrap();

    let record = Publication::new("tampered", "body", 1);
    repo.create_publication(&record).unwrap();
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE publications SET status = 'LIVE' WHERE id = ?1;",
        [record.id.to_string()],
    )
    .unwrap();

    let err = repo.get_publication(record.id, false).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("LIVE")));
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM publications;", [], |row| row.get(0))
        .unwrap()
}
