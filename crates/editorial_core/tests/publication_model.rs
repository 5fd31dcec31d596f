use editorial_core::{
    LifecycleState, Publication, PublicationStatus, PublicationValidationError,
};
use uuid::Uuid;

#[test]
fn new_publication_sets_defaults() {
    let publication = Publication::new("Title", "Body", 4);

    assert!(!publication.id.is_nil());
    assert_eq!(publication.status, PublicationStatus::Draft);
    assert_eq!(publication.reviewer_notes, "");
    assert_eq!(publication.language, "ES");
    assert_eq!(publication.views_count, 0);
    assert_eq!(publication.published_at, None);
    assert_eq!(publication.created_at, publication.updated_at);
    assert!(publication.is_active);
    assert_eq!(publication.lifecycle_state(), LifecycleState::initial());
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = Publication::with_id(Uuid::nil(), "Title", "Body", 1).unwrap_err();
    assert_eq!(err, PublicationValidationError::NilId);
}

#[test]
fn validate_counts_characters_not_bytes() {
    let mut publication = Publication::new("é".repeat(500), "Body", 1);
    assert!(publication.validate().is_ok());

    publication.reviewer_notes = "n".repeat(1001);
    assert_eq!(
        publication.validate().unwrap_err(),
        PublicationValidationError::FieldTooLong {
            field: "reviewerNotes",
            max_chars: 1000,
            actual_chars: 1001,
        }
    );
}

#[test]
fn apply_lifecycle_overwrites_notes_and_stamps_publication() {
    let mut publication = Publication::new("Title", "Body", 1);
    publication.reviewer_notes = "old".to_string();

    publication.apply_lifecycle(
        LifecycleState {
            status: PublicationStatus::Published,
            reviewer_notes: String::new(),
        },
        42,
    );
    assert_eq!(publication.status, PublicationStatus::Published);
    assert_eq!(publication.reviewer_notes, "");
    assert_eq!(publication.published_at, Some(42));
    assert_eq!(publication.updated_at, 42);

    publication.apply_lifecycle(
        LifecycleState {
            status: PublicationStatus::Archived,
            reviewer_notes: "done".to_string(),
        },
        99,
    );
    assert_eq!(publication.published_at, Some(42));
}

#[test]
fn serialization_uses_camel_case_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut publication = Publication::with_id(id, "Title", "Body", 9).unwrap();
    publication.status = PublicationStatus::InReview;
    publication.reviewer_notes = "check".to_string();

    let json = serde_json::to_value(&publication).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["authorId"], 9);
    assert_eq!(json["status"], "IN_REVIEW");
    assert_eq!(json["reviewerNotes"], "check");
    assert_eq!(json["isActive"], true);
    assert!(json["rejectionReason"].is_null());

    let decoded: Publication = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, publication);
}

#[test]
fn status_descriptions_are_human_readable() {
    assert_eq!(
        PublicationStatus::Approved.description(),
        "Approved - Ready to publish"
    );
    assert_eq!(PublicationStatus::default(), PublicationStatus::Draft);
}
