use crate::common::{
    content_record, initialize_query, MemoryConnector, Record, RecordingObserver,
};
use bson::{doc, oid::ObjectId};
use manoyukti::content::query::Skipped;
use manoyukti::db::StoreError;
use std::sync::Arc;

#[tokio::test]
async fn test_list_all_when_one_undecodable_record_expect_two_valid_contents() {
    let first = ObjectId::new();
    let second = ObjectId::new();
    let observer = Arc::new(RecordingObserver::default());
    let query = initialize_query(MemoryConnector::new(vec![
        content_record(first, "First"),
        Record::Undecodable("invalid utf-8 in field `title`".to_owned()),
        content_record(second, "Second"),
    ]))
    .with_observer(observer.clone());

    let actual = query.list_all().await.unwrap();

    assert_eq!(actual.len(), 2);
    assert_eq!(actual[0].id, first.to_hex());
    assert_eq!(actual[0].title, "First");
    assert_eq!(actual[1].id, second.to_hex());
    assert_eq!(
        *observer.skipped.lock().unwrap(),
        vec![Skipped::Undecodable("invalid utf-8 in field `title`".to_owned())]
    );
}

#[tokio::test]
async fn test_list_all_when_record_has_no_usable_id_expect_skipped() {
    let observer = Arc::new(RecordingObserver::default());
    let query = initialize_query(MemoryConnector::new(vec![
        Record::Valid(doc! { "_id": 7_i32, "title": "Numeric id" }),
        Record::Valid(doc! { "_id": "kept" }),
    ]))
    .with_observer(observer.clone());

    let actual = query.list_all().await.unwrap();

    assert_eq!(actual.len(), 1);
    assert_eq!(actual[0].id, "kept");
    assert_eq!(*observer.skipped.lock().unwrap(), vec![Skipped::MissingId]);
}

#[tokio::test]
async fn test_list_all_when_cursor_fails_mid_scan_expect_error_not_partial_list() {
    let query = initialize_query(MemoryConnector::new(vec![
        content_record(ObjectId::new(), "First"),
        Record::CursorFailure("connection reset by peer".to_owned()),
        content_record(ObjectId::new(), "Never reached"),
    ]));

    let actual = query.list_all().await.unwrap_err();

    assert!(matches!(actual, StoreError::Cursor(_)));
}

#[tokio::test]
async fn test_list_all_when_collection_empty_expect_empty_list() {
    let query = initialize_query(MemoryConnector::new(vec![]));
    let actual = query.list_all().await.unwrap();
    assert!(actual.is_empty());
}

#[tokio::test]
async fn test_list_all_when_store_unreachable_expect_connection_error() {
    let query = initialize_query(MemoryConnector::unreachable());
    let actual = query.list_all().await.unwrap_err();
    assert!(matches!(actual, StoreError::Connection(_)));
}

#[tokio::test]
async fn test_list_all_when_fields_malformed_expect_record_kept_with_empty_fields() {
    let query = initialize_query(MemoryConnector::new(vec![Record::Valid(doc! {
        "_id": "drifted",
        "title": 12_i32,
        "description": { "en": "nested" },
        "createdAt": "yesterday",
        "updatedAt": false,
    })]));

    let actual = query.list_all().await.unwrap();

    assert_eq!(actual.len(), 1);
    assert_eq!(actual[0].id, "drifted");
    assert_eq!(actual[0].title, "");
    assert_eq!(actual[0].description, "");
    assert_eq!(actual[0].created_at, None);
    assert_eq!(actual[0].updated_at, None);
}

#[tokio::test]
async fn test_get_by_id_when_collection_empty_expect_not_found() {
    let query = initialize_query(MemoryConnector::new(vec![]));
    let actual = query
        .get_by_id("65a1b2c3d4e5f60718293a4b")
        .await
        .unwrap_err();
    assert!(matches!(actual, StoreError::NotFound(ref id) if id == "65a1b2c3d4e5f60718293a4b"));
}

#[tokio::test]
async fn test_get_by_id_when_hex_id_matches_expect_mapped_content() {
    let oid = ObjectId::new();
    let query = initialize_query(MemoryConnector::new(vec![
        content_record(ObjectId::new(), "Other"),
        content_record(oid, "Wanted"),
    ]));

    let actual = query.get_by_id(&oid.to_hex()).await.unwrap();

    assert_eq!(actual.id, oid.to_hex());
    assert_eq!(actual.title, "Wanted");
    assert_eq!(actual.description, "About Wanted");
    assert!(actual.created_at.is_some());
}

#[tokio::test]
async fn test_get_by_id_when_string_id_expect_literal_match() {
    let query = initialize_query(MemoryConnector::new(vec![Record::Valid(doc! {
        "_id": "about-us",
        "title": "About us",
    })]));

    let actual = query.get_by_id("about-us").await.unwrap();

    assert_eq!(actual.id, "about-us");
    assert_eq!(actual.title, "About us");
}

#[tokio::test]
async fn test_get_by_id_when_hex_string_stored_as_string_expect_not_found() {
    // A 24-hex id is looked up as a generated id, not as a string.
    let query = initialize_query(MemoryConnector::new(vec![Record::Valid(doc! {
        "_id": "65a1b2c3d4e5f60718293a4b",
    })]));

    let actual = query
        .get_by_id("65a1b2c3d4e5f60718293a4b")
        .await
        .unwrap_err();

    assert!(matches!(actual, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_get_by_id_when_store_unreachable_expect_connection_error() {
    let query = initialize_query(MemoryConnector::unreachable());
    let actual = query.get_by_id("anything").await.unwrap_err();
    assert!(matches!(actual, StoreError::Connection(_)));
}
