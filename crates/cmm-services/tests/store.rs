//! Record store clients.

use std::time::Duration;

use chrono::NaiveDate;
use cmm_model::{CanonicalRecord, Flow, Process, RoofElement, SteelFamily, StoredRow};
use cmm_services::{MemoryStore, RecordStore, ServiceError, StoreConfig, SupabaseStore};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record() -> CanonicalRecord {
    CanonicalRecord {
        datetime: NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap(),
        process: Process::Stock,
        flow: Flow::Out,
        family: SteelFamily::SquareHollowSection,
        dimension: "100x100x6".to_string(),
        length: 6.0,
        quantity: -3,
        element: RoofElement::NotApplicable,
        description: "-".to_string(),
    }
}

fn store(server: &MockServer) -> SupabaseStore {
    let config = StoreConfig {
        url: Some(server.uri()),
        key: Some("anon-key".to_string()),
        ..StoreConfig::default()
    };
    SupabaseStore::new(&config, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_insert_posts_flat_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/case_database"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(header("prefer", "return=minimal"))
        .and(body_json(serde_json::json!({
            "datetime": "2025-01-01 14:30:00",
            "process": "stock",
            "flow": "out",
            "family": "SHS - Square Hollow Section",
            "dimension": "100x100x6",
            "length": 6.0,
            "quantity": -3,
            "element": "-",
            "description": "-",
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).insert(&record()).await.unwrap();
}

#[tokio::test]
async fn test_insert_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad column"))
        .mount(&server)
        .await;

    let err = store(&server).insert(&record()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_select_all_reads_partial_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/case_database"))
        .and(query_param("select", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "process": "hauling", "dimension": "100x50x3.2", "quantity": 12},
            {"id": 2, "process": "stock", "flow": null, "quantity": 4}
        ])))
        .mount(&server)
        .await;

    let rows = store(&server).select_all().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].dimension.as_deref(), Some("100x50x3.2"));
    assert_eq!(rows[1].flow, None);
}

#[tokio::test]
async fn test_memory_store_round_trip() {
    let store = MemoryStore::new();
    store.insert(&record()).await.unwrap();
    let rows = store.select_all().await.unwrap();
    assert_eq!(rows, vec![StoredRow::from(&record())]);
}

#[tokio::test]
async fn test_select_plan_reads_roof_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/RoofList"))
        .and(query_param("select", "*"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"element": "rafter", "dimension": "TUBS100x100x6", "cutlength": 5.5},
            {"element": "tie beam", "dimension": "TUBR100x50x3.2"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let plan = store(&server).select_plan().await.unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].cutlength, Some(5.5));
    assert_eq!(plan[1].element.as_deref(), Some("tie beam"));
    assert_eq!(plan[1].cutlength, None);
}
