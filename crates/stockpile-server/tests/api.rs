//! End-to-end tests of the HTTP API over an in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use stockpile_core::{ItemService, MemoryStore};
use stockpile_server::router;
use tower::ServiceExt;

fn app() -> Router {
    router(ItemService::new(MemoryStore::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, item) = send(app, Method::POST, "/items", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    item
}

fn id_of(item: &Value) -> String {
    item["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_item() {
    let app = app();
    let item = create(&app, json!({"name": "Widget", "price": 9.99})).await;

    assert_eq!(item["name"], "Widget");
    assert_eq!(item["description"], "");
    assert_eq!(item["tags"], json!([]));

    let log = item["auditLog"].as_array().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["field"], "creation");
    assert_eq!(log[0]["oldValue"], Value::Null);
    assert_eq!(log[0]["changedBy"], "admin");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/items", Some(json!({"name": "Widget"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("price"));

    let (status, _) = send(&app, Method::POST, "/items", Some(json!({"price": 1.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/items",
        Some(json!({"name": "Widget", "price": "cheap"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_and_list() {
    let app = app();
    let first = create(&app, json!({"name": "First", "price": 1})).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create(&app, json!({"name": "Second", "price": 2})).await;

    let (status, fetched) = send(&app, Method::GET, &format!("/items/{}", id_of(&first)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, first);

    let (status, list) = send(&app, Method::GET, "/items", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
    assert_eq!(list[0], second);
}

#[tokio::test]
async fn test_unknown_item_is_404() {
    let app = app();
    let missing = "/items/itm_00000000000000000000000000000000";

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&app, method, missing, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Item not found");
    }

    let (status, _) = send(&app, Method::PUT, missing, Some(json!({"price": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &format!("{missing}/audit"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_scenario() {
    let app = app();
    let pen = create(
        &app,
        json!({"name": "Pen", "category": "Office", "price": 1.5, "tags": ["blue"]}),
    )
    .await;
    let uri = format!("/items/{}", id_of(&pen));

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"price": 2.0, "category": "Office"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], json!(2.0));
    assert_eq!(updated["category"], "Office");
    assert_eq!(updated["tags"], json!(["blue"]));

    let (status, log) = send(&app, Method::GET, &format!("{uri}/audit"), None).await;
    assert_eq!(status, StatusCode::OK);

    let log = log.as_array().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1]["field"], "price");
    assert_eq!(log[1]["oldValue"], json!(1.5));
    assert_eq!(log[1]["newValue"], json!(2.0));
}

#[tokio::test]
async fn test_update_with_unrecognized_keys_is_noop() {
    let app = app();
    let item = create(&app, json!({"name": "Pen", "price": 10})).await;
    let uri = format!("/items/{}", id_of(&item));

    let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({"colour": "red"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, item);
}

#[tokio::test]
async fn test_update_rejects_invalid_values() {
    let app = app();
    let item = create(&app, json!({"name": "Pen", "price": 10})).await;
    let uri = format!("/items/{}", id_of(&item));

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"tags": "blue"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, unchanged) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(unchanged, item);
}

#[tokio::test]
async fn test_delete_item() {
    let app = app();
    let item = create(&app, json!({"name": "Pen", "price": 1})).await;
    let uri = format!("/items/{}", id_of(&item));

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("{uri}/audit"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search() {
    let app = app();
    create(&app, json!({"name": "Blue Pen", "price": 1.5, "tags": ["ink"]})).await;
    create(&app, json!({"name": "Stapler", "price": 12, "category": "Office"})).await;

    let (status, results) = send(&app, Method::GET, "/search?query=stapler", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["name"], "Stapler");

    let (_, all) = send(&app, Method::GET, "/search?query=", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, all) = send(&app, Method::GET, "/search", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_advanced_search() {
    let app = app();
    create(
        &app,
        json!({"name": "Keyboard", "price": 45, "category": "Electronics", "tags": ["usb", "blue"]}),
    )
    .await;
    create(
        &app,
        json!({"name": "Monitor", "price": 250, "category": "Electronics", "tags": ["hdmi"]}),
    )
    .await;
    create(&app, json!({"name": "Pen", "price": 1.5, "category": "Office", "tags": ["blue"]})).await;

    let (status, results) = send(
        &app,
        Method::GET,
        "/advanced-search?category=Electronics&minPrice=10&maxPrice=45&tags=usb,blue",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["name"], "Keyboard");

    let (_, blue) = send(&app, Method::GET, "/advanced-search?tags=blue", None).await;
    assert_eq!(blue.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::GET, "/advanced-search?minPrice=cheap", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analytics() {
    let app = app();
    for (name, price) in [("a", 5.0), ("b", 15.0), ("c", 15.0), ("d", 600.0)] {
        create(&app, json!({"name": name, "price": price})).await;
    }

    let (status, analytics) = send(&app, Method::GET, "/analytics", None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(analytics["summary"]["totalItems"], 4);
    assert_eq!(analytics["summary"]["totalValue"], json!(635.0));
    assert_eq!(analytics["summary"]["averagePrice"], json!(158.75));
    assert_eq!(
        analytics["categoryDistribution"],
        json!([{"category": "Uncategorized", "count": 4}])
    );

    let counts: Vec<(String, u64)> = analytics["priceRanges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["bucketLabel"].as_str().unwrap().to_string(),
                r["count"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        counts,
        vec![
            ("0-10".to_string(), 1),
            ("10-50".to_string(), 2),
            ("50-100".to_string(), 0),
            ("100-500".to_string(), 0),
            ("500-1000".to_string(), 1),
            ("1000+".to_string(), 0),
        ]
    );
}
