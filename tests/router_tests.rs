//! 상품 라우터 테스트 (메모리 저장소)

use auction_items::document_store::InMemoryDocumentStore;
use auction_items::handlers;
use auction_items::items::{ItemService, SaleNumberPolicy};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt; // oneshot()

const BODY_LIMIT: usize = 1024 * 1024;

fn app(policy: SaleNumberPolicy) -> Router {
    let store = Arc::new(InMemoryDocumentStore::new());
    let service = Arc::new(ItemService::new(store, "auctionItems", policy));
    handlers::app(service, BODY_LIMIT)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn vase() -> Value {
    json!({
        "saleNumber": 1,
        "title": "Vase",
        "description": "Ming",
        "consignor": "A",
        "estimate": {"low": 100, "high": 200}
    })
}

#[tokio::test]
async fn test_create_get_delete_scenario() {
    let app = app(SaleNumberPolicy::ClientSupplied);

    let (status, created) = send(&app, "POST", "/api/items", Some(vase())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["saleNumber"], 1);
    assert_eq!(created["title"], "Vase");
    assert_eq!(created["description"], "Ming");
    assert_eq!(created["consignor"], "A");
    assert_eq!(created["estimate"], json!({"low": 100, "high": 200}));
    assert!(created["createdAt"].is_string());

    let (status, fetched) = send(&app, "GET", &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, "DELETE", &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Item deleted successfully"}));

    let (status, body) = send(&app, "GET", &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Item not found"}));
}

#[tokio::test]
async fn test_unknown_id_is_404_for_get_put_delete() {
    let app = app(SaleNumberPolicy::ClientSupplied);

    let (status, _) = send(&app, "GET", "/api/items/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PUT", "/api/items/missing", Some(vase())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/api/items/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Item not found"}));
}

#[tokio::test]
async fn test_put_is_full_replace() {
    let app = app(SaleNumberPolicy::ClientSupplied);
    let (_, created) = send(&app, "POST", "/api/items", Some(vase())).await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/items/{id}"),
        Some(json!({"saleNumber": 1, "title": "Bowl", "estimate": {"low": 10, "high": 20}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["title"], "Bowl");
    assert!(updated["updatedAt"].is_string());

    let (_, fetched) = send(&app, "GET", &format!("/api/items/{id}"), None).await;
    assert_eq!(fetched["title"], "Bowl");
    assert!(fetched.get("description").is_none());
    assert!(fetched.get("consignor").is_none());
    assert_eq!(fetched["estimate"], json!({"low": 10, "high": 20}));
    assert_eq!(fetched["createdAt"], created["createdAt"]);
    assert_eq!(fetched["updatedAt"], updated["updatedAt"]);
}

#[tokio::test]
async fn test_list_returns_created_and_not_deleted() {
    let app = app(SaleNumberPolicy::ClientSupplied);

    let (status, body) = send(&app, "GET", "/api/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let mut ids = HashSet::new();
    for n in 1..=3 {
        let mut item = vase();
        item["saleNumber"] = json!(n);
        let (_, created) = send(&app, "POST", "/api/items", Some(item)).await;
        ids.insert(created["id"].as_str().unwrap().to_string());
    }
    let removed = ids.iter().next().cloned().unwrap();
    send(&app, "DELETE", &format!("/api/items/{removed}"), None).await;
    ids.remove(&removed);

    let (_, body) = send(&app, "GET", "/api/items", None).await;
    let listed: HashSet<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_invalid_payloads_are_400() {
    let app = app(SaleNumberPolicy::ClientSupplied);

    let (status, body) = send(
        &app,
        "POST",
        "/api/items",
        Some(json!({"saleNumber": 1, "title": "Vase"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid item payload");
    assert_eq!(body["error"], "estimate is required");

    let (status, _) = send(
        &app,
        "POST",
        "/api/items",
        Some(json!({"saleNumber": "one", "estimate": {"low": 1, "high": 2}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/api/items")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/api/items", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_concurrent_creates_keep_client_sale_numbers() {
    let app = app(SaleNumberPolicy::ClientSupplied);

    let first = send(&app, "POST", "/api/items", Some(vase()));
    let second = send(&app, "POST", "/api/items", Some(vase()));
    let ((s1, a), (s2, b)) = tokio::join!(first, second);

    assert_eq!(s1, StatusCode::CREATED);
    assert_eq!(s2, StatusCode::CREATED);
    assert_ne!(a["id"], b["id"]);
    // 순번 보장 없음: 같은 번호가 그대로 두 번 저장된다
    assert_eq!(a["saleNumber"], 1);
    assert_eq!(b["saleNumber"], 1);
}

#[tokio::test]
async fn test_concurrent_creates_with_auto_increment_are_distinct() {
    let app = app(SaleNumberPolicy::AutoIncrement);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { send(&app, "POST", "/api/items", Some(vase())).await })
        })
        .collect();

    let mut numbers = Vec::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        numbers.push(body["saleNumber"].as_i64().unwrap());
    }
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=10).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app(SaleNumberPolicy::ClientSupplied);
    let request = Request::builder()
        .method("GET")
        .uri("/api/items")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let service = Arc::new(ItemService::new(
        store,
        "auctionItems",
        SaleNumberPolicy::ClientSupplied,
    ));
    let app = handlers::app(service, 64);

    let mut item = vase();
    item["description"] = json!("x".repeat(1024));
    let (status, _) = send(&app, "POST", "/api/items", Some(item)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_documents_written_elsewhere_are_readable() {
    use auction_items::document_store::DocumentStore;

    let store = Arc::new(InMemoryDocumentStore::new());
    let data = json!({"title": "lot", "saleNumber": "12A", "extra": "x"});
    let id = store
        .create("auctionItems", data.as_object().cloned().unwrap())
        .await
        .unwrap();
    let service = Arc::new(ItemService::new(
        store,
        "auctionItems",
        SaleNumberPolicy::ClientSupplied,
    ));
    let app = handlers::app(service, BODY_LIMIT);

    let (status, _) = send(&app, "POST", "/api/items", Some(vase())).await;
    assert_eq!(status, StatusCode::CREATED);

    let expected = json!({"id": id, "title": "lot", "saleNumber": "12A", "extra": "x"});
    let (status, list) = send(&app, "GET", "/api/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert!(list.as_array().unwrap().contains(&expected));

    let (status, item) = send(&app, "GET", &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item, expected);
}
