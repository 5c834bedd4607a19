// region:    --- Imports
use crate::document_store::DocumentStore;
use crate::error::ApiResult;
use crate::items::{AuctionItem, ItemPayload, ItemService};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

pub const DELETED_MESSAGE: &str = "Item deleted successfully";

type ServiceState<S> = State<Arc<ItemService<S>>>;

// region:    --- Router
/// 상품 라우터
pub fn routes<S: DocumentStore + 'static>(service: Arc<ItemService<S>>) -> Router {
    Router::new()
        .route(
            "/api/items",
            get(handle_list_items::<S>).post(handle_create_item::<S>),
        )
        .route(
            "/api/items/:id",
            get(handle_get_item::<S>)
                .put(handle_update_item::<S>)
                .delete(handle_delete_item::<S>),
        )
        .with_state(service)
}

/// CORS 와 바디 크기 제한을 포함한 전체 앱
pub fn app<S: DocumentStore + 'static>(service: Arc<ItemService<S>>, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes(service)
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
}
// endregion: --- Router

// region:    --- Handlers

/// 모든 상품 조회
pub async fn handle_list_items<S: DocumentStore>(
    State(service): ServiceState<S>,
) -> ApiResult<Json<Vec<Value>>> {
    info!("{:<12} --> 모든 상품 조회", "Handler");
    Ok(Json(service.list_items().await?))
}

/// 상품 조회
pub async fn handle_get_item<S: DocumentStore>(
    State(service): ServiceState<S>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    info!("{:<12} --> 상품 조회 id: {}", "Handler", id);
    Ok(Json(service.get_item(&id).await?))
}

/// 상품 생성
pub async fn handle_create_item<S: DocumentStore>(
    State(service): ServiceState<S>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuctionItem>)> {
    info!("{:<12} --> 상품 생성", "Handler");
    let Json(payload) = payload?;
    let item = service.create_item(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// 상품 수정
pub async fn handle_update_item<S: DocumentStore>(
    State(service): ServiceState<S>,
    Path(id): Path<String>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> ApiResult<Json<AuctionItem>> {
    info!("{:<12} --> 상품 수정 id: {}", "Handler", id);
    let Json(payload) = payload?;
    Ok(Json(service.update_item(&id, payload).await?))
}

/// 상품 삭제
pub async fn handle_delete_item<S: DocumentStore>(
    State(service): ServiceState<S>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    info!("{:<12} --> 상품 삭제 id: {}", "Handler", id);
    service.delete_item(&id).await?;
    Ok(Json(json!({ "message": DELETED_MESSAGE })))
}

// endregion: --- Handlers
