//! 오류 응답 변환
//! 라우트 핸들러는 ApiError 를 반환하고, 상태 코드와 본문은 여기서만 결정한다.
// region:    --- Imports
use crate::document_store::StoreError;
use crate::items::ValidationError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

// endregion: --- Imports

pub const NOT_FOUND_MESSAGE: &str = "Item not found";
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid item payload";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Item not found")]
    NotFound,

    #[error("Invalid item payload: {0}")]
    Validation(#[from] ValidationError),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 저장소 오류를 작업 메시지와 함께 감싼다
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(rejection.body_text());
        }
        ApiError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound => json!({ "message": NOT_FOUND_MESSAGE }),
            ApiError::Validation(e) => {
                warn!("{:<12} --> 잘못된 요청: {}", "Error", e);
                json!({ "message": INVALID_PAYLOAD_MESSAGE, "error": e.to_string() })
            }
            ApiError::PayloadTooLarge(details) => {
                warn!("{:<12} --> 요청 본문 초과: {}", "Error", details);
                json!({ "message": "Request body too large", "error": details })
            }
            ApiError::Store { message, source } => {
                error!("{:<12} --> {}: {:?}", "Error", message, source);
                json!({ "message": message, "error": source.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}
