//! 문서 저장소 클라이언트
//! 컬렉션 이름과 문서 id 로 접근하는 스키마 없는 JSON 문서 저장소.
//! 1. Postgres(JSONB) 구현체
//! 2. 메모리 구현체 (개발/테스트)
// region:    --- Imports
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};
use thiserror::Error;

// endregion: --- Imports

// region:    --- Modules
mod memory;
mod postgres;

pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
// endregion: --- Modules

// region:    --- Document Model
/// 저장소에서 읽은 문서
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// id 를 본문에 합친 JSON 객체
    /// 최상위 null 필드는 지워진 값으로 보고 생략한다.
    pub fn into_value(self) -> Value {
        let mut data = self.data;
        data.retain(|_, value| !value.is_null());
        data.insert("id".to_string(), Value::String(self.id));
        Value::Object(data)
    }
}

/// 자동 생성 id 길이
pub const AUTO_ID_LEN: usize = 20;

/// 20자 영숫자 문서 id 생성
pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}
// endregion: --- Document Model

// region:    --- Store Error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("no document to update: {collection}/{id}")]
    DocumentMissing { collection: String, id: String },

    #[error("{field} maximum is not an integer: {value}")]
    NonIntegerSequence { field: String, value: Value },

    #[error("{field} sequence exhausted at {max}")]
    SequenceOverflow { field: String, max: i64 },

    #[error("document data must be a JSON object")]
    NotAnObject,
}

pub type StoreResult<T> = Result<T, StoreError>;
// endregion: --- Store Error

// region:    --- Document Store Trait
/// 문서 저장소 트레이트
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 문서 추가, 생성된 id 반환
    async fn create(&self, collection: &str, data: Map<String, Value>) -> StoreResult<String>;

    /// id 로 문서 조회
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// 컬렉션 전체 조회 (저장소 고유 순서)
    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// 최상위 필드 병합. 없는 문서면 DocumentMissing
    async fn update(&self, collection: &str, id: &str, data: Map<String, Value>)
        -> StoreResult<()>;

    /// 문서 삭제. 없는 문서는 무시
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// field 내림차순 상위 n 개. field 가 없는 문서는 마지막
    async fn order_by_desc_limit(
        &self,
        collection: &str,
        field: &str,
        limit: usize,
    ) -> StoreResult<Vec<Document>>;

    /// field 의 현재 최대값 + 1 을 채워 문서 추가.
    /// 조회와 추가는 컬렉션 단위로 직렬화된다.
    async fn create_sequenced(
        &self,
        collection: &str,
        field: &str,
        data: Map<String, Value>,
    ) -> StoreResult<(String, i64)>;
}

/// 내림차순 정렬 결과에서 다음 순번 계산 (비어 있으면 1)
/// 최대값이 정수가 아니거나 i64 를 넘으면 오류
pub(crate) fn next_sequence(documents: &[Document], field: &str) -> StoreResult<i64> {
    let Some(top) = documents.first().and_then(|doc| doc.data.get(field)) else {
        return Ok(1);
    };
    let max = top.as_i64().ok_or_else(|| StoreError::NonIntegerSequence {
        field: field.to_string(),
        value: top.clone(),
    })?;
    max.checked_add(1).ok_or_else(|| StoreError::SequenceOverflow {
        field: field.to_string(),
        max,
    })
}
// endregion: --- Document Store Trait
