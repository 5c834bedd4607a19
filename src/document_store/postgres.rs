// region:    --- Imports
use super::{generate_id, next_sequence, Document, DocumentStore, StoreError, StoreResult};
use crate::database::DatabaseManager;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Queries
const INSERT_DOCUMENT: &str = "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)";

const GET_DOCUMENT: &str = "SELECT id, data FROM documents WHERE collection = $1 AND id = $2";

const LIST_DOCUMENTS: &str = "SELECT id, data FROM documents WHERE collection = $1";

/// 최상위 필드 병합 (jsonb ||)
const UPDATE_DOCUMENT: &str =
    "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2";

const DELETE_DOCUMENT: &str = "DELETE FROM documents WHERE collection = $1 AND id = $2";

/// 숫자 내림차순, 숫자가 아닌 값과 누락은 마지막
const ORDER_BY_DESC_LIMIT: &str = r#"
    SELECT id, data
    FROM documents
    WHERE collection = $1
    ORDER BY COALESCE(jsonb_typeof(data -> $2) = 'number', false) DESC,
             data -> $2 DESC NULLS LAST
    LIMIT $3
"#;

const MAX_NUMERIC_FIELD: &str = r#"
    SELECT id, data
    FROM documents
    WHERE collection = $1 AND jsonb_typeof(data -> $2) = 'number'
    ORDER BY data -> $2 DESC
    LIMIT 1
"#;

/// 컬렉션 단위 트랜잭션 락
const LOCK_COLLECTION: &str = "SELECT pg_advisory_xact_lock(hashtext($1))";
// endregion: --- Queries

// region:    --- Postgres Document Store
#[derive(FromRow)]
struct DocumentRow {
    id: String,
    data: Value,
}

impl TryFrom<DocumentRow> for Document {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        match row.data {
            Value::Object(data) => Ok(Document::new(row.id, data)),
            _ => Err(StoreError::NotAnObject),
        }
    }
}

fn into_documents(rows: Vec<DocumentRow>) -> StoreResult<Vec<Document>> {
    rows.into_iter().map(Document::try_from).collect()
}

/// JSONB 컬럼에 컬렉션별 문서를 저장하는 구현체
pub struct PostgresDocumentStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresDocumentStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn create(&self, collection: &str, data: Map<String, Value>) -> StoreResult<String> {
        let id = generate_id();
        sqlx::query(INSERT_DOCUMENT)
            .bind(collection)
            .bind(&id)
            .bind(Value::Object(data))
            .execute(self.db_manager.pool())
            .await?;
        info!("{:<12} --> 문서 추가: {}/{}", "Store", collection, id);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        sqlx::query_as::<_, DocumentRow>(GET_DOCUMENT)
            .bind(collection)
            .bind(id)
            .fetch_optional(self.db_manager.pool())
            .await?
            .map(Document::try_from)
            .transpose()
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(LIST_DOCUMENTS)
            .bind(collection)
            .fetch_all(self.db_manager.pool())
            .await?;
        into_documents(rows)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> StoreResult<()> {
        let result = sqlx::query(UPDATE_DOCUMENT)
            .bind(collection)
            .bind(id)
            .bind(Value::Object(data))
            .execute(self.db_manager.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DocumentMissing {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        sqlx::query(DELETE_DOCUMENT)
            .bind(collection)
            .bind(id)
            .execute(self.db_manager.pool())
            .await?;
        info!("{:<12} --> 문서 삭제: {}/{}", "Store", collection, id);
        Ok(())
    }

    async fn order_by_desc_limit(
        &self,
        collection: &str,
        field: &str,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, DocumentRow>(ORDER_BY_DESC_LIMIT)
            .bind(collection)
            .bind(field)
            .bind(limit)
            .fetch_all(self.db_manager.pool())
            .await?;
        into_documents(rows)
    }

    async fn create_sequenced(
        &self,
        collection: &str,
        field: &str,
        data: Map<String, Value>,
    ) -> StoreResult<(String, i64)> {
        let collection = collection.to_string();
        let field = field.to_string();

        let (id, next) = self
            .db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    sqlx::query(LOCK_COLLECTION)
                        .bind(&collection)
                        .execute(&mut **tx)
                        .await?;

                    let rows = sqlx::query_as::<_, DocumentRow>(MAX_NUMERIC_FIELD)
                        .bind(&collection)
                        .bind(&field)
                        .fetch_all(&mut **tx)
                        .await?;
                    let next = next_sequence(&into_documents(rows)?, &field)?;

                    let mut data = data;
                    data.insert(field.clone(), Value::from(next));
                    let id = generate_id();
                    sqlx::query(INSERT_DOCUMENT)
                        .bind(&collection)
                        .bind(&id)
                        .bind(Value::Object(data))
                        .execute(&mut **tx)
                        .await?;

                    Ok::<_, StoreError>((id, next))
                })
            })
            .await?;

        info!("{:<12} --> 순번 문서 추가: {} = {}", "Store", id, next);
        Ok((id, next))
    }
}
// endregion: --- Postgres Document Store
