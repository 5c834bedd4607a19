//! 경매 상품 서비스
//! 1. 목록 조회
//! 2. 단건 조회
//! 3. 생성
//! 4. 수정 (전체 교체)
//! 5. 삭제
// region:    --- Imports
use super::model::{AuctionItem, ItemPayload, SaleNumberPolicy};
use crate::document_store::{Document, DocumentStore};
use crate::error::{ApiError, ApiResult};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

pub const SALE_NUMBER_FIELD: &str = "saleNumber";

const FETCH_ITEMS_FAILED: &str = "Failed to fetch items";
const FETCH_ITEM_FAILED: &str = "Failed to fetch item";
const CREATE_ITEM_FAILED: &str = "Failed to create item";
const UPDATE_ITEM_FAILED: &str = "Failed to update item";
const DELETE_ITEM_FAILED: &str = "Failed to delete item";

// region:    --- Item Service
pub struct ItemService<S> {
    store: Arc<S>,
    collection: String,
    policy: SaleNumberPolicy,
}

impl<S: DocumentStore> ItemService<S> {
    pub fn new(store: Arc<S>, collection: impl Into<String>, policy: SaleNumberPolicy) -> Self {
        Self {
            store,
            collection: collection.into(),
            policy,
        }
    }

    pub fn policy(&self) -> SaleNumberPolicy {
        self.policy
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// 1. 목록 조회 (저장소 순서 그대로)
    /// 저장된 문서를 형태 검사 없이 id 만 합쳐 돌려준다.
    pub async fn list_items(&self) -> ApiResult<Vec<Value>> {
        info!("{:<12} --> 상품 목록 조회: {}", "Service", self.collection);
        let documents = self
            .store
            .list(&self.collection)
            .await
            .map_err(ApiError::store(FETCH_ITEMS_FAILED))?;

        Ok(documents.into_iter().map(Document::into_value).collect())
    }

    /// 2. 단건 조회
    pub async fn get_item(&self, id: &str) -> ApiResult<Value> {
        info!("{:<12} --> 상품 조회 id: {}", "Service", id);
        let document = self.find(id, FETCH_ITEM_FAILED).await?;
        Ok(document.into_value())
    }

    /// 3. 생성
    pub async fn create_item(&self, payload: ItemPayload) -> ApiResult<AuctionItem> {
        let fields = payload.validate(self.policy)?;
        let created_at = Utc::now();

        let mut data = fields.to_document();
        data.insert("createdAt".to_string(), timestamp(created_at));

        let mut item = match self.policy {
            SaleNumberPolicy::ClientSupplied => {
                let id = self
                    .store
                    .create(&self.collection, data)
                    .await
                    .map_err(ApiError::store(CREATE_ITEM_FAILED))?;
                AuctionItem::from_fields(id, fields)
            }
            SaleNumberPolicy::AutoIncrement => {
                let (id, sale_number) = self
                    .store
                    .create_sequenced(&self.collection, SALE_NUMBER_FIELD, data)
                    .await
                    .map_err(ApiError::store(CREATE_ITEM_FAILED))?;
                let mut item = AuctionItem::from_fields(id, fields);
                item.sale_number = Some(sale_number);
                item
            }
        };
        item.created_at = Some(created_at);

        info!(
            "{:<12} --> 상품 생성 id: {}, saleNumber: {:?}",
            "Service", item.id, item.sale_number
        );
        Ok(item)
    }

    /// 4. 수정
    /// 존재 확인과 쓰기는 원자적이지 않다. 사이에 삭제되면 저장소 오류(500)가 된다.
    pub async fn update_item(&self, id: &str, payload: ItemPayload) -> ApiResult<AuctionItem> {
        let fields = payload.validate(self.policy)?;
        let existing = self.find(id, UPDATE_ITEM_FAILED).await?;
        let updated_at = Utc::now();

        let mut data = fields.to_document();
        data.insert("updatedAt".to_string(), timestamp(updated_at));

        self.store
            .update(&self.collection, id, data)
            .await
            .map_err(ApiError::store(UPDATE_ITEM_FAILED))?;

        let mut item = AuctionItem::from_fields(id, fields);
        if self.policy == SaleNumberPolicy::AutoIncrement {
            // 저장소가 부여한 번호는 유지
            item.sale_number = existing.data.get(SALE_NUMBER_FIELD).and_then(Value::as_i64);
        }
        item.updated_at = Some(updated_at);

        info!("{:<12} --> 상품 수정 id: {}", "Service", id);
        Ok(item)
    }

    /// 5. 삭제
    pub async fn delete_item(&self, id: &str) -> ApiResult<()> {
        self.find(id, DELETE_ITEM_FAILED).await?;
        self.store
            .delete(&self.collection, id)
            .await
            .map_err(ApiError::store(DELETE_ITEM_FAILED))?;

        info!("{:<12} --> 상품 삭제 id: {}", "Service", id);
        Ok(())
    }

    async fn find(&self, id: &str, failure: &'static str) -> ApiResult<Document> {
        self.store
            .get(&self.collection, id)
            .await
            .map_err(ApiError::store(failure))?
            .ok_or(ApiError::NotFound)
    }
}

fn timestamp(at: chrono::DateTime<Utc>) -> Value {
    // DateTime<Utc> 의 serde 표현과 같은 형식
    Value::String(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
// endregion: --- Item Service
