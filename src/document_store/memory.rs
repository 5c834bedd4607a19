// region:    --- Imports
use super::{generate_id, next_sequence, Document, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

// endregion: --- Imports

type Collection = BTreeMap<String, Map<String, Value>>;

/// 메모리 문서 저장소 (개발/테스트)
/// 컬렉션 내 문서는 id 순으로 유지된다.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 컬렉션 문서 수
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, BTreeMap::len)
    }

    fn sorted_desc(documents: &Collection, field: &str, limit: usize) -> Vec<Document> {
        let mut docs: Vec<Document> = documents
            .iter()
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect();
        docs.sort_by(|a, b| compare_desc(a.data.get(field), b.data.get(field)));
        docs.truncate(limit);
        docs
    }
}

/// 숫자 내림차순, 숫자가 아닌 값과 누락은 마지막
fn compare_desc(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, data: Map<String, Value>) -> StoreResult<String> {
        let id = generate_id();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        debug!("{:<12} --> 문서 추가: {}/{}", "Store", collection, id);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::DocumentMissing {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        existing.extend(data);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn order_by_desc_limit(
        &self,
        collection: &str,
        field: &str,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| Self::sorted_desc(docs, field, limit))
            .unwrap_or_default())
    }

    async fn create_sequenced(
        &self,
        collection: &str,
        field: &str,
        mut data: Map<String, Value>,
    ) -> StoreResult<(String, i64)> {
        // 쓰기 락을 잡은 채로 최대값 조회와 추가를 수행
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        let next = next_sequence(&Self::sorted_desc(docs, field, 1), field)?;
        data.insert(field.to_string(), Value::from(next));
        let id = generate_id();
        docs.insert(id.clone(), data);
        debug!(
            "{:<12} --> 순번 문서 추가: {}/{} {}={}",
            "Store", collection, id, field, next
        );
        Ok((id, next))
    }
}
