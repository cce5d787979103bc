use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{compare_values, Collection, Filter, RecordStore, StoreResult};

/// Process-local document store. Records keep insertion order per collection.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn record_id(record: &Value) -> Option<Uuid> {
    record
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert(&self, collection: Collection, mut record: Value) -> StoreResult<Value> {
        let object = record
            .as_object_mut()
            .ok_or_else(|| StoreError::Request("record must be a JSON object".to_string()))?;

        let id = match object.get("id").and_then(Value::as_str) {
            Some(id) => Uuid::parse_str(id)
                .map_err(|e| StoreError::Request(format!("invalid record id: {}", e)))?,
            None => {
                let id = Uuid::new_v4();
                object.insert("id".to_string(), Value::String(id.to_string()));
                id
            }
        };

        let mut collections = self.collections.write().await;
        let records = collections.entry(collection).or_default();

        if records.iter().any(|existing| record_id(existing) == Some(id)) {
            return Err(StoreError::Constraint(format!("duplicate id {} in {}", id, collection)));
        }

        debug!("Inserting {} record {}", collection, id);
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)))
            .cloned())
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Value> = collections
            .get(&collection)
            .map(|records| records.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default();

        if let Some(field) = filter.sort_field() {
            matched.sort_by(|a, b| match (a.get(field), b.get(field)) {
                (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            });
        }

        debug!("Query on {} matched {} records", collection, matched.len());
        Ok(matched)
    }

    async fn update(&self, collection: Collection, id: Uuid, patch: Value) -> StoreResult<Option<Value>> {
        let patch = match patch {
            Value::Object(fields) => fields,
            _ => return Err(StoreError::Request("patch must be a JSON object".to_string())),
        };

        let mut collections = self.collections.write().await;
        let Some(record) = collections
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
        else {
            return Ok(None);
        };

        if let Some(object) = record.as_object_mut() {
            for (key, value) in patch {
                if key != "id" {
                    object.insert(key, value);
                }
            }
        }

        Ok(Some(record.clone()))
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(&collection) else {
            return Ok(false);
        };

        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        Ok(records.len() != before)
    }
}
