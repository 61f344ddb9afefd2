//! In-memory document store.
//!
//! Same semantics as the PostgreSQL backend, held in a process-local map.
//! Backs the service test suites and works as an ephemeral store for local
//! experimentation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::{
    record_key, require_object, ChangeEvent, ChangeHub, Direction, DocStore, OrderBy, QueryOptions,
    Record, StoreError,
};

#[derive(Clone, Default)]
pub struct MemStore {
    records: Arc<RwLock<HashMap<(String, String), Record>>>,
    hub: ChangeHub,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocStore for MemStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Record, StoreError> {
        let records = self.records.read().await;
        records
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(record_key(collection, id)))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        require_object(&data)?;
        let now = Utc::now();
        let mut records = self.records.write().await;
        let key = (collection.to_string(), id.to_string());
        match records.get_mut(&key) {
            Some(existing) => {
                if merge {
                    merge_into(&mut existing.data, &data);
                } else {
                    existing.data = data;
                }
                existing.updated_at = now;
            }
            None => {
                records.insert(
                    key,
                    Record {
                        id: id.to_string(),
                        data,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        drop(records);
        self.hub.publish(collection);
        Ok(())
    }

    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        require_object(&data)?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut records = self.records.write().await;
        records.insert(
            (collection.to_string(), id.clone()),
            Record {
                id: id.clone(),
                data,
                created_at: now,
                updated_at: now,
            },
        );
        drop(records);
        self.hub.publish(collection);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        require_object(&patch)?;
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&(collection.to_string(), id.to_string()))
            .ok_or_else(|| StoreError::NotFound(record_key(collection, id)))?;
        merge_into(&mut record.data, &patch);
        record.updated_at = Utc::now();
        drop(records);
        self.hub.publish(collection);
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.remove(&(collection.to_string(), id.to_string()));
        drop(records);
        self.hub.publish(collection);
        Ok(())
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&(collection.to_string(), id.to_string()))
            .ok_or_else(|| StoreError::NotFound(record_key(collection, id)))?;
        bump_field(&mut record.data, field, delta);
        record.updated_at = Utc::now();
        drop(records);
        self.hub.publish(collection);
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        options: QueryOptions,
    ) -> Result<Vec<Record>, StoreError> {
        let records = self.records.read().await;
        let mut matches: Vec<Record> = records
            .iter()
            .filter(|((coll, _), _)| coll == collection)
            .map(|(_, record)| record)
            .filter(|record| {
                options
                    .filters
                    .iter()
                    .all(|(field, value)| record.data.get(field) == Some(value))
            })
            .filter(|record| {
                options
                    .created_after
                    .map_or(true, |cutoff| record.created_at >= cutoff)
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| compare_records(a, b, &options.order));
        if let Some(limit) = options.limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.hub.subscribe()
    }
}

/// Shallow merge: top-level fields of `patch` overwrite those of `base`.
fn merge_into(base: &mut Value, patch: &Value) {
    match (base.as_object_mut(), patch.as_object()) {
        (Some(base_map), Some(patch_map)) => {
            for (key, value) in patch_map {
                base_map.insert(key.clone(), value.clone());
            }
        }
        _ => *base = patch.clone(),
    }
}

/// Adjusts a numeric field (dotted path allowed), missing treated as 0,
/// clamped at 0.
fn bump_field(data: &mut Value, path: &str, delta: i64) {
    let mut parts = path.split('.').peekable();
    let mut cursor = data;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            if let Some(map) = cursor.as_object_mut() {
                let current = map.get(part).and_then(Value::as_i64).unwrap_or(0);
                map.insert(part.to_string(), Value::from((current + delta).max(0)));
            }
            return;
        }
        let next = match cursor.as_object_mut() {
            Some(map) => map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
            None => return,
        };
        cursor = next;
    }
}

fn compare_records(a: &Record, b: &Record, order: &[OrderBy]) -> Ordering {
    for clause in order {
        let ordering = match clause.field.as_str() {
            "createdAt" => a.created_at.cmp(&b.created_at),
            "updatedAt" => a.updated_at.cmp(&b.updated_at),
            field => compare_values(a.data.get(field), b.data.get(field)),
        };
        let ordering = match clause.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => match (x, y) {
            (Value::Number(m), Value::Number(n)) => m
                .as_f64()
                .unwrap_or(0.0)
                .total_cmp(&n.as_f64().unwrap_or(0.0)),
            (Value::String(s), Value::String(t)) => s.cmp(t),
            (Value::Bool(p), Value::Bool(q)) => p.cmp(q),
            _ => Ordering::Equal,
        },
    }
}
