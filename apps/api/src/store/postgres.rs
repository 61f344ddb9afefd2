//! PostgreSQL document store.
//!
//! All collections share one `records` table (collection, id, JSONB data,
//! server timestamps). Merges and counter adjustments are single statements so
//! concurrent writers cannot lose an update.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{
    record_key, require_object, ChangeEvent, ChangeHub, Direction, DocStore, QueryOptions, Record,
    StoreError,
};

#[derive(Clone)]
pub struct PgDocStore {
    pool: PgPool,
    hub: ChangeHub,
}

impl PgDocStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hub: ChangeHub::new(),
        }
    }
}

#[async_trait]
impl DocStore for PgDocStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Record, StoreError> {
        let record: Option<Record> = sqlx::query_as(
            "SELECT id, data, created_at, updated_at FROM records \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or_else(|| StoreError::NotFound(record_key(collection, id)))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        require_object(&data)?;
        sqlx::query(
            "INSERT INTO records (collection, id, data) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO UPDATE SET \
               data = CASE WHEN $4 THEN records.data || EXCLUDED.data ELSE EXCLUDED.data END, \
               updated_at = now()",
        )
        .bind(collection)
        .bind(id)
        .bind(data)
        .bind(merge)
        .execute(&self.pool)
        .await?;

        self.hub.publish(collection);
        Ok(())
    }

    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        require_object(&data)?;
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO records (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(data)
            .execute(&self.pool)
            .await?;

        self.hub.publish(collection);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        require_object(&patch)?;
        let result = sqlx::query(
            "UPDATE records SET data = data || $3, updated_at = now() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(patch)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(record_key(collection, id)));
        }
        self.hub.publish(collection);
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

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
        let path: Vec<String> = field.split('.').map(str::to_string).collect();
        let result = sqlx::query(
            "UPDATE records SET \
               data = jsonb_set(data, $3::text[], \
                 to_jsonb(GREATEST(0, COALESCE((data #>> $3::text[])::bigint, 0) + $4)), true), \
               updated_at = now() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(path)
        .bind(delta)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(record_key(collection, id)));
        }
        self.hub.publish(collection);
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        options: QueryOptions,
    ) -> Result<Vec<Record>, StoreError> {
        let mut sql =
            String::from("SELECT id, data, created_at, updated_at FROM records WHERE collection = $1");
        let mut next_arg = 2;

        let filter_obj = if options.filters.is_empty() {
            None
        } else {
            let mut map = Map::new();
            for (field, value) in &options.filters {
                map.insert(field.clone(), value.clone());
            }
            sql.push_str(&format!(" AND data @> ${next_arg}::jsonb"));
            next_arg += 1;
            Some(Value::Object(map))
        };

        if options.created_after.is_some() {
            sql.push_str(&format!(" AND created_at >= ${next_arg}"));
            next_arg += 1;
        }
        let _ = next_arg;

        if !options.order.is_empty() {
            let mut clauses = Vec::with_capacity(options.order.len());
            for order in &options.order {
                let direction = match order.direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                clauses.push(format!(
                    "{} {direction} NULLS LAST",
                    order_expr(&order.field)?
                ));
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&clauses.join(", "));
        }

        if let Some(limit) = options.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut query = sqlx::query_as::<_, Record>(&sql).bind(collection);
        if let Some(filters) = filter_obj {
            query = query.bind(filters);
        }
        if let Some(cutoff) = options.created_after {
            query = query.bind(cutoff);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.hub.subscribe()
    }
}

/// Maps an order field to a SQL expression. The record timestamps are real
/// columns; everything else sorts on the JSON text value.
fn order_expr(field: &str) -> Result<String, StoreError> {
    match field {
        "createdAt" => Ok("created_at".to_string()),
        "updatedAt" => Ok("updated_at".to_string()),
        other => {
            if other.is_empty()
                || !other
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(StoreError::Query(format!("invalid order field '{other}'")));
            }
            Ok(format!("(data->>'{other}')"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_expr_maps_timestamps_to_columns() {
        assert_eq!(order_expr("createdAt").unwrap(), "created_at");
        assert_eq!(order_expr("updatedAt").unwrap(), "updated_at");
        assert_eq!(order_expr("priority").unwrap(), "(data->>'priority')");
    }

    #[test]
    fn order_expr_rejects_unsafe_fields() {
        assert!(order_expr("priority; DROP TABLE records").is_err());
        assert!(order_expr("").is_err());
    }
}
