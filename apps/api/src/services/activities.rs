//! Activity log service. Append-only: there is no update or delete.

use std::sync::Arc;

use serde_json::json;

use crate::models::activity::{Activity, NewActivity};
use crate::models::{with_id, WithId};
use crate::store::{collections::ACTIVITIES, watch, DocStore, LiveQuery, QueryOptions};

use super::ServiceError;

#[derive(Debug, Clone)]
pub struct ActivityQuery {
    /// Filter by broad category ("document", "project", "ai", "profile").
    pub kind: Option<String>,
    pub limit: usize,
}

impl Default for ActivityQuery {
    fn default() -> Self {
        Self {
            kind: None,
            limit: 10,
        }
    }
}

/// Appends an activity entry and returns its ID.
pub async fn log_activity(
    store: &dyn DocStore,
    user_id: &str,
    activity: NewActivity,
) -> Result<String, ServiceError> {
    let entry = Activity {
        user_id: user_id.to_string(),
        kind: activity.kind,
        action: activity.action,
        title: activity.title,
        description: activity.description,
        metadata: activity.metadata.unwrap_or_else(|| json!({})),
    };
    Ok(store
        .insert(ACTIVITIES, serde_json::to_value(&entry)?)
        .await?)
}

pub async fn list_activities(
    store: &dyn DocStore,
    user_id: &str,
    query: ActivityQuery,
) -> Result<Vec<WithId<Activity>>, ServiceError> {
    let records = store
        .query(ACTIVITIES, activity_options(user_id, &query))
        .await?;
    records
        .into_iter()
        .map(|record| with_id(record).map_err(ServiceError::from))
        .collect()
}

/// Live view of the same query: a fresh snapshot after every activity write.
pub fn watch_activities(
    store: Arc<dyn DocStore>,
    user_id: &str,
    query: ActivityQuery,
) -> LiveQuery {
    let options = activity_options(user_id, &query);
    watch(store, ACTIVITIES, options)
}

fn activity_options(user_id: &str, query: &ActivityQuery) -> QueryOptions {
    let mut options = QueryOptions::new().filter("userId", user_id);
    if let Some(kind) = &query.kind {
        options = options.filter("type", kind.as_str());
    }
    options.order_desc("createdAt").limit(query.limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LiveEvent, MemStore};

    fn entry(kind: &str, title: &str) -> NewActivity {
        NewActivity {
            kind: kind.to_string(),
            action: "created".to_string(),
            title: title.to_string(),
            ..NewActivity::default()
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_and_limited() {
        let store = MemStore::new();
        for i in 0..4 {
            log_activity(&store, "u1", entry("document", &format!("doc {i}")))
                .await
                .unwrap();
        }

        let activities = list_activities(
            &store,
            "u1",
            ActivityQuery {
                limit: 3,
                ..ActivityQuery::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(activities.len(), 3);
        assert_eq!(activities[0].data.title, "doc 3");
    }

    #[tokio::test]
    async fn list_filters_by_kind() {
        let store = MemStore::new();
        log_activity(&store, "u1", entry("document", "a")).await.unwrap();
        log_activity(&store, "u1", entry("project", "b")).await.unwrap();
        log_activity(&store, "u2", entry("project", "c")).await.unwrap();

        let activities = list_activities(
            &store,
            "u1",
            ActivityQuery {
                kind: Some("project".to_string()),
                ..ActivityQuery::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].data.title, "b");
    }

    #[tokio::test]
    async fn watch_delivers_snapshots_on_append() {
        let store = Arc::new(MemStore::new());
        let mut live = watch_activities(store.clone(), "u1", ActivityQuery::default());

        assert!(matches!(
            live.recv().await,
            Some(LiveEvent::Snapshot(ref r)) if r.is_empty()
        ));

        log_activity(store.as_ref(), "u1", entry("ai", "enhanced a doc"))
            .await
            .unwrap();

        match live.recv().await {
            Some(LiveEvent::Snapshot(records)) => assert_eq!(records.len(), 1),
            other => panic!("expected snapshot, got {other:?}"),
        }
    }
}
