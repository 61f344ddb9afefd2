//! Analytics service.
//!
//! Snapshots are immutable copies of a user's counters, written on an external
//! scheduler's cadence. Trends compare current counters against the oldest
//! snapshot inside the lookback window: percentage change for views and AI
//! enhancements, absolute delta for documents and projects.

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::models::analytics::{Snapshot, Stats, Trend, Trends};
use crate::store::{
    collections::{ANALYTICS, USERS},
    DocStore, QueryOptions,
};

use super::{map_not_found, ServiceError};

/// Snapshots considered per trend computation.
const SNAPSHOT_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub analytics: Stats,
    pub trends: Trends,
}

/// Persists the user's current counters as a snapshot and returns its ID.
/// Meant to be driven by an external scheduler (e.g. daily).
pub async fn save_snapshot(store: &dyn DocStore, user_id: &str) -> Result<String, ServiceError> {
    let stats = current_stats(store, user_id).await?;
    let snapshot = Snapshot {
        user_id: user_id.to_string(),
        portfolio_views: stats.portfolio_views,
        documents: stats.documents,
        projects: stats.projects,
        ai_enhancements: stats.ai_enhancements,
    };
    Ok(store
        .insert(ANALYTICS, serde_json::to_value(&snapshot)?)
        .await?)
}

/// Current counters plus trends over the last `period_days` days.
pub async fn get_trends(
    store: &dyn DocStore,
    user_id: &str,
    period_days: i64,
) -> Result<AnalyticsReport, ServiceError> {
    let stats = current_stats(store, user_id).await?;

    let cutoff = Utc::now() - Duration::days(period_days);
    let records = store
        .query(
            ANALYTICS,
            QueryOptions::new()
                .filter("userId", user_id)
                .created_after(cutoff)
                .order_desc("createdAt")
                .limit(SNAPSHOT_LIMIT),
        )
        .await?;

    // Newest-first ordering: the last record is the oldest in the window.
    let oldest = match records.last() {
        Some(record) => Some(record.decode::<Snapshot>()?),
        None => None,
    };

    Ok(AnalyticsReport {
        analytics: stats,
        trends: compute_trends(&stats, oldest.as_ref()),
    })
}

/// Trend arithmetic, split out for direct testing.
pub fn compute_trends(current: &Stats, oldest: Option<&Snapshot>) -> Trends {
    let Some(oldest) = oldest else {
        return Trends::default();
    };

    Trends {
        portfolio_views: percent_trend(current.portfolio_views, oldest.portfolio_views),
        documents: delta_trend(current.documents, oldest.documents),
        projects: delta_trend(current.projects, oldest.projects),
        ai_enhancements: percent_trend(current.ai_enhancements, oldest.ai_enhancements),
    }
}

/// Percentage change against the baseline. A zero baseline with a non-zero
/// current value reads as a 100%-positive trend carrying the current value.
fn percent_trend(current: i64, baseline: i64) -> Trend {
    if baseline > 0 {
        let change = (current - baseline) as f64 / baseline as f64 * 100.0;
        Trend {
            value: (change.round() as i64).abs(),
            is_positive: change >= 0.0,
        }
    } else if current > 0 {
        Trend {
            value: current,
            is_positive: true,
        }
    } else {
        Trend::default()
    }
}

fn delta_trend(current: i64, baseline: i64) -> Trend {
    let change = current - baseline;
    Trend {
        value: change.abs(),
        is_positive: change >= 0,
    }
}

async fn current_stats(store: &dyn DocStore, user_id: &str) -> Result<Stats, ServiceError> {
    let record = store
        .get(USERS, user_id)
        .await
        .map_err(|e| map_not_found(e, "User not found"))?;
    let data = &record.data;
    let counter = |field: &str| data.get(field).and_then(serde_json::Value::as_i64).unwrap_or(0);

    Ok(Stats {
        portfolio_views: counter("portfolioViews"),
        documents: counter("documentsCount"),
        projects: counter("projectsCount"),
        ai_enhancements: counter("aiEnhancementsCount"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::ProfileSeed;
    use crate::services::users::{self, StatField};
    use crate::store::MemStore;

    #[test]
    fn views_grow_fifty_percent() {
        let current = Stats {
            portfolio_views: 150,
            ..Stats::default()
        };
        let oldest = Snapshot {
            portfolio_views: 100,
            ..Snapshot::default()
        };
        let trends = compute_trends(&current, Some(&oldest));
        assert_eq!(
            trends.portfolio_views,
            Trend {
                value: 50,
                is_positive: true
            }
        );
    }

    #[test]
    fn zero_baseline_reports_current_value() {
        let current = Stats {
            portfolio_views: 150,
            ..Stats::default()
        };
        let oldest = Snapshot::default();
        let trends = compute_trends(&current, Some(&oldest));
        assert_eq!(
            trends.portfolio_views,
            Trend {
                value: 150,
                is_positive: true
            }
        );
    }

    #[test]
    fn declining_views_are_negative() {
        let current = Stats {
            portfolio_views: 50,
            ..Stats::default()
        };
        let oldest = Snapshot {
            portfolio_views: 100,
            ..Snapshot::default()
        };
        let trends = compute_trends(&current, Some(&oldest));
        assert_eq!(
            trends.portfolio_views,
            Trend {
                value: 50,
                is_positive: false
            }
        );
    }

    #[test]
    fn documents_use_absolute_delta() {
        let current = Stats {
            documents: 7,
            projects: 1,
            ..Stats::default()
        };
        let oldest = Snapshot {
            documents: 4,
            projects: 3,
            ..Snapshot::default()
        };
        let trends = compute_trends(&current, Some(&oldest));
        assert_eq!(
            trends.documents,
            Trend {
                value: 3,
                is_positive: true
            }
        );
        assert_eq!(
            trends.projects,
            Trend {
                value: 2,
                is_positive: false
            }
        );
    }

    #[test]
    fn no_snapshots_means_flat_positive_trends() {
        let trends = compute_trends(&Stats::default(), None);
        assert_eq!(trends.documents, Trend { value: 0, is_positive: true });
        assert_eq!(
            trends.portfolio_views,
            Trend {
                value: 0,
                is_positive: true
            }
        );
    }

    #[tokio::test]
    async fn snapshot_then_trends_end_to_end() {
        let store = MemStore::new();
        users::create_profile(&store, "u1", ProfileSeed::default())
            .await
            .unwrap();
        users::increment_stat(&store, "u1", StatField::PortfolioViews, 100)
            .await
            .unwrap();

        save_snapshot(&store, "u1").await.unwrap();

        users::increment_stat(&store, "u1", StatField::PortfolioViews, 50)
            .await
            .unwrap();
        users::increment_stat(&store, "u1", StatField::DocumentsCount, 2)
            .await
            .unwrap();

        let report = get_trends(&store, "u1", 7).await.unwrap();
        assert_eq!(report.analytics.portfolio_views, 150);
        assert_eq!(
            report.trends.portfolio_views,
            Trend {
                value: 50,
                is_positive: true
            }
        );
        assert_eq!(
            report.trends.documents,
            Trend {
                value: 2,
                is_positive: true
            }
        );
    }

    #[tokio::test]
    async fn trends_for_unknown_user_fail() {
        let store = MemStore::new();
        let err = get_trends(&store, "ghost", 7).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
