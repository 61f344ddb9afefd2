use serde::{Deserialize, Serialize};

/// A user's current aggregate counters, as read from the profile.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub portfolio_views: i64,
    pub documents: i64,
    pub projects: i64,
    pub ai_enhancements: i64,
}

/// An immutable copy of a user's counters, written by the snapshot endpoint
/// and used only as a historical comparison point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub user_id: String,
    pub portfolio_views: i64,
    pub documents: i64,
    pub projects: i64,
    pub ai_enhancements: i64,
}

/// Percentage or absolute delta against the oldest snapshot in the window.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub value: i64,
    pub is_positive: bool,
}

impl Default for Trend {
    fn default() -> Self {
        // A flat trend reads as positive.
        Self {
            value: 0,
            is_positive: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub portfolio_views: Trend,
    pub documents: Trend,
    pub projects: Trend,
    pub ai_enhancements: Trend,
}
