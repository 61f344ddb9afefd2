use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Suggestion lifecycle. `dismissed` and `completed` are terminal; nothing
/// exposes a path back to `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Active,
    Dismissed,
    Completed,
}

impl Default for SuggestionStatus {
    fn default() -> Self {
        SuggestionStatus::Active
    }
}

/// A personalized recommendation surfaced on the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Suggestion {
    pub user_id: String,
    /// What the suggestion concerns: "profile", "portfolio", "document", "project".
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    /// Machine-readable action hint, e.g. "update_profile", "add_project".
    pub action: String,
    pub action_url: String,
    /// 1–5, higher is more important.
    pub priority: i64,
    pub status: SuggestionStatus,
    pub metadata: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub action: String,
    pub action_url: String,
    pub priority: Option<i64>,
    pub metadata: Option<Value>,
}
