use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An append-only activity log entry. There is no update or delete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    pub user_id: String,
    /// Broad category: "document", "project", "ai", "profile".
    #[serde(rename = "type")]
    pub kind: String,
    /// What happened: "created", "updated", "completed", "deleted".
    pub action: String,
    pub title: String,
    pub description: String,
    pub metadata: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewActivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub action: String,
    pub title: String,
    pub description: String,
    pub metadata: Option<Value>,
}
