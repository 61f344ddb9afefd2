use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserProfile;

/// A portfolio document. Shares its ID with the owning user; one per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Portfolio {
    pub user_id: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub socials: BTreeMap<String, String>,
    pub projects: Vec<Project>,
    pub is_published: bool,
    pub views: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_viewed_at: Option<DateTime<Utc>>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            name: String::new(),
            title: String::new(),
            bio: String::new(),
            skills: Vec::new(),
            socials: BTreeMap::new(),
            projects: Vec::new(),
            is_published: false,
            views: 0,
            published_at: None,
            last_viewed_at: None,
        }
    }
}

/// A project embedded in a portfolio's `projects` list. The ID is a
/// client-generated epoch-millis string, unique only within one portfolio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tech: Vec<String>,
    pub live_url: String,
    pub github_url: String,
    pub image: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Caller-supplied portfolio fields for a save. Everything defaults to empty;
/// `views` and publish timestamps are never written through this path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioInput {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub socials: BTreeMap<String, String>,
    pub projects: Vec<Project>,
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub tech: Vec<String>,
    pub live_url: String,
    pub github_url: String,
    pub image: String,
}

/// Partial project update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tech: Option<Vec<String>>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub image: Option<String>,
}

/// A published portfolio as served on the public page, with the owner's
/// profile alongside.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPortfolio {
    pub id: String,
    #[serde(flatten)]
    pub portfolio: Portfolio,
    pub user_data: UserProfile,
}
