use serde::{Deserialize, Serialize};

/// A user profile document, keyed by the auth identity ID.
///
/// The counters are adjusted by the domain services as side effects of other
/// operations, never recomputed from a live count at read time; they can drift
/// from ground truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub bio: String,
    pub username: String,
    pub portfolio_url: String,

    pub portfolio_views: i64,
    pub documents_count: i64,
    pub projects_count: i64,
    pub ai_enhancements_count: i64,

    pub preferences: Preferences,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            uid: String::new(),
            email: String::new(),
            display_name: String::new(),
            photo_url: String::new(),
            bio: String::new(),
            username: String::new(),
            portfolio_url: String::new(),
            portfolio_views: 0,
            documents_count: 0,
            projects_count: 0,
            ai_enhancements_count: 0,
            preferences: Preferences::default(),
            last_login_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: String,
    pub email_notifications: bool,
    pub marketing_emails: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            email_notifications: true,
            marketing_emails: false,
        }
    }
}

/// Identity data carried over from the auth provider at sign-up or sign-in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSeed {
    pub email: String,
    pub display_name: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

/// Partial profile update. Absent fields are never written.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_count: Option<i64>,
}
