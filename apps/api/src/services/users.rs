//! User profile service.
//!
//! Profiles share their ID with the auth identity. Creation is idempotent;
//! counter adjustments go through the store's atomic increment.

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::user::{ProfileSeed, UserProfile, UserUpdate};
use crate::store::{collections::USERS, DocStore, StoreError};

use super::{map_not_found, ServiceError};

/// Counter fields on the user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    PortfolioViews,
    DocumentsCount,
    ProjectsCount,
    AiEnhancementsCount,
}

impl StatField {
    pub fn as_str(self) -> &'static str {
        match self {
            StatField::PortfolioViews => "portfolioViews",
            StatField::DocumentsCount => "documentsCount",
            StatField::ProjectsCount => "projectsCount",
            StatField::AiEnhancementsCount => "aiEnhancementsCount",
        }
    }
}

/// Creates a profile for a new identity. Idempotent: if a profile already
/// exists for `user_id`, it is returned untouched.
pub async fn create_profile(
    store: &dyn DocStore,
    user_id: &str,
    seed: ProfileSeed,
) -> Result<UserProfile, ServiceError> {
    match store.get(USERS, user_id).await {
        Ok(existing) => {
            debug!("user profile {user_id} already exists");
            return Ok(existing.decode()?);
        }
        Err(StoreError::NotFound(_)) => {}
        Err(err) => return Err(err.into()),
    }

    let username = generate_username(if seed.email.is_empty() {
        &seed.display_name
    } else {
        &seed.email
    });

    let profile = UserProfile {
        uid: user_id.to_string(),
        email: seed.email,
        display_name: seed.display_name,
        photo_url: seed.photo_url,
        username,
        last_login_at: Some(Utc::now()),
        ..UserProfile::default()
    };

    store
        .set(USERS, user_id, serde_json::to_value(&profile)?, false)
        .await?;
    info!("created user profile {user_id}");
    Ok(profile)
}

pub async fn get_profile(
    store: &dyn DocStore,
    user_id: &str,
) -> Result<UserProfile, ServiceError> {
    let record = store
        .get(USERS, user_id)
        .await
        .map_err(|e| map_not_found(e, "User profile not found"))?;
    Ok(record.decode()?)
}

/// Merge-writes the provided fields; absent fields are never written. Creates
/// the profile shell if it does not exist yet.
pub async fn update_profile(
    store: &dyn DocStore,
    user_id: &str,
    update: &UserUpdate,
) -> Result<(), ServiceError> {
    let patch = serde_json::to_value(update)?;
    if patch.as_object().is_some_and(Map::is_empty) {
        return Ok(());
    }
    store.set(USERS, user_id, patch, true).await?;
    Ok(())
}

/// Stamps the last-login timestamp.
pub async fn update_last_login(store: &dyn DocStore, user_id: &str) -> Result<(), ServiceError> {
    store
        .set(USERS, user_id, json!({ "lastLoginAt": Utc::now() }), true)
        .await?;
    Ok(())
}

/// Atomically adjusts one of the profile counters.
pub async fn increment_stat(
    store: &dyn DocStore,
    user_id: &str,
    field: StatField,
    delta: i64,
) -> Result<(), ServiceError> {
    store
        .increment(USERS, user_id, field.as_str(), delta)
        .await
        .map_err(|e| map_not_found(e, "User not found"))
}

/// Merges the given entries into the nested preferences map.
pub async fn update_preferences(
    store: &dyn DocStore,
    user_id: &str,
    preferences: &Value,
) -> Result<(), ServiceError> {
    let entries = preferences
        .as_object()
        .ok_or_else(|| ServiceError::Validation("Preferences must be an object".to_string()))?;

    let mut current = match store.get(USERS, user_id).await {
        Ok(record) => record
            .data
            .get("preferences")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        Err(StoreError::NotFound(_)) => Map::new(),
        Err(err) => return Err(err.into()),
    };
    for (key, value) in entries {
        current.insert(key.clone(), value.clone());
    }

    store
        .set(
            USERS,
            user_id,
            json!({ "preferences": Value::Object(current) }),
            true,
        )
        .await?;
    Ok(())
}

/// Reconciles the stored profile with fresh identity data: creates the profile
/// when missing, otherwise copies over any non-empty identity fields.
pub async fn sync_auth_profile(
    store: &dyn DocStore,
    user_id: &str,
    seed: ProfileSeed,
) -> Result<UserProfile, ServiceError> {
    match store.get(USERS, user_id).await {
        Err(StoreError::NotFound(_)) => return create_profile(store, user_id, seed).await,
        Err(err) => return Err(err.into()),
        Ok(_) => {}
    }

    let update = UserUpdate {
        email: (!seed.email.is_empty()).then_some(seed.email),
        display_name: (!seed.display_name.is_empty()).then_some(seed.display_name),
        photo_url: (!seed.photo_url.is_empty()).then_some(seed.photo_url),
        ..UserUpdate::default()
    };
    update_profile(store, user_id, &update).await?;
    get_profile(store, user_id).await
}

/// Derives a username from an email or display name: local part, lowercased,
/// stripped to `[a-z0-9]`, truncated to 20 chars, plus a random 0–999 suffix.
/// Collisions against existing usernames are not checked.
pub fn generate_username(seed: &str) -> String {
    if seed.is_empty() {
        return format!("user{}", Utc::now().timestamp_millis());
    }

    let local = seed.split('@').next().unwrap_or(seed);
    let mut username: String = local
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(20)
        .collect();

    let suffix = Uuid::new_v4().as_u128() % 1000;
    username.push_str(&suffix.to_string());
    username
}

/// Username availability stub: always true. Collision detection is deferred
/// until usernames carry a uniqueness constraint.
pub fn is_username_available(_username: &str) -> bool {
    true
}
