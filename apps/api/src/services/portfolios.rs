//! Portfolio service.
//!
//! One portfolio per user, stored under the user's ID. Project edits are
//! whole-list read-modify-write; the embedded list is capped at three
//! projects at this layer.

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::models::portfolio::{
    Portfolio, PortfolioInput, Project, ProjectInput, ProjectUpdate, PublicPortfolio,
};
use crate::models::user::UserUpdate;
use crate::store::{
    collections::{PORTFOLIOS, USERS},
    DocStore, QueryOptions,
};

use super::{map_not_found, users, ServiceError};

pub const MAX_PROJECTS: usize = 3;

/// Creates or updates the user's portfolio. Views and publish timestamps are
/// preserved across saves.
pub async fn save_portfolio(
    store: &dyn DocStore,
    user_id: &str,
    input: PortfolioInput,
) -> Result<Portfolio, ServiceError> {
    let fields = json!({
        "userId": user_id,
        "name": input.name,
        "title": input.title,
        "bio": input.bio,
        "skills": input.skills,
        "socials": input.socials,
        "projects": input.projects,
        "isPublished": input.is_published,
    });
    store.set(PORTFOLIOS, user_id, fields, true).await?;
    get_portfolio(store, user_id).await
}

pub async fn get_portfolio(
    store: &dyn DocStore,
    user_id: &str,
) -> Result<Portfolio, ServiceError> {
    let record = store
        .get(PORTFOLIOS, user_id)
        .await
        .map_err(|e| map_not_found(e, "Portfolio not found"))?;
    Ok(record.decode()?)
}

/// Public lookup: resolve the username to a user, then fetch that user's
/// portfolio. Fails closed when the portfolio exists but is unpublished.
pub async fn get_portfolio_by_username(
    store: &dyn DocStore,
    username: &str,
) -> Result<PublicPortfolio, ServiceError> {
    let users = store
        .query(
            USERS,
            QueryOptions::new().filter("username", username).limit(1),
        )
        .await?;
    let user_record = users
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

    let record = store
        .get(PORTFOLIOS, &user_record.id)
        .await
        .map_err(|e| map_not_found(e, "Portfolio not found"))?;
    let portfolio: Portfolio = record.decode()?;

    if !portfolio.is_published {
        return Err(ServiceError::NotFound("Portfolio not published".to_string()));
    }

    Ok(PublicPortfolio {
        id: record.id,
        portfolio,
        user_data: user_record.decode()?,
    })
}

/// Ordered validation errors for a portfolio. Empty means publishable.
pub fn validate_portfolio(portfolio: &Portfolio) -> Vec<String> {
    let mut errors = Vec::new();

    if portfolio.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }
    if portfolio.title.trim().is_empty() {
        errors.push("Title/Role is required".to_string());
    }
    if portfolio.bio.trim().is_empty() {
        errors.push("Bio is required".to_string());
    }
    if portfolio.bio.chars().count() > 500 {
        errors.push("Bio must be less than 500 characters".to_string());
    }
    if portfolio.skills.is_empty() {
        errors.push("At least one skill is required".to_string());
    }
    if portfolio.projects.is_empty() {
        errors.push("At least one project is required".to_string());
    }

    errors
}

/// Publishes the portfolio. Gated on [`validate_portfolio`]: an invalid
/// portfolio fails here without any mutation.
pub async fn publish(store: &dyn DocStore, user_id: &str) -> Result<(), ServiceError> {
    let portfolio = get_portfolio(store, user_id).await?;

    let errors = validate_portfolio(&portfolio);
    if !errors.is_empty() {
        return Err(ServiceError::Validation(errors.join(", ")));
    }

    store
        .update(
            PORTFOLIOS,
            user_id,
            json!({ "isPublished": true, "publishedAt": Utc::now() }),
        )
        .await
        .map_err(|e| map_not_found(e, "Portfolio not found"))?;
    info!("published portfolio for {user_id}");
    Ok(())
}

pub async fn unpublish(store: &dyn DocStore, user_id: &str) -> Result<(), ServiceError> {
    store
        .update(PORTFOLIOS, user_id, json!({ "isPublished": false }))
        .await
        .map_err(|e| map_not_found(e, "Portfolio not found"))
}

pub async fn delete_portfolio(store: &dyn DocStore, user_id: &str) -> Result<(), ServiceError> {
    store.remove(PORTFOLIOS, user_id).await?;
    Ok(())
}

/// Appends a project to the embedded list and syncs the user's project count.
pub async fn add_project(
    store: &dyn DocStore,
    user_id: &str,
    input: ProjectInput,
) -> Result<Project, ServiceError> {
    let mut portfolio = get_portfolio(store, user_id).await?;

    if portfolio.projects.len() >= MAX_PROJECTS {
        return Err(ServiceError::Validation(format!(
            "Maximum of {MAX_PROJECTS} projects allowed"
        )));
    }

    // Epoch-millis ID, nudged forward until unique within this list.
    let mut id = Utc::now().timestamp_millis();
    while portfolio.projects.iter().any(|p| p.id == id.to_string()) {
        id += 1;
    }

    let project = Project {
        id: id.to_string(),
        name: input.name,
        description: input.description,
        tech: input.tech,
        live_url: input.live_url,
        github_url: input.github_url,
        image: input.image,
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    };
    portfolio.projects.push(project.clone());

    write_projects(store, user_id, &portfolio.projects).await?;
    sync_project_count(store, user_id, portfolio.projects.len()).await?;
    Ok(project)
}

/// Applies a partial update to one embedded project.
pub async fn update_project(
    store: &dyn DocStore,
    user_id: &str,
    project_id: &str,
    update: ProjectUpdate,
) -> Result<(), ServiceError> {
    let mut portfolio = get_portfolio(store, user_id).await?;

    let project = portfolio
        .projects
        .iter_mut()
        .find(|p| p.id == project_id)
        .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

    if let Some(name) = update.name {
        project.name = name;
    }
    if let Some(description) = update.description {
        project.description = description;
    }
    if let Some(tech) = update.tech {
        project.tech = tech;
    }
    if let Some(live_url) = update.live_url {
        project.live_url = live_url;
    }
    if let Some(github_url) = update.github_url {
        project.github_url = github_url;
    }
    if let Some(image) = update.image {
        project.image = image;
    }
    project.updated_at = Some(Utc::now().to_rfc3339());

    write_projects(store, user_id, &portfolio.projects).await
}

/// Removes a project. Removing an unknown ID is a no-op, as in the SPA.
pub async fn delete_project(
    store: &dyn DocStore,
    user_id: &str,
    project_id: &str,
) -> Result<(), ServiceError> {
    let mut portfolio = get_portfolio(store, user_id).await?;
    portfolio.projects.retain(|p| p.id != project_id);

    write_projects(store, user_id, &portfolio.projects).await?;
    sync_project_count(store, user_id, portfolio.projects.len()).await
}

/// Bumps the portfolio view counter and mirrors it onto the user profile.
pub async fn increment_views(store: &dyn DocStore, user_id: &str) -> Result<(), ServiceError> {
    store
        .increment(PORTFOLIOS, user_id, "views", 1)
        .await
        .map_err(|e| map_not_found(e, "Portfolio not found"))?;
    store
        .update(
            PORTFOLIOS,
            user_id,
            json!({ "lastViewedAt": Utc::now() }),
        )
        .await
        .map_err(|e| map_not_found(e, "Portfolio not found"))?;

    users::increment_stat(store, user_id, users::StatField::PortfolioViews, 1).await
}

/// Public portfolio page URL.
pub fn portfolio_url(origin: &str, username: &str) -> String {
    format!("{origin}/u/{username}")
}

async fn write_projects(
    store: &dyn DocStore,
    user_id: &str,
    projects: &[Project],
) -> Result<(), ServiceError> {
    store
        .update(PORTFOLIOS, user_id, json!({ "projects": projects }))
        .await
        .map_err(|e| map_not_found(e, "Portfolio not found"))
}

async fn sync_project_count(
    store: &dyn DocStore,
    user_id: &str,
    count: usize,
) -> Result<(), ServiceError> {
    users::update_profile(
        store,
        user_id,
        &UserUpdate {
            projects_count: Some(count as i64),
            ..UserUpdate::default()
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::ProfileSeed;
    use crate::store::MemStore;

    fn valid_input() -> PortfolioInput {
        PortfolioInput {
            name: "Jane Doe".to_string(),
            title: "Full-stack developer".to_string(),
            bio: "I build things.".to_string(),
            skills: vec!["Rust".to_string()],
            projects: vec![Project {
                id: "1".to_string(),
                name: "Demo".to_string(),
                ..Project::default()
            }],
            ..PortfolioInput::default()
        }
    }

    async fn store_with_user() -> MemStore {
        let store = MemStore::new();
        users::create_profile(
            &store,
            "u1",
            ProfileSeed {
                email: "jane@example.com".to_string(),
                ..ProfileSeed::default()
            },
        )
        .await
        .unwrap();
        store
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let store = store_with_user().await;
        let saved = save_portfolio(&store, "u1", valid_input()).await.unwrap();
        assert_eq!(saved.name, "Jane Doe");

        let fetched = get_portfolio(&store, "u1").await.unwrap();
        assert_eq!(fetched.title, "Full-stack developer");
        assert!(!fetched.is_published);
    }

    #[tokio::test]
    async fn validation_errors_are_ordered() {
        let portfolio = Portfolio {
            bio: "x".repeat(501),
            ..Portfolio::default()
        };
        let errors = validate_portfolio(&portfolio);
        assert_eq!(
            errors,
            vec![
                "Name is required",
                "Title/Role is required",
                "Bio must be less than 500 characters",
                "At least one skill is required",
                "At least one project is required",
            ]
        );
    }

    #[tokio::test]
    async fn publish_rejects_incomplete_portfolio_without_mutation() {
        let store = store_with_user().await;
        let mut input = valid_input();
        input.skills.clear();
        save_portfolio(&store, "u1", input).await.unwrap();

        let err = publish(&store, "u1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let portfolio = get_portfolio(&store, "u1").await.unwrap();
        assert!(!portfolio.is_published);
        assert!(portfolio.published_at.is_none());
    }

    #[tokio::test]
    async fn publish_sets_flag_and_timestamp() {
        let store = store_with_user().await;
        save_portfolio(&store, "u1", valid_input()).await.unwrap();

        publish(&store, "u1").await.unwrap();

        let portfolio = get_portfolio(&store, "u1").await.unwrap();
        assert!(portfolio.is_published);
        assert!(portfolio.published_at.is_some());

        unpublish(&store, "u1").await.unwrap();
        assert!(!get_portfolio(&store, "u1").await.unwrap().is_published);
    }

    #[tokio::test]
    async fn lookup_by_username_fails_closed_when_unpublished() {
        let store = store_with_user().await;
        save_portfolio(&store, "u1", valid_input()).await.unwrap();
        let username = users::get_profile(&store, "u1").await.unwrap().username;

        let err = get_portfolio_by_username(&store, &username)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        publish(&store, "u1").await.unwrap();
        let public = get_portfolio_by_username(&store, &username).await.unwrap();
        assert_eq!(public.id, "u1");
        assert_eq!(public.user_data.email, "jane@example.com");
    }

    #[tokio::test]
    async fn lookup_by_unknown_username_is_user_not_found() {
        let store = MemStore::new();
        let err = get_portfolio_by_username(&store, "nobody42")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn add_project_caps_at_three_and_syncs_count() {
        let store = store_with_user().await;
        let mut input = valid_input();
        input.projects.clear();
        save_portfolio(&store, "u1", input).await.unwrap();

        for i in 0..3 {
            add_project(
                &store,
                "u1",
                ProjectInput {
                    name: format!("p{i}"),
                    ..ProjectInput::default()
                },
            )
            .await
            .unwrap();
        }

        let err = add_project(&store, "u1", ProjectInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let profile = users::get_profile(&store, "u1").await.unwrap();
        assert_eq!(profile.projects_count, 3);
        let portfolio = get_portfolio(&store, "u1").await.unwrap();
        assert_eq!(portfolio.projects.len(), 3);

        // IDs are unique within the list even when added back-to-back.
        let mut ids: Vec<_> = portfolio.projects.iter().map(|p| p.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn update_and_delete_project() {
        let store = store_with_user().await;
        let mut input = valid_input();
        input.projects.clear();
        save_portfolio(&store, "u1", input).await.unwrap();

        let project = add_project(
            &store,
            "u1",
            ProjectInput {
                name: "Original".to_string(),
                ..ProjectInput::default()
            },
        )
        .await
        .unwrap();

        update_project(
            &store,
            "u1",
            &project.id,
            ProjectUpdate {
                name: Some("Renamed".to_string()),
                ..ProjectUpdate::default()
            },
        )
        .await
        .unwrap();

        let portfolio = get_portfolio(&store, "u1").await.unwrap();
        assert_eq!(portfolio.projects[0].name, "Renamed");
        assert!(portfolio.projects[0].updated_at.is_some());

        delete_project(&store, "u1", &project.id).await.unwrap();
        let portfolio = get_portfolio(&store, "u1").await.unwrap();
        assert!(portfolio.projects.is_empty());
        assert_eq!(
            users::get_profile(&store, "u1").await.unwrap().projects_count,
            0
        );
    }

    #[tokio::test]
    async fn update_unknown_project_is_not_found() {
        let store = store_with_user().await;
        save_portfolio(&store, "u1", valid_input()).await.unwrap();
        let err = update_project(&store, "u1", "missing", ProjectUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Project not found"));
    }

    #[tokio::test]
    async fn increment_views_touches_portfolio_and_profile() {
        let store = store_with_user().await;
        save_portfolio(&store, "u1", valid_input()).await.unwrap();

        increment_views(&store, "u1").await.unwrap();
        increment_views(&store, "u1").await.unwrap();

        let portfolio = get_portfolio(&store, "u1").await.unwrap();
        assert_eq!(portfolio.views, 2);
        assert!(portfolio.last_viewed_at.is_some());
        assert_eq!(
            users::get_profile(&store, "u1").await.unwrap().portfolio_views,
            2
        );
    }

    #[test]
    fn portfolio_url_shape() {
        assert_eq!(
            portfolio_url("https://verolabz.app", "janedoe42"),
            "https://verolabz.app/u/janedoe42"
        );
    }
}
