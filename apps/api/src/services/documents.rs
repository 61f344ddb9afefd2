//! Document service.
//!
//! Ownership is checked before destructive operations; the owner's document
//! counter is adjusted as a side effect of create/delete. Search is a
//! client-side substring filter over the user's most recent documents; the
//! backing store has no full-text search.

use serde_json::json;
use tracing::{info, warn};

use crate::models::document::{
    Document, DocumentStatus, DocumentType, NewDocument, Sharing, DocumentUpdate,
};
use crate::models::{with_id, WithId};
use crate::store::{collections::DOCUMENTS, DocStore, QueryOptions};

use super::{map_not_found, users, ServiceError};

/// Query options for listing a user's documents.
#[derive(Debug, Clone)]
pub struct DocumentQuery {
    pub doc_type: Option<DocumentType>,
    pub status: Option<DocumentStatus>,
    pub limit: usize,
    pub order_by: String,
    pub descending: bool,
}

impl Default for DocumentQuery {
    fn default() -> Self {
        Self {
            doc_type: None,
            status: None,
            limit: 50,
            order_by: "updatedAt".to_string(),
            descending: true,
        }
    }
}

/// Creates a document and bumps the owner's document counter.
pub async fn create_document(
    store: &dyn DocStore,
    user_id: &str,
    input: NewDocument,
) -> Result<String, ServiceError> {
    if user_id.is_empty() {
        return Err(ServiceError::Validation("User ID is required".to_string()));
    }

    let content = input.content.unwrap_or_default();
    let document = Document {
        user_id: user_id.to_string(),
        title: input
            .title
            .unwrap_or_else(|| "Untitled Document".to_string()),
        doc_type: input.doc_type.unwrap_or_default(),
        status: input.status.unwrap_or_default(),
        metadata: crate::models::document::DocumentMetadata {
            word_count: count_words(&content) as i64,
            tags: input.tags,
            template_id: input.template_id,
            ai_enhanced: input.ai_enhanced,
        },
        content,
        sharing: Sharing::default(),
        stats: Default::default(),
    };

    let id = store
        .insert(DOCUMENTS, serde_json::to_value(&document)?)
        .await?;

    // The counter is best-effort: a missing profile must not fail the create.
    if let Err(err) =
        users::increment_stat(store, user_id, users::StatField::DocumentsCount, 1).await
    {
        warn!("failed to bump document count for {user_id}: {err}");
    }

    info!("created document {id} for {user_id}");
    Ok(id)
}

pub async fn get_document(
    store: &dyn DocStore,
    document_id: &str,
) -> Result<WithId<Document>, ServiceError> {
    let record = store
        .get(DOCUMENTS, document_id)
        .await
        .map_err(|e| map_not_found(e, "Document not found"))?;
    Ok(with_id(record)?)
}

/// Applies a partial update. When content changes the word count is
/// recomputed; stored metadata fields the caller did not touch are preserved.
pub async fn update_document(
    store: &dyn DocStore,
    document_id: &str,
    update: DocumentUpdate,
) -> Result<(), ServiceError> {
    let current = get_document(store, document_id).await?;

    let mut patch = serde_json::Map::new();
    if let Some(title) = update.title {
        patch.insert("title".to_string(), json!(title));
    }
    if let Some(status) = update.status {
        patch.insert("status".to_string(), json!(status));
    }

    let mut metadata = current.data.metadata;
    let mut metadata_touched = false;
    if let Some(tags) = update.tags {
        metadata.tags = tags;
        metadata_touched = true;
    }
    if let Some(template_id) = update.template_id {
        metadata.template_id = Some(template_id);
        metadata_touched = true;
    }
    if let Some(ai_enhanced) = update.ai_enhanced {
        metadata.ai_enhanced = ai_enhanced;
        metadata_touched = true;
    }
    if let Some(content) = update.content {
        metadata.word_count = count_words(&content) as i64;
        metadata_touched = true;
        patch.insert("content".to_string(), json!(content));
    }
    if metadata_touched {
        patch.insert("metadata".to_string(), serde_json::to_value(&metadata)?);
    }

    if patch.is_empty() {
        return Ok(());
    }

    store
        .update(DOCUMENTS, document_id, serde_json::Value::Object(patch))
        .await
        .map_err(|e| map_not_found(e, "Document not found"))
}

/// Status-only update; invalid values are unrepresentable in the enum.
pub async fn update_status(
    store: &dyn DocStore,
    document_id: &str,
    status: DocumentStatus,
) -> Result<(), ServiceError> {
    update_document(
        store,
        document_id,
        DocumentUpdate {
            status: Some(status),
            ..DocumentUpdate::default()
        },
    )
    .await
}

/// Deletes a document after verifying ownership, then decrements the owner's
/// document counter (floored at zero).
pub async fn delete_document(
    store: &dyn DocStore,
    document_id: &str,
    user_id: &str,
) -> Result<(), ServiceError> {
    let document = get_document(store, document_id).await?;
    if document.data.user_id != user_id {
        return Err(ServiceError::Unauthorized(
            "Unauthorized to delete this document".to_string(),
        ));
    }

    store.remove(DOCUMENTS, document_id).await?;

    if let Err(err) =
        users::increment_stat(store, user_id, users::StatField::DocumentsCount, -1).await
    {
        warn!("failed to lower document count for {user_id}: {err}");
    }
    Ok(())
}

pub async fn list_documents(
    store: &dyn DocStore,
    user_id: &str,
    query: DocumentQuery,
) -> Result<Vec<WithId<Document>>, ServiceError> {
    let mut options = QueryOptions::new().filter("userId", user_id);
    if let Some(doc_type) = query.doc_type {
        options = options.filter("type", serde_json::to_value(doc_type)?);
    }
    if let Some(status) = query.status {
        options = options.filter("status", serde_json::to_value(status)?);
    }
    options = if query.descending {
        options.order_desc(&query.order_by)
    } else {
        options.order_asc(&query.order_by)
    };
    options = options.limit(query.limit);

    let records = store.query(DOCUMENTS, options).await?;
    records
        .into_iter()
        .map(|record| with_id(record).map_err(ServiceError::from))
        .collect()
}

/// Ownership-checked copy with reset stats and sharing, created as a draft.
pub async fn duplicate_document(
    store: &dyn DocStore,
    document_id: &str,
    user_id: &str,
) -> Result<String, ServiceError> {
    let original = get_document(store, document_id).await?;
    if original.data.user_id != user_id {
        return Err(ServiceError::Unauthorized(
            "Unauthorized to duplicate this document".to_string(),
        ));
    }

    let source = original.data;
    create_document(
        store,
        user_id,
        NewDocument {
            title: Some(format!("{} (Copy)", source.title)),
            doc_type: Some(source.doc_type),
            status: Some(DocumentStatus::Draft),
            content: Some(source.content),
            tags: source.metadata.tags,
            template_id: source.metadata.template_id,
            ai_enhanced: source.metadata.ai_enhanced,
        },
    )
    .await
}

/// Toggles public sharing. The share link is a plain unlisted URL derived from
/// the document ID, with no access token.
pub async fn share_document(
    store: &dyn DocStore,
    document_id: &str,
    is_public: bool,
    origin: &str,
) -> Result<Option<String>, ServiceError> {
    let current = get_document(store, document_id).await?;

    let share_link = is_public.then(|| format!("{origin}/shared/{document_id}"));
    let sharing = Sharing {
        is_public,
        share_link: share_link.clone(),
        allowed_users: current.data.sharing.allowed_users,
    };

    store
        .update(DOCUMENTS, document_id, json!({ "sharing": sharing }))
        .await
        .map_err(|e| map_not_found(e, "Document not found"))?;
    Ok(share_link)
}

/// Fetches a shared document; fails closed unless `sharing.isPublic`.
pub async fn get_shared_document(
    store: &dyn DocStore,
    document_id: &str,
) -> Result<WithId<Document>, ServiceError> {
    let document = get_document(store, document_id).await?;
    if !document.data.sharing.is_public {
        return Err(ServiceError::NotFound("Document not found".to_string()));
    }
    Ok(document)
}

/// Bumps the view counter on a document.
pub async fn increment_doc_views(
    store: &dyn DocStore,
    document_id: &str,
) -> Result<(), ServiceError> {
    store
        .increment(DOCUMENTS, document_id, "stats.views", 1)
        .await
        .map_err(|e| map_not_found(e, "Document not found"))
}

/// Case-insensitive substring match on titles over the user's 100 most recent
/// documents.
pub async fn search_documents(
    store: &dyn DocStore,
    user_id: &str,
    term: &str,
) -> Result<Vec<WithId<Document>>, ServiceError> {
    let documents = list_documents(
        store,
        user_id,
        DocumentQuery {
            limit: 100,
            ..DocumentQuery::default()
        },
    )
    .await?;

    let needle = term.to_lowercase();
    Ok(documents
        .into_iter()
        .filter(|doc| doc.data.title.to_lowercase().contains(&needle))
        .collect())
}

/// Deletes documents one by one; not transactional. Partial failure is
/// reported only through the final count.
pub async fn batch_delete_documents(
    store: &dyn DocStore,
    document_ids: &[String],
    user_id: &str,
) -> Result<usize, ServiceError> {
    let mut deleted = 0;
    for document_id in document_ids {
        match delete_document(store, document_id, user_id).await {
            Ok(()) => deleted += 1,
            Err(err) => warn!("batch delete skipped {document_id}: {err}"),
        }
    }
    Ok(deleted)
}

/// Whitespace-delimited token count.
pub fn count_words(content: &str) -> usize {
    content.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::ProfileSeed;
    use crate::store::MemStore;

    async fn store_with_user(user_id: &str) -> MemStore {
        let store = MemStore::new();
        users::create_profile(
            &store,
            user_id,
            ProfileSeed {
                email: format!("{user_id}@example.com"),
                ..ProfileSeed::default()
            },
        )
        .await
        .unwrap();
        store
    }

    fn draft(title: &str, content: &str) -> NewDocument {
        NewDocument {
            title: Some(title.to_string()),
            doc_type: Some(DocumentType::Resume),
            content: Some(content.to_string()),
            ..NewDocument::default()
        }
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("one"), 1);
        assert_eq!(count_words("  two\n words\t here  "), 3);
    }

    #[tokio::test]
    async fn crud_round_trip_recomputes_word_count() {
        let store = store_with_user("u1").await;

        let id = create_document(&store, "u1", draft("My Resume", "alpha beta gamma"))
            .await
            .unwrap();

        let doc = get_document(&store, &id).await.unwrap();
        assert_eq!(doc.data.title, "My Resume");
        assert_eq!(doc.data.doc_type, DocumentType::Resume);
        assert_eq!(doc.data.content, "alpha beta gamma");
        assert_eq!(doc.data.metadata.word_count, 3);

        update_document(
            &store,
            &id,
            DocumentUpdate {
                content: Some("one two three four five".to_string()),
                ..DocumentUpdate::default()
            },
        )
        .await
        .unwrap();
        let doc = get_document(&store, &id).await.unwrap();
        assert_eq!(doc.data.metadata.word_count, 5);

        delete_document(&store, &id, "u1").await.unwrap();
        let err = get_document(&store, &id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn content_update_preserves_tags() {
        let store = store_with_user("u1").await;
        let id = create_document(
            &store,
            "u1",
            NewDocument {
                tags: vec!["client-a".to_string()],
                ..draft("Tagged", "hello world")
            },
        )
        .await
        .unwrap();

        update_document(
            &store,
            &id,
            DocumentUpdate {
                content: Some("rewritten".to_string()),
                ..DocumentUpdate::default()
            },
        )
        .await
        .unwrap();

        let doc = get_document(&store, &id).await.unwrap();
        assert_eq!(doc.data.metadata.tags, vec!["client-a"]);
        assert_eq!(doc.data.metadata.word_count, 1);
    }

    #[tokio::test]
    async fn create_and_delete_adjust_counter() {
        let store = store_with_user("u1").await;
        let id = create_document(&store, "u1", draft("Doc", "")).await.unwrap();
        assert_eq!(
            users::get_profile(&store, "u1").await.unwrap().documents_count,
            1
        );

        delete_document(&store, &id, "u1").await.unwrap();
        assert_eq!(
            users::get_profile(&store, "u1").await.unwrap().documents_count,
            0
        );
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_rejected_and_keeps_document() {
        let store = store_with_user("u1").await;
        let id = create_document(&store, "u1", draft("Mine", "")).await.unwrap();

        let err = delete_document(&store, &id, "intruder").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
        assert!(get_document(&store, &id).await.is_ok());
    }

    #[tokio::test]
    async fn duplicate_by_non_owner_is_rejected() {
        let store = store_with_user("u1").await;
        let id = create_document(&store, "u1", draft("Mine", "")).await.unwrap();

        let err = duplicate_document(&store, &id, "intruder").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn duplicate_resets_stats_and_sharing() {
        let store = store_with_user("u1").await;
        let id = create_document(&store, "u1", draft("Mine", "body text"))
            .await
            .unwrap();
        share_document(&store, &id, true, "https://verolabz.app")
            .await
            .unwrap();
        increment_doc_views(&store, &id).await.unwrap();

        let copy_id = duplicate_document(&store, &id, "u1").await.unwrap();
        let copy = get_document(&store, &copy_id).await.unwrap();

        assert_eq!(copy.data.title, "Mine (Copy)");
        assert_eq!(copy.data.status, DocumentStatus::Draft);
        assert_eq!(copy.data.stats.views, 0);
        assert!(!copy.data.sharing.is_public);
        assert!(copy.data.sharing.share_link.is_none());
        assert_eq!(copy.data.content, "body text");
    }

    #[tokio::test]
    async fn share_link_shape_and_unshare() {
        let store = store_with_user("u1").await;
        let id = create_document(&store, "u1", draft("Shared", "")).await.unwrap();

        let link = share_document(&store, &id, true, "https://verolabz.app")
            .await
            .unwrap();
        assert_eq!(link, Some(format!("https://verolabz.app/shared/{id}")));
        assert!(get_shared_document(&store, &id).await.is_ok());

        let link = share_document(&store, &id, false, "https://verolabz.app")
            .await
            .unwrap();
        assert!(link.is_none());
        assert!(get_shared_document(&store, &id).await.is_err());
    }

    #[tokio::test]
    async fn list_filters_by_type_and_status() {
        let store = store_with_user("u1").await;
        create_document(&store, "u1", draft("Resume", "")).await.unwrap();
        create_document(
            &store,
            "u1",
            NewDocument {
                doc_type: Some(DocumentType::Proposal),
                ..draft("Proposal", "")
            },
        )
        .await
        .unwrap();

        let resumes = list_documents(
            &store,
            "u1",
            DocumentQuery {
                doc_type: Some(DocumentType::Resume),
                ..DocumentQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0].data.title, "Resume");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = store_with_user("u1").await;
        create_document(&store, "u1", draft("Client Proposal", "")).await.unwrap();
        create_document(&store, "u1", draft("Resume 2026", "")).await.unwrap();

        let hits = search_documents(&store, "u1", "proposal").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].data.title, "Client Proposal");

        assert!(search_documents(&store, "u1", "invoice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn batch_delete_reports_partial_success() {
        let store = store_with_user("u1").await;
        let mine = create_document(&store, "u1", draft("Mine", "")).await.unwrap();

        users::create_profile(&store, "u2", ProfileSeed::default())
            .await
            .unwrap();
        let theirs = create_document(&store, "u2", draft("Theirs", "")).await.unwrap();

        let deleted = batch_delete_documents(
            &store,
            &[mine.clone(), theirs.clone(), "missing".to_string()],
            "u1",
        )
        .await
        .unwrap();

        assert_eq!(deleted, 1);
        assert!(get_document(&store, &mine).await.is_err());
        assert!(get_document(&store, &theirs).await.is_ok());
    }

    #[tokio::test]
    async fn status_transitions_through_allowed_values() {
        let store = store_with_user("u1").await;
        let id = create_document(&store, "u1", draft("Doc", "")).await.unwrap();

        update_status(&store, &id, DocumentStatus::Published)
            .await
            .unwrap();
        assert_eq!(
            get_document(&store, &id).await.unwrap().data.status,
            DocumentStatus::Published
        );

        update_status(&store, &id, DocumentStatus::Archived)
            .await
            .unwrap();
        assert_eq!(
            get_document(&store, &id).await.unwrap().data.status,
            DocumentStatus::Archived
        );
    }

    #[tokio::test]
    async fn create_requires_user_id() {
        let store = MemStore::new();
        let err = create_document(&store, "", NewDocument::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
