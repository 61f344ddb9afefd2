use serde::{Deserialize, Serialize};

/// Domain document kinds. `Portfolio` here is the exported-portfolio artifact,
/// not the portfolio page itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    Resume,
    Proposal,
    Contract,
    CoverLetter,
    Portfolio,
    Other,
}

impl Default for DocumentType {
    fn default() -> Self {
        DocumentType::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Published,
    Archived,
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Draft
    }
}

/// A user-authored document (resume, proposal, ...) with metadata and
/// lifecycle status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub user_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub status: DocumentStatus,
    pub content: String,
    pub metadata: DocumentMetadata,
    pub sharing: Sharing,
    pub stats: DocumentStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMetadata {
    pub word_count: i64,
    pub tags: Vec<String>,
    pub template_id: Option<String>,
    pub ai_enhanced: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sharing {
    pub is_public: bool,
    pub share_link: Option<String>,
    pub allowed_users: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentStats {
    pub views: i64,
    pub downloads: i64,
    pub shares: i64,
}

/// Input for document creation. Untitled/other/draft defaults match the SPA.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDocument {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
    pub status: Option<DocumentStatus>,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub template_id: Option<String>,
    pub ai_enhanced: bool,
}

/// Partial document update. A `content` change recomputes the word count.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub status: Option<DocumentStatus>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub template_id: Option<String>,
    pub ai_enhanced: Option<bool>,
}
