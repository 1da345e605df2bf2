use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::StatsSnapshot;

/// One question/answer entry in the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub reply_count: u32,
}

impl QaEntry {
    pub fn new(question: String, answer: String, category: String, tags: Vec<String>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            question,
            answer,
            category,
            tags,
            created_at: now,
            updated_at: now,
            reply_count: 0,
        }
    }
}

/// A user comment attached to a Q&A entry.
///
/// `helpful_voters` is the authoritative record of helpful votes: it holds the
/// ids of users who currently mark the reply helpful, so a repeated toggle by
/// the same user is a no-op pair and the vote count is always the set size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub qa_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub helpful_voters: Vec<String>,
    pub parent_reply_id: Option<String>,
    pub is_deleted: bool,
}

impl Reply {
    pub fn new(
        qa_id: String,
        user_id: String,
        username: String,
        content: String,
        parent_reply_id: Option<String>,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            qa_id,
            user_id,
            username,
            content,
            created_at: now,
            updated_at: now,
            helpful_voters: Vec::new(),
            parent_reply_id,
            is_deleted: false,
        }
    }

    pub fn helpful_votes(&self) -> u32 {
        self.helpful_voters.len() as u32
    }

    pub fn is_helpful_for(&self, viewer_id: &str) -> bool {
        self.helpful_voters.iter().any(|v| v == viewer_id)
    }

    /// Viewer-relative projection used in API responses.
    pub fn view(&self, viewer_id: &str) -> ReplyView {
        ReplyView {
            id: self.id.clone(),
            qa_id: self.qa_id.clone(),
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            helpful_votes: self.helpful_votes(),
            is_helpful: self.is_helpful_for(viewer_id),
            parent_reply_id: self.parent_reply_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyView {
    pub id: String,
    pub qa_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub helpful_votes: u32,
    pub is_helpful: bool,
    pub parent_reply_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: i64,
    pub last_login_at: Option<i64>,
    pub is_active: bool,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            created_at: Utc::now().timestamp(),
            last_login_at: None,
            is_active: true,
        }
    }
}

/// Authenticated user attached to request extensions by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// A Q&A entry together with its replies, as returned by search/browse
/// endpoints. Reply views are viewer-relative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaWithReplies {
    #[serde(flatten)]
    pub entry: QaEntry,
    pub replies: Vec<ReplyView>,
}

// Request/response DTOs

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthenticatedUser,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub category: Option<String>,
    pub results: Vec<QaWithReplies>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QaListResponse {
    pub qa_pairs: Vec<QaWithReplies>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddQaRequest {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddQaResponse {
    pub success: bool,
    pub id: String,
    pub message: String,
    pub added_by: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddReplyRequest {
    pub qa_id: String,
    pub content: String,
    pub parent_reply_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateReplyRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub success: bool,
    pub reply: ReplyView,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepliesResponse {
    pub qa_id: String,
    pub replies: Vec<ReplyView>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleHelpfulResponse {
    pub success: bool,
    pub reply_id: String,
    pub is_helpful: bool,
    pub helpful_votes: u32,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskAiRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskAiResponse {
    pub success: bool,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub confidence: f32,
    pub sources: Vec<String>,
    pub reasoning: String,
    pub tools: serde_json::Value,
    pub auto_classified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveAiQaRequest {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: StatsSnapshot,
    pub student_categories: Vec<crate::catalog::CategoryDescriptor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
    pub student_categories: Vec<crate::catalog::CategoryDescriptor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    pub version: String,
    pub uptime: u64,
}
