//! File-backed Q&A store.
//!
//! The store owns the Q&A, reply, and user collections. Collections are
//! loaded from flat JSON files on construction and flushed back in full after
//! every mutation. All access goes through a single `RwLock` so that writes
//! are serialized and reads observe a consistent snapshot.

use crate::ai::QaContext;
use crate::error::{AppError, AppResult};
use crate::models::{AuthenticatedUser, QaEntry, QaWithReplies, Reply, ReplyView, User};
use crate::search;
use crate::stats::{self, StatsSnapshot};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const QA_FILE: &str = "qa.json";
const REPLIES_FILE: &str = "replies.json";
const USERS_FILE: &str = "users.json";

struct StoreInner {
    entries: Vec<QaEntry>,
    replies: Vec<Reply>,
    users: Vec<User>,
}

pub struct Store {
    inner: RwLock<StoreInner>,
    data_dir: PathBuf,
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn save_collection<T: Serialize>(path: &Path, items: &[T]) -> AppResult<()> {
    let bytes = serde_json::to_vec_pretty(items)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

impl Store {
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        std::fs::create_dir_all(data_dir)?;

        let inner = StoreInner {
            entries: load_collection(&data_dir.join(QA_FILE))?,
            replies: load_collection(&data_dir.join(REPLIES_FILE))?,
            users: load_collection(&data_dir.join(USERS_FILE))?,
        };

        tracing::info!(
            "Store opened with {} Q&A entries, {} replies, {} users",
            inner.entries.len(),
            inner.replies.len(),
            inner.users.len()
        );

        Ok(Store {
            inner: RwLock::new(inner),
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|e| AppError::Internal(format!("Failed to acquire store read lock: {e}")))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|e| AppError::Internal(format!("Failed to acquire store write lock: {e}")))
    }

    fn save_entries(&self, inner: &StoreInner) -> AppResult<()> {
        save_collection(&self.data_dir.join(QA_FILE), &inner.entries)
    }

    fn save_replies(&self, inner: &StoreInner) -> AppResult<()> {
        save_collection(&self.data_dir.join(REPLIES_FILE), &inner.replies)
    }

    fn save_users(&self, inner: &StoreInner) -> AppResult<()> {
        save_collection(&self.data_dir.join(USERS_FILE), &inner.users)
    }

    // Q&A operations

    pub fn add_qa(
        &self,
        question: &str,
        answer: &str,
        category: &str,
        tags: Vec<String>,
    ) -> AppResult<QaEntry> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return Err(AppError::InvalidRequest(
                "Question and answer are required".to_string(),
            ));
        }

        let entry = QaEntry::new(
            question.to_string(),
            answer.to_string(),
            category.to_string(),
            tags,
        );

        let mut inner = self.write()?;
        inner.entries.push(entry.clone());
        self.save_entries(&inner)?;

        Ok(entry)
    }

    pub fn qa_count(&self) -> AppResult<usize> {
        Ok(self.read()?.entries.len())
    }

    /// Search entries and attach each hit's replies, viewer-relative.
    pub fn search(
        &self,
        query: &str,
        category: Option<&str>,
        viewer_id: &str,
    ) -> AppResult<Vec<QaWithReplies>> {
        let inner = self.read()?;
        let hits = search::search(&inner.entries, query, category);
        Ok(hits
            .into_iter()
            .map(|entry| attach_replies(&inner, entry, viewer_id))
            .collect())
    }

    /// All entries with replies, newest first.
    pub fn all_qa(&self, viewer_id: &str) -> AppResult<Vec<QaWithReplies>> {
        let inner = self.read()?;
        let mut entries: Vec<&QaEntry> = inner.entries.iter().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries
            .into_iter()
            .map(|entry| attach_replies(&inner, entry, viewer_id))
            .collect())
    }

    pub fn categories(&self) -> AppResult<Vec<String>> {
        let inner = self.read()?;
        let mut categories: Vec<String> = Vec::new();
        for entry in &inner.entries {
            if !categories.contains(&entry.category) {
                categories.push(entry.category.clone());
            }
        }
        categories.sort();
        Ok(categories)
    }

    /// Top search hits packaged as context for the AI answer service.
    pub fn relevant_context(&self, question: &str, category: &str) -> AppResult<Vec<QaContext>> {
        let inner = self.read()?;
        Ok(search::search(&inner.entries, question, Some(category))
            .into_iter()
            .take(3)
            .map(|entry| QaContext {
                question: entry.question.clone(),
                answer: entry.answer.clone(),
                category: entry.category.clone(),
                tags: entry.tags.clone(),
            })
            .collect())
    }

    pub fn stats(&self) -> AppResult<StatsSnapshot> {
        let inner = self.read()?;
        Ok(stats::compute_stats(
            &inner.entries,
            &inner.replies,
            &inner.users,
        ))
    }

    // Reply operations

    pub fn replies_for(&self, qa_id: &str, viewer_id: &str) -> AppResult<Vec<ReplyView>> {
        let inner = self.read()?;
        if !inner.entries.iter().any(|e| e.id == qa_id) {
            return Err(AppError::NotFound(format!("Q&A pair not found: {qa_id}")));
        }
        Ok(replies_for_entry(&inner, qa_id, viewer_id))
    }

    pub fn add_reply(
        &self,
        qa_id: &str,
        user: &AuthenticatedUser,
        content: &str,
        parent_reply_id: Option<String>,
    ) -> AppResult<Reply> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::InvalidRequest(
                "Reply content cannot be empty".to_string(),
            ));
        }

        let mut inner = self.write()?;
        let entry_idx = inner
            .entries
            .iter()
            .position(|e| e.id == qa_id)
            .ok_or_else(|| AppError::NotFound(format!("Q&A pair not found: {qa_id}")))?;

        let reply = Reply::new(
            qa_id.to_string(),
            user.id.clone(),
            user.username.clone(),
            content.to_string(),
            parent_reply_id,
        );

        inner.replies.push(reply.clone());
        inner.entries[entry_idx].reply_count += 1;
        inner.entries[entry_idx].updated_at = Utc::now().timestamp();
        self.save_replies(&inner)?;
        self.save_entries(&inner)?;

        Ok(reply)
    }

    /// Toggle the viewer's helpful vote on a reply.
    ///
    /// The vote count is derived from the voter set, so toggling twice by the
    /// same viewer restores the original count while other viewers' votes
    /// accumulate independently.
    pub fn toggle_helpful(&self, reply_id: &str, viewer_id: &str) -> AppResult<Reply> {
        let mut inner = self.write()?;
        let reply = inner
            .replies
            .iter_mut()
            .find(|r| r.id == reply_id && !r.is_deleted)
            .ok_or_else(|| AppError::NotFound(format!("Reply not found: {reply_id}")))?;

        match reply.helpful_voters.iter().position(|v| v == viewer_id) {
            Some(idx) => {
                reply.helpful_voters.remove(idx);
            }
            None => reply.helpful_voters.push(viewer_id.to_string()),
        }
        reply.updated_at = Utc::now().timestamp();
        let updated = reply.clone();

        self.save_replies(&inner)?;
        Ok(updated)
    }

    pub fn update_reply(
        &self,
        reply_id: &str,
        author_id: &str,
        content: &str,
    ) -> AppResult<Reply> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::InvalidRequest(
                "Reply content cannot be empty".to_string(),
            ));
        }

        let mut inner = self.write()?;
        let reply = inner
            .replies
            .iter_mut()
            .find(|r| r.id == reply_id && !r.is_deleted)
            .ok_or_else(|| AppError::NotFound(format!("Reply not found: {reply_id}")))?;

        if reply.user_id != author_id {
            return Err(AppError::Forbidden(
                "You can only edit your own replies".to_string(),
            ));
        }

        reply.content = content.to_string();
        reply.updated_at = Utc::now().timestamp();
        let updated = reply.clone();

        self.save_replies(&inner)?;
        Ok(updated)
    }

    /// Soft-delete a reply and release its slot in the parent's reply count.
    pub fn delete_reply(&self, reply_id: &str, author_id: &str) -> AppResult<()> {
        let mut inner = self.write()?;
        let reply = inner
            .replies
            .iter_mut()
            .find(|r| r.id == reply_id && !r.is_deleted)
            .ok_or_else(|| AppError::NotFound(format!("Reply not found: {reply_id}")))?;

        if reply.user_id != author_id {
            return Err(AppError::Forbidden(
                "You can only delete your own replies".to_string(),
            ));
        }

        reply.is_deleted = true;
        reply.updated_at = Utc::now().timestamp();
        let qa_id = reply.qa_id.clone();

        if let Some(entry) = inner.entries.iter_mut().find(|e| e.id == qa_id) {
            entry.reply_count = entry.reply_count.saturating_sub(1);
        }

        self.save_replies(&inner)?;
        self.save_entries(&inner)?;
        Ok(())
    }

    // User operations

    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: String,
    ) -> AppResult<User> {
        let username = username.trim();
        let email = email.trim();

        if username.len() < 3 {
            return Err(AppError::InvalidRequest(
                "Username must be at least 3 characters".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(AppError::InvalidRequest("Invalid email format".to_string()));
        }

        let mut inner = self.write()?;
        for user in &inner.users {
            if user.username.eq_ignore_ascii_case(username) {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
            if user.email.eq_ignore_ascii_case(email) {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let user = User::new(username.to_string(), email.to_string(), password_hash);
        inner.users.push(user.clone());
        self.save_users(&inner)?;

        Ok(user)
    }

    /// Authenticate by username or email and record the login time.
    pub fn authenticate(&self, username_or_email: &str, password: &str) -> AppResult<User> {
        let mut inner = self.write()?;
        let user = inner
            .users
            .iter_mut()
            .find(|u| {
                u.is_active
                    && (u.username.eq_ignore_ascii_case(username_or_email)
                        || u.email.eq_ignore_ascii_case(username_or_email))
            })
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !crate::auth::verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        user.last_login_at = Some(Utc::now().timestamp());
        let authenticated = user.clone();

        self.save_users(&inner)?;
        Ok(authenticated)
    }

    pub fn find_user(&self, user_id: &str) -> AppResult<User> {
        let inner = self.read()?;
        inner
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User not found: {user_id}")))
    }
}

fn replies_for_entry(inner: &StoreInner, qa_id: &str, viewer_id: &str) -> Vec<ReplyView> {
    let mut replies: Vec<&Reply> = inner
        .replies
        .iter()
        .filter(|r| r.qa_id == qa_id && !r.is_deleted)
        .collect();
    replies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    replies.into_iter().map(|r| r.view(viewer_id)).collect()
}

fn attach_replies(inner: &StoreInner, entry: &QaEntry, viewer_id: &str) -> QaWithReplies {
    QaWithReplies {
        entry: entry.clone(),
        replies: replies_for_entry(inner, &entry.id, viewer_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (Store, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (store, dir)
    }

    fn alice() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "user-alice".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    fn add_python_entry(store: &Store) -> QaEntry {
        store
            .add_qa(
                "What is Python?",
                "A language",
                "programming",
                vec!["python".to_string(), "language".to_string()],
            )
            .unwrap()
    }

    #[test]
    fn test_search_scenario() {
        let (store, _dir) = test_store();
        let entry = add_python_entry(&store);

        let results = store.search("python", None, "viewer").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.id, entry.id);

        assert!(store.search("java", None, "viewer").unwrap().is_empty());
        assert!(store.search("", None, "viewer").unwrap().is_empty());
    }

    #[test]
    fn test_add_qa_rejects_empty_fields() {
        let (store, _dir) = test_store();

        assert!(matches!(
            store.add_qa("", "answer", "general", vec![]),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            store.add_qa("question", "   ", "general", vec![]),
            Err(AppError::InvalidRequest(_))
        ));
        assert_eq!(store.qa_count().unwrap(), 0);
    }

    #[test]
    fn test_add_reply_updates_reply_count_and_stats() {
        let (store, _dir) = test_store();
        let entry = add_python_entry(&store);

        let before = store.stats().unwrap();
        let reply = store
            .add_reply(&entry.id, &alice(), "Great question", None)
            .unwrap();
        let after = store.stats().unwrap();

        assert_eq!(reply.helpful_votes(), 0);
        assert_eq!(
            after.reply_stats.total_replies,
            before.reply_stats.total_replies + 1
        );

        let results = store.search("python", None, "viewer").unwrap();
        assert_eq!(results[0].entry.reply_count, 1);
        assert_eq!(results[0].replies.len(), 1);
    }

    #[test]
    fn test_add_reply_unknown_qa_leaves_store_unchanged() {
        let (store, _dir) = test_store();
        add_python_entry(&store);

        let result = store.add_reply("missing-id", &alice(), "hello", None);
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let stats = store.stats().unwrap();
        assert_eq!(stats.reply_stats.total_replies, 0);
        let results = store.search("python", None, "viewer").unwrap();
        assert_eq!(results[0].entry.reply_count, 0);
    }

    #[test]
    fn test_toggle_helpful_is_an_idempotent_pair() {
        let (store, _dir) = test_store();
        let entry = add_python_entry(&store);
        let reply = store
            .add_reply(&entry.id, &alice(), "Great question", None)
            .unwrap();

        let toggled = store.toggle_helpful(&reply.id, "user-bob").unwrap();
        assert_eq!(toggled.helpful_votes(), 1);
        assert!(toggled.is_helpful_for("user-bob"));

        let toggled = store.toggle_helpful(&reply.id, "user-bob").unwrap();
        assert_eq!(toggled.helpful_votes(), 0);
        assert!(!toggled.is_helpful_for("user-bob"));
    }

    #[test]
    fn test_toggle_helpful_tracks_viewers_independently() {
        let (store, _dir) = test_store();
        let entry = add_python_entry(&store);
        let reply = store
            .add_reply(&entry.id, &alice(), "Great question", None)
            .unwrap();

        store.toggle_helpful(&reply.id, "user-bob").unwrap();
        let toggled = store.toggle_helpful(&reply.id, "user-carol").unwrap();
        assert_eq!(toggled.helpful_votes(), 2);

        // Bob withdrawing his vote does not affect Carol's
        let toggled = store.toggle_helpful(&reply.id, "user-bob").unwrap();
        assert_eq!(toggled.helpful_votes(), 1);
        assert!(toggled.is_helpful_for("user-carol"));

        assert!(matches!(
            store.toggle_helpful("missing-reply", "user-bob"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_reply_edits_are_author_only() {
        let (store, _dir) = test_store();
        let entry = add_python_entry(&store);
        let reply = store
            .add_reply(&entry.id, &alice(), "original", None)
            .unwrap();

        assert!(matches!(
            store.update_reply(&reply.id, "user-bob", "hijacked"),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            store.delete_reply(&reply.id, "user-bob"),
            Err(AppError::Forbidden(_))
        ));

        let updated = store
            .update_reply(&reply.id, "user-alice", "edited")
            .unwrap();
        assert_eq!(updated.content, "edited");
    }

    #[test]
    fn test_delete_reply_soft_deletes_and_releases_count() {
        let (store, _dir) = test_store();
        let entry = add_python_entry(&store);
        let reply = store
            .add_reply(&entry.id, &alice(), "to be removed", None)
            .unwrap();

        store.delete_reply(&reply.id, "user-alice").unwrap();

        let replies = store.replies_for(&entry.id, "viewer").unwrap();
        assert!(replies.is_empty());
        let results = store.search("python", None, "viewer").unwrap();
        assert_eq!(results[0].entry.reply_count, 0);

        // A second delete sees the reply as gone
        assert!(matches!(
            store.delete_reply(&reply.id, "user-alice"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_replies_for_unknown_qa_is_not_found() {
        let (store, _dir) = test_store();
        assert!(matches!(
            store.replies_for("missing", "viewer"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_user_registration_rules() {
        let (store, _dir) = test_store();

        let user = store
            .create_user("alice", "alice@example.com", "hash".to_string())
            .unwrap();
        assert!(user.is_active);

        assert!(matches!(
            store.create_user("Alice", "other@example.com", "hash".to_string()),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            store.create_user("bob", "ALICE@example.com", "hash".to_string()),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            store.create_user("ab", "ab@example.com", "hash".to_string()),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            store.create_user("carol", "not-an-email", "hash".to_string()),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_authenticate_by_username_or_email() {
        let (store, _dir) = test_store();
        let hash = crate::auth::hash_password("secret123").unwrap();
        store
            .create_user("alice", "alice@example.com", hash)
            .unwrap();

        let by_name = store.authenticate("alice", "secret123").unwrap();
        assert!(by_name.last_login_at.is_some());

        let by_email = store.authenticate("alice@example.com", "secret123").unwrap();
        assert_eq!(by_email.username, "alice");

        assert!(matches!(
            store.authenticate("alice", "wrong"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            store.authenticate("nobody", "secret123"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_store_reloads_from_disk() {
        let dir = TempDir::new().unwrap();
        let (entry_id, reply_id) = {
            let store = Store::open(dir.path()).unwrap();
            let entry = store
                .add_qa("Persistent?", "Yes", "general", vec!["disk".to_string()])
                .unwrap();
            let reply = store
                .add_reply(&entry.id, &alice(), "confirmed", None)
                .unwrap();
            store.toggle_helpful(&reply.id, "user-bob").unwrap();
            (entry.id, reply.id)
        };

        let reopened = Store::open(dir.path()).unwrap();
        let results = reopened.search("persistent", None, "user-bob").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.id, entry_id);
        assert_eq!(results[0].entry.reply_count, 1);

        let replies = reopened.replies_for(&entry_id, "user-bob").unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id, reply_id);
        assert_eq!(replies[0].helpful_votes, 1);
        assert!(replies[0].is_helpful);
    }
}
