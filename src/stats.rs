//! Aggregate statistics over the knowledge base.
//!
//! All aggregation is a pure function of the current collections and is
//! recomputed on every call; there is no incremental caching.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::TOKEN_TTL_SECS;
use crate::models::{QaEntry, Reply, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_qa: usize,
    pub categories: Vec<String>,
    pub category_counts: BTreeMap<String, usize>,
    pub top_tags: Vec<(String, usize)>,
    pub reply_stats: ReplyStats,
    pub user_stats: UserStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyStats {
    pub total_replies: usize,
    pub helpful_replies: usize,
    pub top_contributors: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total_users: usize,
    pub active_users: usize,
    pub active_sessions: usize,
}

const TOP_TAGS_LIMIT: usize = 10;
const TOP_CONTRIBUTORS_LIMIT: usize = 5;

pub fn compute_stats(entries: &[QaEntry], replies: &[Reply], users: &[User]) -> StatsSnapshot {
    let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
    // Tag counts in first-seen order so that ties keep that order after the
    // stable sort below.
    let mut tag_counts: Vec<(String, usize)> = Vec::new();

    for entry in entries {
        *category_counts.entry(entry.category.clone()).or_insert(0) += 1;

        for tag in &entry.tags {
            match tag_counts.iter_mut().find(|(t, _)| t == tag) {
                Some((_, count)) => *count += 1,
                None => tag_counts.push((tag.clone(), 1)),
            }
        }
    }

    tag_counts.sort_by(|a, b| b.1.cmp(&a.1));
    tag_counts.truncate(TOP_TAGS_LIMIT);

    let categories: Vec<String> = category_counts.keys().cloned().collect();

    StatsSnapshot {
        total_qa: entries.len(),
        categories,
        category_counts,
        top_tags: tag_counts,
        reply_stats: compute_reply_stats(replies),
        user_stats: compute_user_stats(users),
    }
}

fn compute_reply_stats(replies: &[Reply]) -> ReplyStats {
    let live: Vec<&Reply> = replies.iter().filter(|r| !r.is_deleted).collect();

    let helpful_replies = live.iter().filter(|r| r.helpful_votes() > 0).count();

    let mut contributor_counts: Vec<(String, usize)> = Vec::new();
    for reply in &live {
        match contributor_counts.iter_mut().find(|(u, _)| *u == reply.username) {
            Some((_, count)) => *count += 1,
            None => contributor_counts.push((reply.username.clone(), 1)),
        }
    }
    contributor_counts.sort_by(|a, b| b.1.cmp(&a.1));
    contributor_counts.truncate(TOP_CONTRIBUTORS_LIMIT);

    ReplyStats {
        total_replies: live.len(),
        helpful_replies,
        top_contributors: contributor_counts,
    }
}

fn compute_user_stats(users: &[User]) -> UserStats {
    let now = Utc::now().timestamp();

    // Without a server-side session table, a user with a login inside the
    // token lifetime may still hold a valid token.
    let active_sessions = users
        .iter()
        .filter(|u| {
            u.last_login_at
                .map(|t| now - t < TOKEN_TTL_SECS)
                .unwrap_or(false)
        })
        .count();

    UserStats {
        total_users: users.len(),
        active_users: users.iter().filter(|u| u.is_active).count(),
        active_sessions,
    }
}
