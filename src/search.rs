//! Keyword search over the in-memory Q&A collection.
//!
//! Matching is a case-insensitive substring check against the question, the
//! answer, and each tag. Results are ranked in two tiers: entries whose
//! question matches come before entries that only match on answer or tags,
//! and insertion order is preserved within a tier.

use crate::models::QaEntry;

/// Search the given entries for `query`, optionally restricted to a category.
///
/// An empty (or whitespace-only) query yields an empty result; callers are
/// expected to reject empty queries at the request boundary. The category
/// filter is an exact, case-sensitive comparison.
pub fn search<'a>(
    entries: &'a [QaEntry],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a QaEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut question_matches: Vec<&QaEntry> = Vec::new();
    let mut body_matches: Vec<&QaEntry> = Vec::new();

    for entry in entries {
        if let Some(category) = category {
            if entry.category != category {
                continue;
            }
        }

        if entry.question.to_lowercase().contains(&query) {
            question_matches.push(entry);
        } else if entry.answer.to_lowercase().contains(&query)
            || entry.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
        {
            body_matches.push(entry);
        }
    }

    question_matches.extend(body_matches);
    question_matches
}
