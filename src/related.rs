use std::collections::HashSet;

use crate::data_models::ContentItem;

/// Weight of a shared category. Outranks any single shared tag.
pub const CATEGORY_MATCH_WEIGHT: u32 = 2;

pub const DEFAULT_RELATED_LIMIT: usize = 3;

pub fn relevance_score<T: ContentItem>(focal: &T, candidate: &T) -> u32 {
    let category = if candidate.category() == focal.category() {
        CATEGORY_MATCH_WEIGHT
    } else {
        0
    };

    let focal_tags: HashSet<&str> = focal.tags().iter().map(String::as_str).collect();
    let candidate_tags: HashSet<&str> = candidate.tags().iter().map(String::as_str).collect();
    let shared = focal_tags.intersection(&candidate_tags).count() as u32;

    category + shared
}

/// Returns up to `limit` items most related to `focal`, best first.
///
/// Items sharing the focal id are skipped; if the focal item is not part of
/// `candidates` nothing is skipped. Equal scores keep their input order.
pub fn rank_related<'a, T: ContentItem>(focal: &T, candidates: &'a [T], limit: usize) -> Vec<&'a T> {
    let mut scored: Vec<(u32, &'a T)> = candidates
        .iter()
        .filter(|c| c.id() != focal.id())
        .map(|c| (relevance_score(focal, c), c))
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored.into_iter().take(limit).map(|(_, c)| c).collect()
}
