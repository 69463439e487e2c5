//! Topic rotation.
//!
//! Picks the next topic to write about from the catalog and the used-topic
//! history:
//!
//! 1. Topics whose title appears in the history are out.
//! 2. If nothing is left, the whole catalog is back in play (full replay).
//! 3. With more than [`RECENT_WINDOW`] candidates, candidates sharing a
//!    category with one of the last [`RECENT_WINDOW`] picks are dropped,
//!    unless that would drop all of them.
//! 4. The pick is uniform over what remains.
//!
//! Selection has no side effects. The caller records the topic only after
//! its article was generated and saved, so a failed generation leaves the
//! topic available.

use crate::types::{TopicDescriptor, UsedTopicRecord};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::info;

/// How many recent picks feed the category-diversity filter.
pub const RECENT_WINDOW: usize = 5;

/// Catalog entries whose titles are not in the history, in catalog order.
pub fn unused_topics<'a>(
    catalog: &'a [TopicDescriptor],
    history: &[UsedTopicRecord],
) -> Vec<&'a TopicDescriptor> {
    let used: HashSet<&str> = history.iter().map(|u| u.title.as_str()).collect();
    catalog
        .iter()
        .filter(|t| !used.contains(t.title.as_str()))
        .collect()
}

/// Categories of the most recent picks, newest first.
///
/// Titles no longer in the catalog contribute nothing.
pub fn recent_categories<'a>(
    catalog: &'a [TopicDescriptor],
    history: &[UsedTopicRecord],
) -> Vec<&'a str> {
    history
        .iter()
        .rev()
        .take(RECENT_WINDOW)
        .filter_map(|used| catalog.iter().find(|t| t.title == used.title))
        .map(|t| t.category.as_str())
        .collect()
}

/// Pick the next topic. Returns `None` only for an empty catalog.
pub fn pick_next<'a, R: Rng + ?Sized>(
    catalog: &'a [TopicDescriptor],
    history: &[UsedTopicRecord],
    rng: &mut R,
) -> Option<&'a TopicDescriptor> {
    let mut available = unused_topics(catalog, history);
    if available.is_empty() {
        info!("All {} topics used, starting over", catalog.len());
        available = catalog.iter().collect();
    }

    if available.len() > RECENT_WINDOW {
        let recent = recent_categories(catalog, history);
        let preferred: Vec<&TopicDescriptor> = available
            .iter()
            .copied()
            .filter(|t| !recent.contains(&t.category.as_str()))
            .collect();
        if !preferred.is_empty() {
            available = preferred;
        }
    }

    available.choose(rng).copied()
}
