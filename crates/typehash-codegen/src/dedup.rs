//! Getter deduplication.

use std::collections::HashSet;

use crate::getter::GetterKey;

/// Reduce getter requests to distinct keys, in first-seen order.
pub fn dedup_getters(requests: Vec<GetterKey>) -> Vec<GetterKey> {
    let mut seen = HashSet::with_capacity(requests.len());
    requests
        .into_iter()
        .filter(|key| seen.insert(key.clone()))
        .collect()
}
