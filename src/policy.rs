//! Eviction and expiration math.
//!
//! The victim search is a plain linear scan rather than a secondary priority
//! queue: the sort key (`expires_on`, `last_used_on`, `uses`) mutates on
//! every read, so keeping an index in sync would cost more than the
//! occasional O(n) scan eviction actually needs (capacity is bounded and
//! eviction is not hot-path).

use crate::entry::Entry;
use std::hash::{BuildHasher, Hash};
use std::time::Instant;

/// Selects the single entry to evict when capacity must be reclaimed.
///
/// Minimizes `(expires_on, last_used_on, uses)` lexicographically: the
/// soonest-to-expire entry wins, ties broken by least-recently-used, further
/// ties by least-frequently-used. Returns `None` for an empty map.
pub(crate) fn select_victim<K, V, S>(
    map: &std::collections::HashMap<K, Entry<V>, S>,
) -> Option<K>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    map.iter()
        .min_by(|(_, a), (_, b)| {
            a.expires_on
                .cmp(&b.expires_on)
                .then(a.last_used_on.cmp(&b.last_used_on))
                .then(a.uses.cmp(&b.uses))
        })
        .map(|(k, _)| k.clone())
}

/// Collects the keys of every entry that has expired as of `now`.
///
/// Used by both the reaper's sweep and `clear_expired`.
pub(crate) fn expired_keys<K, V, S>(
    map: &std::collections::HashMap<K, Entry<V>, S>,
    now: Instant,
) -> Vec<K>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    map.iter()
        .filter(|(_, entry)| entry.is_expired(now))
        .map(|(k, _)| k.clone())
        .collect()
}
