//! A generic, thread-safe, in-memory key-value cache with per-entry
//! expiration, optional sliding renewal on access, bounded capacity with
//! use-aware eviction, and an optional cooperative background reaper.
//!
//! ```
//! use reaper_cache::{Cache, CacheConfig};
//! use std::time::Duration;
//!
//! let cache: Cache<String, i32> = Cache::new(
//!     CacheConfig::builder()
//!         .capacity(100)
//!         .expiration_window(Duration::from_secs(60))
//!         .build(),
//! );
//! cache.put("answer".to_string(), 42).unwrap();
//! assert_eq!(cache.get(&"answer".to_string()).unwrap(), 42);
//! ```
//!
//! # Eviction
//!
//! When `put` must make room, the entry minimizing `(expires_on,
//! last_used_on, uses)` is evicted: the soonest-to-expire entry, ties
//! broken by least-recently-used, then least-frequently-used. This is
//! deliberately not strict LRU; it converges to TTL-aware eviction under hot
//! workloads. See [`mod@policy`].
//!
//! # The reaper
//!
//! A cache constructed with a non-zero `polling_interval` lazily spawns a
//! background thread on its first insertion. The thread wakes every
//! `polling_interval`, sweeps expired entries, and quietly terminates once
//! the map empties out; the next insertion that crosses empty-to-non-empty
//! re-arms it. See [`mod@reaper`] for the cancellation design.
//!
//! This crate does no internal logging: like every store in the crate it is
//! modeled on, it is a bare data structure, and instrumentation is left to
//! the caller.

mod cache;
mod config;
mod entry;
mod error;
mod key;
mod policy;
mod reaper;

pub use cache::{Cache, DefaultHasher};
pub use config::{CacheConfig, CacheConfigBuilder};
pub use error::CacheError;
pub use key::CaseInsensitiveKey;

#[cfg(test)]
mod lib_tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn sliding_ttl_hit_scenario() {
        // Sliding expiration keeps an accessed entry alive past its
        // original window, but a gap longer than the window still expires it.
        let cache: Cache<String, i32> = Cache::new(
            CacheConfig::builder()
                .expiration_window(Duration::from_millis(10))
                .use_sliding_expiration(true)
                .polling_interval(Duration::ZERO)
                .build(),
        );
        cache.put("one".to_string(), 1).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"one".to_string()).unwrap(), 1);
        std::thread::sleep(Duration::from_millis(7));
        assert_eq!(cache.get(&"one".to_string()).unwrap(), 1);
        std::thread::sleep(Duration::from_millis(11));
        assert_eq!(
            cache.get(&"one".to_string()),
            Err(CacheError::NotFound)
        );
    }
}
