use crate::config::CacheConfig;
use crate::entry::Entry;
use crate::error::CacheError;
use crate::policy::{expired_keys, select_victim};
use crate::reaper;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The hasher a [`Cache`] uses when none is given explicitly. With the
/// `ahash` feature (on by default) this is `ahash::RandomState`; otherwise
/// it falls back to the standard library's `RandomState`.
#[cfg(feature = "ahash")]
pub type DefaultHasher = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
pub type DefaultHasher = std::collections::hash_map::RandomState;

/// State shared by every clone of a [`Cache`] handle and by its reaper
/// thread. Guarded by a single coarse `parking_lot::Mutex` around the
/// entire facade.
pub(crate) struct CacheInner<K, V, S> {
    pub(crate) map: HashMap<K, Entry<V>, S>,
    pub(crate) capacity: usize,
    pub(crate) expiration_window: Duration,
    pub(crate) use_sliding_expiration: bool,
    pub(crate) polling_interval: Duration,
    pub(crate) polling_suppressed: bool,
    pub(crate) disposed: bool,
    pub(crate) reaper_generation: u64,
    pub(crate) reaper_armed: bool,
}

/// A thread-safe, in-memory key-value cache with per-entry expiration,
/// optional sliding renewal, bounded capacity with use-aware eviction, and
/// an optional cooperative background reaper.
///
/// `Cache` is a cheap-to-clone handle: every clone shares the same
/// underlying map, config, and reaper, exactly like cloning an `Arc`. There
/// is no automatic cleanup on drop; call [`Cache::dispose`] when you are
/// done with a cache to cancel its reaper and release the map, since until
/// then an armed reaper thread keeps the shared state alive.
pub struct Cache<K, V, S = DefaultHasher> {
    inner: Arc<Mutex<CacheInner<K, V, S>>>,
    condvar: Arc<Condvar>,
}

impl<K, V, S> Clone for Cache<K, V, S> {
    fn clone(&self) -> Self {
        Cache {
            inner: Arc::clone(&self.inner),
            condvar: Arc::clone(&self.condvar),
        }
    }
}

impl<K, V> Cache<K, V, DefaultHasher>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Builds a cache with the default hasher (see [`DefaultHasher`]).
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self::with_hasher(config, DefaultHasher::default())
    }
}

impl<K, V, S> Cache<K, V, S>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    S: BuildHasher + Send + Sync + 'static,
{
    /// Builds a cache with a custom comparer/hasher, e.g.
    /// [`crate::key::CaseInsensitiveKey`]'s `BuildHasher` or the `ahash`
    /// feature's `ahash::RandomState`.
    #[must_use]
    pub fn with_hasher(config: CacheConfig, hasher: S) -> Self {
        let inner = CacheInner {
            map: HashMap::with_hasher(hasher),
            capacity: config.capacity(),
            expiration_window: config.expiration_window(),
            use_sliding_expiration: config.use_sliding_expiration(),
            polling_interval: config.polling_interval(),
            polling_suppressed: false,
            disposed: false,
            reaper_generation: 0,
            reaper_armed: false,
        };
        Cache {
            inner: Arc::new(Mutex::new(inner)),
            condvar: Arc::new(Condvar::new()),
        }
    }

    fn checked_lock(&self) -> Result<parking_lot::MutexGuard<'_, CacheInner<K, V, S>>, CacheError> {
        let guard = self.inner.lock();
        if guard.disposed {
            return Err(CacheError::UsedAfterDisposal);
        }
        Ok(guard)
    }

    /// Inserts or overwrites `key`: on overwrite, bumps `uses` and
    /// `last_used_on` and unconditionally resets `expires_on` to a fresh
    /// window; on fresh insert, evicts a victim first if at capacity, then
    /// arms the reaper if this insert took the map from empty to non-empty.
    pub fn put(&self, key: K, value: V) -> Result<(), CacheError> {
        let mut inner = self.checked_lock()?;
        let now = Instant::now();
        let window = inner.expiration_window;

        if let Some(entry) = inner.map.get_mut(&key) {
            entry.touch_write(value, now, window);
            return Ok(());
        }

        if inner.map.len() >= inner.capacity {
            if let Some(victim) = select_victim(&inner.map) {
                inner.map.remove(&victim);
            }
        }

        let was_empty = inner.map.is_empty();
        inner.map.insert(key, Entry::new(value, now, window));

        if was_empty {
            reaper::maybe_arm(&mut inner, &self.inner, &self.condvar);
        }
        Ok(())
    }

    /// Looks up `key`. Fails `NotFound` if absent or expired; an expired
    /// entry observed this way is removed as a side effect.
    pub fn get(&self, key: &K) -> Result<V, CacheError> {
        let mut inner = self.checked_lock()?;
        let now = Instant::now();

        let expired = match inner.map.get(key) {
            None => return Err(CacheError::NotFound),
            Some(entry) => entry.is_expired(now),
        };
        if expired {
            inner.map.remove(key);
            return Err(CacheError::NotFound);
        }

        let sliding = inner.use_sliding_expiration;
        let window = inner.expiration_window;
        let entry = inner.map.get_mut(key).expect("checked present above");
        entry.touch_read(now, window, sliding);
        Ok(entry.value.clone())
    }

    /// Like [`Cache::get`], but returns `Ok(None)` instead of `NotFound` for
    /// an absent or expired key.
    pub fn try_get(&self, key: &K) -> Result<Option<V>, CacheError> {
        match self.get(key) {
            Ok(v) => Ok(Some(v)),
            Err(CacheError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Removes `key` unconditionally. Returns whether an entry was present.
    pub fn remove(&self, key: &K) -> Result<bool, CacheError> {
        let mut inner = self.checked_lock()?;
        let removed = inner.map.remove(key).is_some();
        if removed && inner.map.is_empty() {
            reaper::cancel(&mut inner, &self.condvar);
        }
        Ok(removed)
    }

    /// Removes `key` only if its current value equals `value`.
    pub fn remove_pair(&self, key: &K, value: &V) -> Result<bool, CacheError>
    where
        V: PartialEq,
    {
        let mut inner = self.checked_lock()?;
        let matches = inner.map.get(key).is_some_and(|e| &e.value == value);
        if !matches {
            return Ok(false);
        }
        inner.map.remove(key);
        if inner.map.is_empty() {
            reaper::cancel(&mut inner, &self.condvar);
        }
        Ok(true)
    }

    /// Whether `key` maps to a live (unexpired) entry. Does not remove an
    /// expired entry as a side effect (unlike `get`); this is a pure
    /// membership probe.
    pub fn contains_key(&self, key: &K) -> Result<bool, CacheError> {
        let inner = self.checked_lock()?;
        let now = Instant::now();
        Ok(inner.map.get(key).is_some_and(|e| !e.is_expired(now)))
    }

    /// Whether any live entry currently holds `value`. Linear scan.
    pub fn contains_value(&self, value: &V) -> Result<bool, CacheError>
    where
        V: PartialEq,
    {
        let inner = self.checked_lock()?;
        let now = Instant::now();
        Ok(inner
            .map
            .values()
            .any(|e| !e.is_expired(now) && &e.value == value))
    }

    /// Cancels the reaper and empties the map.
    pub fn clear(&self) -> Result<(), CacheError> {
        let mut inner = self.checked_lock()?;
        inner.map.clear();
        reaper::cancel(&mut inner, &self.condvar);
        Ok(())
    }

    /// Removes every currently-expired entry in a single pass. Returns the
    /// number of entries removed.
    pub fn clear_expired(&self) -> Result<usize, CacheError> {
        let mut inner = self.checked_lock()?;
        let now = Instant::now();
        let victims = expired_keys(&inner.map, now);
        let mut removed = 0;
        for key in victims {
            if inner.map.get(&key).is_some_and(|e| e.is_expired(now)) {
                inner.map.remove(&key);
                removed += 1;
            }
        }
        if removed > 0 && inner.map.is_empty() {
            reaper::cancel(&mut inner, &self.condvar);
        }
        Ok(removed)
    }

    /// Resets every entry's `expires_on` to `now + expiration_window`,
    /// including entries that had already expired. Does not change whether
    /// the reaper was running.
    pub fn revive(&self) -> Result<(), CacheError> {
        let mut inner = self.checked_lock()?;
        let now = Instant::now();
        let window = inner.expiration_window;
        for entry in inner.map.values_mut() {
            entry.revive(now, window);
        }
        Ok(())
    }

    /// Clears `polling_suppressed` and re-arms the reaper if the map is
    /// non-empty and `polling_interval > 0`.
    pub fn start_polling(&self) -> Result<(), CacheError> {
        let mut inner = self.checked_lock()?;
        inner.polling_suppressed = false;
        reaper::rearm_if_due(&mut inner, &self.inner, &self.condvar);
        Ok(())
    }

    /// Sets `polling_suppressed` and cancels any outstanding reaper.
    pub fn stop_polling(&self) -> Result<(), CacheError> {
        let mut inner = self.checked_lock()?;
        inner.polling_suppressed = true;
        reaper::cancel(&mut inner, &self.condvar);
        Ok(())
    }

    /// `true` when a reaper is armed, the map is non-empty, polling is not
    /// suppressed, and the cache is not disposed.
    ///
    /// Unlike most other operations this never fails: it is a read-only
    /// property query whose answer after disposal is unambiguous (`false`).
    #[must_use]
    pub fn is_polling(&self) -> bool {
        let inner = self.inner.lock();
        !inner.disposed && inner.reaper_armed && !inner.map.is_empty() && !inner.polling_suppressed
    }

    /// `true` once [`Cache::dispose`] has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.lock().disposed
    }

    /// Cancels the reaper, clears the map, and marks the cache terminally
    /// disposed. Idempotent.
    pub fn dispose(&self) {
        let mut inner = self.inner.lock();
        if inner.disposed {
            return;
        }
        inner.map.clear();
        reaper::cancel(&mut inner, &self.condvar);
        inner.disposed = true;
    }

    /// Current physical entry count, including not-yet-reaped expired
    /// entries.
    pub fn count(&self) -> Result<usize, CacheError> {
        Ok(self.checked_lock()?.map.len())
    }

    /// Snapshot of every `(key, value)` pair, live or not-yet-reaped.
    /// Matches `enumerate`'s semantics: a finite snapshot taken at call
    /// time, not a live view.
    pub fn enumerate(&self) -> Result<std::vec::IntoIter<(K, V)>, CacheError> {
        let inner = self.checked_lock()?;
        let snapshot: Vec<(K, V)> = inner
            .map
            .iter()
            .map(|(k, e)| (k.clone(), e.value.clone()))
            .collect();
        Ok(snapshot.into_iter())
    }

    /// Snapshot of every key currently present.
    pub fn keys(&self) -> Result<Vec<K>, CacheError> {
        let inner = self.checked_lock()?;
        Ok(inner.map.keys().cloned().collect())
    }

    /// Snapshot of every value currently present.
    pub fn values(&self) -> Result<Vec<V>, CacheError> {
        let inner = self.checked_lock()?;
        Ok(inner.map.values().map(|e| e.value.clone()).collect())
    }

    /// Copies a snapshot of `(key, value)` pairs into `dest` starting at
    /// `offset`. Fails `CapacityInsufficient` if `dest` does not have
    /// enough room after `offset` for every entry. Returns the number of
    /// pairs copied.
    ///
    /// Rust's `&mut [T]` can neither be null nor carry a negative length, so
    /// those preconditions are enforced by the type system rather than at
    /// runtime; an out-of-range `offset` is still reported explicitly.
    pub fn copy_to(&self, dest: &mut [(K, V)], offset: usize) -> Result<usize, CacheError> {
        let inner = self.checked_lock()?;
        if offset > dest.len() {
            return Err(CacheError::ArgumentInvalid(
                "offset exceeds destination length",
            ));
        }
        let available = dest.len() - offset;
        let snapshot: Vec<(K, V)> = inner
            .map
            .iter()
            .map(|(k, e)| (k.clone(), e.value.clone()))
            .collect();
        if snapshot.len() > available {
            return Err(CacheError::CapacityInsufficient {
                needed: snapshot.len(),
                available,
            });
        }
        let count = snapshot.len();
        for (slot, pair) in dest[offset..offset + count].iter_mut().zip(snapshot) {
            *slot = pair;
        }
        Ok(count)
    }

    /// Sets the per-entry TTL. Future writes (and future reads of entries
    /// that have not yet expired, through sliding) observe the new window;
    /// in-flight entries keep the `expires_on` they already had. Returns
    /// the previous value.
    pub fn set_expiration_window(&self, window: Duration) -> Result<Duration, CacheError> {
        let mut inner = self.checked_lock()?;
        let previous = inner.expiration_window;
        inner.expiration_window = crate::config::clamp_expiration_window(window);
        Ok(previous)
    }

    /// Sets the maximum entry count. Returns the previous value.
    pub fn set_capacity(&self, capacity: usize) -> Result<usize, CacheError> {
        let mut inner = self.checked_lock()?;
        let previous = inner.capacity;
        inner.capacity = crate::config::clamp_capacity(capacity);
        Ok(previous)
    }

    /// Sets whether a successful read extends `expires_on`. Returns the
    /// previous value.
    pub fn set_use_sliding_expiration(&self, sliding: bool) -> Result<bool, CacheError> {
        let mut inner = self.checked_lock()?;
        let previous = inner.use_sliding_expiration;
        inner.use_sliding_expiration = sliding;
        Ok(previous)
    }

    /// Sets the reaper tick. `Duration::ZERO` disarms the reaper; a positive
    /// value while the map is non-empty and polling is not suppressed
    /// cancels any outstanding reaper generation and arms a fresh one.
    /// Returns the previous interval.
    pub fn set_polling_interval(&self, interval: Duration) -> Result<Duration, CacheError> {
        let mut inner = self.checked_lock()?;
        let previous = inner.polling_interval;
        inner.polling_interval = interval;
        reaper::cancel(&mut inner, &self.condvar);
        if !interval.is_zero() {
            inner.polling_suppressed = false;
            reaper::rearm_if_due(&mut inner, &self.inner, &self.condvar);
        }
        Ok(previous)
    }
}
