//! The cooperative background reaper.
//!
//! A periodic sweeper over the shared lock-protected map, using a
//! generation counter plus a `parking_lot::Condvar` wait instead of an
//! uninterruptible `thread::sleep`, so cancellation is observed immediately
//! rather than at the end of the current tick.

use crate::cache::CacheInner;
use crate::policy::expired_keys;
use parking_lot::{Condvar, Mutex};
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::time::Instant;

/// Spawns the reaper thread for the generation recorded in `inner` at call
/// time. The caller must hold `inner`'s lock and have already set
/// `reaper_armed = true` and bumped `reaper_generation`.
pub(crate) fn spawn<K, V, S>(mutex: Arc<Mutex<CacheInner<K, V, S>>>, condvar: Arc<Condvar>, generation: u64)
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: BuildHasher + Send + Sync + 'static,
{
    std::thread::spawn(move || run(mutex, condvar, generation));
}

/// The reaper's main loop: tick, sweep, repeat until cancelled or the map
/// empties itself out.
///
/// States: `Armed` while parked on the wait, `Sweeping` while the sweep
/// below runs, `Cancelling`/`Terminated` the moment `generation` no longer
/// matches what this thread was spawned with.
fn run<K, V, S>(mutex: Arc<Mutex<CacheInner<K, V, S>>>, condvar: Arc<Condvar>, generation: u64)
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    loop {
        let mut guard = mutex.lock();
        if guard.disposed || guard.reaper_generation != generation {
            return;
        }
        let interval = guard.polling_interval;
        if interval.is_zero() {
            guard.reaper_armed = false;
            return;
        }

        let wait_result = condvar.wait_for(&mut guard, interval);
        let _ = wait_result;

        if guard.disposed || guard.reaper_generation != generation {
            return;
        }

        sweep(&mut guard);

        if guard.map.is_empty() {
            guard.reaper_armed = false;
            guard.reaper_generation = guard.reaper_generation.wrapping_add(1);
            return;
        }
        // loop again, re-acquiring the lock fresh each iteration so
        // foreground operations are never blocked longer than one sweep.
    }
}

/// One reaper sweep: remove every entry whose `expires_on` has passed.
///
/// The removal is advisory, re-checked at removal time in case a
/// concurrent write renewed the entry between the snapshot and the removal.
/// Under this crate's coarse lock that race cannot actually happen
/// mid-sweep, but the re-check costs nothing and keeps the code honest about
/// the intended semantics if the lock granularity ever changes.
pub(crate) fn sweep<K, V, S>(inner: &mut CacheInner<K, V, S>)
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    if inner.disposed || inner.map.is_empty() {
        return;
    }
    let now = Instant::now();
    for key in expired_keys(&inner.map, now) {
        if inner.map.get(&key).is_some_and(|e| e.is_expired(now)) {
            inner.map.remove(&key);
        }
    }
}

/// Arms the reaper if it should run: `polling_interval > 0`, not suppressed,
/// not disposed, and not already armed.
pub(crate) fn maybe_arm<K, V, S>(
    inner: &mut CacheInner<K, V, S>,
    mutex: &Arc<Mutex<CacheInner<K, V, S>>>,
    condvar: &Arc<Condvar>,
) where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: BuildHasher + Send + Sync + 'static,
{
    if inner.disposed || inner.reaper_armed || inner.polling_suppressed {
        return;
    }
    if inner.polling_interval.is_zero() {
        return;
    }
    inner.reaper_generation = inner.reaper_generation.wrapping_add(1);
    inner.reaper_armed = true;
    spawn(Arc::clone(mutex), Arc::clone(condvar), inner.reaper_generation);
}

/// Cancels any outstanding reaper generation and wakes it immediately so it
/// observes the cancellation without waiting out its current tick.
pub(crate) fn cancel<K, V, S>(inner: &mut CacheInner<K, V, S>, condvar: &Condvar)
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    inner.reaper_generation = inner.reaper_generation.wrapping_add(1);
    inner.reaper_armed = false;
    condvar.notify_all();
}

/// Re-arms the reaper after a cancellation if conditions still call for it.
/// Used by `start_polling`/`put`/`set_polling_interval`.
pub(crate) fn rearm_if_due<K, V, S>(
    inner: &mut CacheInner<K, V, S>,
    mutex: &Arc<Mutex<CacheInner<K, V, S>>>,
    condvar: &Arc<Condvar>,
) where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: BuildHasher + Send + Sync + 'static,
{
    if !inner.map.is_empty() {
        maybe_arm(inner, mutex, condvar);
    }
}
