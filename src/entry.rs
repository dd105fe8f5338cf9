use std::time::{Duration, Instant};

/// Per-key metadata wrapping a stored value.
///
/// Mutations to `uses`/`last_used_on`/`expires_on` happen in place while the
/// owning map's lock is held; `Entry` is never handed out by reference
/// beyond the facade, only cloned values of `V` are returned to callers.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    pub(crate) value: V,
    pub(crate) uses: u64,
    pub(crate) last_used_on: Instant,
    pub(crate) expires_on: Instant,
}

impl<V> Entry<V> {
    pub(crate) fn new(value: V, now: Instant, expiration_window: Duration) -> Self {
        Entry {
            value,
            // The insert itself counts as a use, matching the weight a
            // subsequent `get` would add.
            uses: 1,
            last_used_on: now,
            expires_on: now + expiration_window,
        }
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        self.expires_on <= now
    }

    pub(crate) fn touch_write(&mut self, value: V, now: Instant, expiration_window: Duration) {
        self.value = value;
        self.uses += 1;
        self.last_used_on = now;
        // A write always produces a live entry; sliding only governs
        // whether a subsequent read extends it further.
        self.expires_on = now + expiration_window;
    }

    pub(crate) fn touch_read(&mut self, now: Instant, expiration_window: Duration, sliding: bool) {
        self.uses += 1;
        self.last_used_on = now;
        if sliding {
            self.expires_on = now + expiration_window;
        }
    }

    pub(crate) fn revive(&mut self, now: Instant, expiration_window: Duration) {
        self.expires_on = now + expiration_window;
    }
}
