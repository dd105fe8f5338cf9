use std::time::Duration;

/// Maximum entries when `capacity` is unset, zero, or otherwise out of
/// range.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Per-entry TTL when `expiration_window` is unset: 15 minutes.
pub const DEFAULT_EXPIRATION_WINDOW: Duration = Duration::from_millis(900_000);

/// Reaper tick when `polling_interval` is unset: 60 seconds.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(60_000);

/// The smallest expiration window the policy engine will honor; anything
/// shorter (including zero) is clamped up to this.
pub const MIN_EXPIRATION_WINDOW: Duration = Duration::from_millis(1);

/// Configuration recognized at [`crate::Cache`] construction.
///
/// Built with [`CacheConfigBuilder`], an `Option<T>`-field-plus-setters
/// builder.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub(crate) capacity: usize,
    pub(crate) expiration_window: Duration,
    pub(crate) use_sliding_expiration: bool,
    pub(crate) polling_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            capacity: DEFAULT_CAPACITY,
            expiration_window: DEFAULT_EXPIRATION_WINDOW,
            use_sliding_expiration: true,
            polling_interval: DEFAULT_POLLING_INTERVAL,
        }
    }
}

impl CacheConfig {
    /// Starts a [`CacheConfigBuilder`] with every field defaulted.
    #[must_use]
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn expiration_window(&self) -> Duration {
        self.expiration_window
    }

    pub fn use_sliding_expiration(&self) -> bool {
        self.use_sliding_expiration
    }

    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }
}

/// Clamp a requested capacity to at least 1, falling back to
/// [`DEFAULT_CAPACITY`] when the caller asked for zero.
pub(crate) fn clamp_capacity(requested: usize) -> usize {
    if requested == 0 {
        DEFAULT_CAPACITY
    } else {
        requested
    }
}

/// Clamp a requested expiration window up to [`MIN_EXPIRATION_WINDOW`].
pub(crate) fn clamp_expiration_window(requested: Duration) -> Duration {
    requested.max(MIN_EXPIRATION_WINDOW)
}

/// Builder for [`CacheConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheConfigBuilder {
    capacity: Option<usize>,
    expiration_window: Option<Duration>,
    use_sliding_expiration: Option<bool>,
    polling_interval: Option<Duration>,
}

impl CacheConfigBuilder {
    /// Sets the maximum number of entries. A value of `0` is clamped to
    /// [`DEFAULT_CAPACITY`] at `build()` time.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sets the per-entry TTL. Values below [`MIN_EXPIRATION_WINDOW`] are
    /// clamped up at `build()` time.
    #[must_use]
    pub fn expiration_window(mut self, window: Duration) -> Self {
        self.expiration_window = Some(window);
        self
    }

    /// Sets whether a successful read extends `expires_on`.
    #[must_use]
    pub fn use_sliding_expiration(mut self, sliding: bool) -> Self {
        self.use_sliding_expiration = Some(sliding);
        self
    }

    /// Sets the reaper tick. `Duration::ZERO` disables the reaper entirely.
    #[must_use]
    pub fn polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = Some(interval);
        self
    }

    /// Finishes the builder, applying defaults and clamps.
    #[must_use]
    pub fn build(self) -> CacheConfig {
        let defaults = CacheConfig::default();
        CacheConfig {
            capacity: clamp_capacity(self.capacity.unwrap_or(defaults.capacity)),
            expiration_window: clamp_expiration_window(
                self.expiration_window.unwrap_or(defaults.expiration_window),
            ),
            use_sliding_expiration: self
                .use_sliding_expiration
                .unwrap_or(defaults.use_sliding_expiration),
            polling_interval: self.polling_interval.unwrap_or(defaults.polling_interval),
        }
    }
}
