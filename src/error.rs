use thiserror::Error;

/// Errors surfaced by [`crate::Cache`](crate::Cache) foreground operations.
///
/// `Internal` reaper-only failures (see the crate's top-level docs on the
/// reaper) are never surfaced here: the reaper swallows its own errors and
/// simply terminates, per the propagation policy every store in this crate
/// follows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A caller-supplied argument was invalid, e.g. a negative `copy_to`
    /// offset.
    #[error("argument invalid: {0}")]
    ArgumentInvalid(&'static str),

    /// The requested key is absent or has expired.
    #[error("key not found")]
    NotFound,

    /// `copy_to`'s destination does not have enough remaining room for the
    /// snapshot starting at the given offset.
    #[error("destination capacity insufficient: need {needed}, have {available}")]
    CapacityInsufficient { needed: usize, available: usize },

    /// The cache has been disposed; every operation except `is_disposed`
    /// fails this way from then on.
    #[error("cache used after disposal")]
    UsedAfterDisposal,
}
