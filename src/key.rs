//! A concrete "comparer" example: case-insensitive string keys.
//!
//! Wraps a key and delegates `Hash`/`Eq` to a case-folded view of it: a
//! tuple-struct newtype forwarding to a transformation of the inner value,
//! rather than a runtime enum/trait-object comparer.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

/// Wraps a `String` key so that `Hash`/`Eq`/`Ord` compare case-insensitively.
///
/// ```
/// use reaper_cache::{Cache, CacheConfig, CaseInsensitiveKey};
///
/// let cache: Cache<CaseInsensitiveKey, i32> = Cache::new(CacheConfig::builder().build());
/// cache.put(CaseInsensitiveKey::new("Session"), 1).unwrap();
/// assert_eq!(cache.get(&CaseInsensitiveKey::new("session")).unwrap(), 1);
/// assert_eq!(cache.get(&CaseInsensitiveKey::new("SESSION")).unwrap(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CaseInsensitiveKey(String);

impl CaseInsensitiveKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        CaseInsensitiveKey(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for CaseInsensitiveKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for CaseInsensitiveKey {}

impl Hash for CaseInsensitiveKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            byte.to_ascii_lowercase().hash(state);
        }
    }
}

impl Borrow<str> for CaseInsensitiveKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CaseInsensitiveKey {
    fn from(value: &str) -> Self {
        CaseInsensitiveKey::new(value)
    }
}

impl From<String> for CaseInsensitiveKey {
    fn from(value: String) -> Self {
        CaseInsensitiveKey::new(value)
    }
}
