//! Append-only display-name cache for user and guard identities.
//!
//! Reconciled records reference issuing users and scanning guards by
//! identifier; listings want display names. Identities rarely change
//! within a session, so resolved names are memoized per process and never
//! invalidated or evicted. The cache is an explicit value passed by
//! reference, not module-level state.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Fallback display name for identities that cannot be resolved.
pub const UNKNOWN_IDENTITY: &str = "Unknown";

/// Memoized `identifier -> display name` mapping.
///
/// Writes are sequenced through the service layer's fetch cycles; reads may
/// happen concurrently from any handler.
#[derive(Debug, Default)]
pub struct IdentityCache {
    names: RwLock<HashMap<String, String>>,
}

impl IdentityCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached display name for `id`, if any.
    pub async fn get(&self, id: &str) -> Option<String> {
        self.names.read().await.get(id).cloned()
    }

    /// Memoizes a resolved display name. Unresolvable identities should be
    /// inserted as [`UNKNOWN_IDENTITY`] so they are not re-fetched on every
    /// cycle.
    pub async fn insert(&self, id: &str, name: String) {
        self.names.write().await.insert(id.to_string(), name);
    }

    /// Returns the number of memoized identities.
    pub async fn len(&self) -> usize {
        self.names.read().await.len()
    }

    /// Returns `true` if nothing has been memoized yet.
    pub async fn is_empty(&self) -> bool {
        self.names.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_none_before_insert() {
        let cache = IdentityCache::new();
        assert_eq!(cache.get("u-1").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn insert_then_get() {
        let cache = IdentityCache::new();
        cache.insert("u-1", "Dana Lim".to_string()).await;
        assert_eq!(cache.get("u-1").await.as_deref(), Some("Dana Lim"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_sentinel_is_cacheable() {
        let cache = IdentityCache::new();
        cache.insert("ghost", UNKNOWN_IDENTITY.to_string()).await;
        assert_eq!(cache.get("ghost").await.as_deref(), Some(UNKNOWN_IDENTITY));
    }
}
