//! Keyed async mutexes
//!
//! Serializes tasks that contend on the same key while leaving tasks on
//! different keys fully concurrent. Entries are created on first use and
//! removed again once the last interested task lets go, so the map stays
//! proportional to the number of keys currently under contention.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A map of async mutexes, one per key
///
/// Cloning is cheap; clones share the same underlying lock table.
#[derive(Debug, Clone)]
pub struct KeyedMutex<K>
where
    K: Eq + Hash + Clone,
{
    locks: Arc<DashMap<K, Arc<Mutex<()>>>>,
}

impl<K> KeyedMutex<K>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty lock table
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Acquire the mutex for `key`, waiting if another task holds it
    ///
    /// The returned guard releases the mutex on drop and removes the map
    /// entry when no other task is waiting on it.
    pub async fn lock(&self, key: K) -> KeyedMutexGuard<K> {
        let mutex = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = mutex.lock_owned().await;

        KeyedMutexGuard {
            guard: Some(guard),
            key,
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of keys currently tracked
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no key is currently tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl<K> Default for KeyedMutex<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for a held keyed mutex
pub struct KeyedMutexGuard<K>
where
    K: Eq + Hash + Clone,
{
    guard: Option<OwnedMutexGuard<()>>,
    key: K,
    locks: Arc<DashMap<K, Arc<Mutex<()>>>>,
}

impl<K> Drop for KeyedMutexGuard<K>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        // Release the mutex first, then drop the entry unless a waiter
        // still holds a reference to it. remove_if takes the shard lock,
        // so the count cannot change between the check and the removal.
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) <= 1);
    }
}
