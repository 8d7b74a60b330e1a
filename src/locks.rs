//! Per-key mutual exclusion.
//!
//! Login attempts for one username and status changes for one payroll
//! record are read-modify-write sequences against the store. Running them
//! under a per-key lock keeps concurrent attempts on the same key serialized
//! while different keys proceed in parallel.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

/// A map from key to its own mutex.
///
/// Slots are created on first use and kept for the lifetime of the map.
#[derive(Debug)]
pub struct KeyedLocks<K>
where
    K: Eq + Hash,
{
    slots: DashMap<K, Arc<Mutex<()>>>,
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash,
{
    /// Creates an empty lock map.
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Returns the mutex for `key`, creating it if needed.
    fn slot(&self, key: K) -> Arc<Mutex<()>> {
        // Clone the Arc out so the shard guard is released before locking.
        self.slots.entry(key).or_default().value().clone()
    }

    /// Runs `f` while holding the lock for `key`.
    pub fn with_lock<T>(&self, key: K, f: impl FnOnce() -> T) -> T {
        let slot = self.slot(key);
        let _guard = slot.lock();
        f()
    }

    /// Number of keys that have been locked at least once.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true when no key has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::thread;

    #[test]
    fn test_same_key_is_serialized() {
        let locks = Arc::new(KeyedLocks::new());
        let inside = Arc::new(AtomicU32::new(0));
        let max_inside = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_inside = Arc::clone(&max_inside);
                thread::spawn(move || {
                    for _ in 0..50 {
                        locks.with_lock("jdoe".to_string(), || {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_inside.fetch_max(now, Ordering::SeqCst);
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn test_returns_closure_value() {
        let locks = KeyedLocks::new();
        assert!(locks.is_empty());
        assert_eq!(locks.with_lock(7u64, || 42), 42);
        assert_eq!(locks.len(), 1);
    }
}
