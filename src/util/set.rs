use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A set that can be shared between workers behind an `Arc`.
#[derive(Debug)]
pub struct SimpleSet<T> {
    elements: RwLock<HashSet<T>>,
}

impl<T> SimpleSet<T>
where
    T: Eq + Hash + Clone,
{
    /// Creates an empty set. `capacity` only pre-sizes the storage.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: RwLock::new(HashSet::with_capacity(capacity)),
        }
    }

    /// Inserts `value`, returning false if it was already present.
    pub fn add(&self, value: T) -> bool {
        self.write().insert(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.read().contains(value)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of the elements in no particular order.
    pub fn to_vec(&self) -> Vec<T> {
        self.read().iter().cloned().collect()
    }

    // A panic while holding the lock cannot leave the set half-updated.
    fn read(&self) -> RwLockReadGuard<'_, HashSet<T>> {
        self.elements.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashSet<T>> {
        self.elements.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Default for SimpleSet<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_add_contains_clear() {
        let set = SimpleSet::with_capacity(4);
        assert!(set.add("a"));
        assert!(!set.add("a"));
        assert!(set.add("b"));

        assert!(set.contains(&"a"));
        assert!(!set.contains(&"z"));
        assert_eq!(set.len(), 2);

        let mut items = set.to_vec();
        items.sort();
        assert_eq!(items, vec!["a", "b"]);

        set.clear();
        assert!(set.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds() {
        let set = Arc::new(SimpleSet::with_capacity(0));
        let mut handles = Vec::new();
        for worker in 0..4 {
            let set = Arc::clone(&set);
            handles.push(tokio::spawn(async move {
                for n in 0..50 {
                    set.add(n % 25 + worker * 25);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(set.len(), 100);
    }
}
