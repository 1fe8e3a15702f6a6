use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoundRobinError {
    #[error("cannot create RoundRobin with an empty slice")]
    Empty,
}

/// Hands out elements in turn, wrapping around. Safe to share between
/// workers.
#[derive(Debug)]
pub struct RoundRobin<T> {
    items: Vec<T>,
    index: Mutex<usize>,
}

impl<T: Clone> RoundRobin<T> {
    pub fn new(items: impl Into<Vec<T>>) -> Result<Self, RoundRobinError> {
        let items = items.into();
        if items.is_empty() {
            return Err(RoundRobinError::Empty);
        }

        Ok(Self {
            items,
            index: Mutex::new(0),
        })
    }

    pub fn next(&self) -> T {
        // The index is always left valid, so a poisoned lock is still usable.
        let mut index = self.index.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let item = self.items[*index].clone();
        *index = (*index + 1) % self.items.len();
        item
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
