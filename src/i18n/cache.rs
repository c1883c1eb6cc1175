//! Memoize-forever cache slot.
//!
//! A slot starts `Empty` and moves to `Populated` on the first non-empty
//! fill. There is no eviction; `reset` exists only so tests can start from
//! a clean slot.

use std::sync::RwLock;

/// Values a slot can hold. Empty values never populate a slot.
pub trait CacheValue: Clone {
    fn is_empty_value(&self) -> bool;
}

impl<T: Clone> CacheValue for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

#[derive(Debug)]
enum SlotState<T> {
    Empty,
    Populated(T),
}

/// A process-lifetime cache for one computed value.
#[derive(Debug)]
pub struct CacheSlot<T> {
    state: RwLock<SlotState<T>>,
}

impl<T: CacheValue> CacheSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SlotState::Empty),
        }
    }

    /// Get a copy of the cached value, if populated.
    pub fn get(&self) -> Option<T> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        match &*state {
            SlotState::Populated(value) => Some(value.clone()),
            SlotState::Empty => None,
        }
    }

    /// Store `value` if it is non-empty.
    ///
    /// Concurrent fills with the same computed value are harmless; the last
    /// writer wins.
    ///
    /// # Returns
    /// `true` if the slot is now populated by this value.
    pub fn fill(&self, value: T) -> bool {
        if value.is_empty_value() {
            return false;
        }
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = SlotState::Populated(value);
        true
    }

    /// Whether the slot holds a value.
    #[cfg(test)]
    pub fn is_populated(&self) -> bool {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        matches!(&*state, SlotState::Populated(_))
    }

    /// Return the slot to `Empty`. Intended for test isolation.
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = SlotState::Empty;
    }
}

impl<T: CacheValue> Default for CacheSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
