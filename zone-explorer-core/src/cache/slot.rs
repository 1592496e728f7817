//! Per-key load state
//!
//! Every key of a cache table is in exactly one of three states. Absent keys
//! have no slot at all; the other two states are the variants of
//! [`CacheSlot`], so a key cannot be loading and populated at the same time.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Observable state of a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Absent,
    Loading,
    Present,
}

#[derive(Debug)]
enum CacheSlot<T> {
    /// A load is in flight. `observed` is set once another caller saw it.
    Loading { observed: bool },
    Present(Arc<Vec<T>>),
}

/// Outcome of [`CacheTable::claim`].
#[derive(Debug)]
pub enum Claim<T> {
    /// The key is populated; use these items.
    Cached(Arc<Vec<T>>),
    /// Someone else is loading the key; show a loading placeholder.
    InFlight,
    /// The caller now owns the load and must `complete` or `abort` it.
    Acquired,
}

/// One cache table: key → slot.
#[derive(Debug)]
pub struct CacheTable<K, T> {
    slots: HashMap<K, CacheSlot<T>>,
}

impl<K, T> Default for CacheTable<K, T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, T> CacheTable<K, T> {
    pub fn state(&self, key: &K) -> SlotState {
        match self.slots.get(key) {
            None => SlotState::Absent,
            Some(CacheSlot::Loading { .. }) => SlotState::Loading,
            Some(CacheSlot::Present(_)) => SlotState::Present,
        }
    }

    /// Populated items only; a loading key reads as absent.
    pub fn get(&self, key: &K) -> Option<Arc<Vec<T>>> {
        match self.slots.get(key) {
            Some(CacheSlot::Present(items)) => Some(Arc::clone(items)),
            _ => None,
        }
    }

    pub fn set(&mut self, key: K, items: Vec<T>) -> Arc<Vec<T>> {
        let items = Arc::new(items);
        self.slots
            .insert(key, CacheSlot::Present(Arc::clone(&items)));
        items
    }

    /// Check-and-set in one step: no other caller can claim the key between
    /// the check and the transition to Loading.
    pub fn claim(&mut self, key: &K) -> Claim<T> {
        match self.slots.get_mut(key) {
            Some(CacheSlot::Present(items)) => Claim::Cached(Arc::clone(items)),
            Some(CacheSlot::Loading { observed }) => {
                *observed = true;
                Claim::InFlight
            }
            None => {
                self.slots
                    .insert(key.clone(), CacheSlot::Loading { observed: false });
                Claim::Acquired
            }
        }
    }

    /// Loading → Present. Returns the stored items and whether another caller
    /// observed the load while it was in flight.
    pub fn complete(&mut self, key: K, items: Vec<T>) -> (Arc<Vec<T>>, bool) {
        let observed = matches!(
            self.slots.get(&key),
            Some(CacheSlot::Loading { observed: true })
        );
        (self.set(key, items), observed)
    }

    /// Loading → Absent. Returns whether the load was observed. A key that is
    /// not loading is left untouched.
    pub fn abort(&mut self, key: &K) -> bool {
        match self.slots.get(key) {
            Some(CacheSlot::Loading { observed }) => {
                let observed = *observed;
                self.slots.remove(key);
                observed
            }
            _ => false,
        }
    }

    /// Present → Absent. Loading keys are left to their in-flight load.
    pub fn invalidate(&mut self, key: &K) {
        if matches!(self.slots.get(key), Some(CacheSlot::Present(_))) {
            self.slots.remove(key);
        }
    }

    /// Invalidate every populated key matching `predicate`.
    pub fn invalidate_where(&mut self, mut predicate: impl FnMut(&K) -> bool) {
        self.slots
            .retain(|key, slot| matches!(slot, CacheSlot::Loading { .. }) || !predicate(key));
    }

    pub fn invalidate_all(&mut self) {
        self.invalidate_where(|_| true);
    }

    pub fn present_len(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, CacheSlot::Present(_)))
            .count()
    }
}
