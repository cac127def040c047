//! Processing statistics tracking.
//!
//! Atomic counters shared by every chain the binary runs concurrently: one
//! per `ErrorType`, one per `InfoType`, and a completed-chain count.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType};

/// One zeroed counter for every variant of `K`.
struct Counters<K> {
    slots: HashMap<K, AtomicUsize>,
}

impl<K> Counters<K>
where
    K: IntoEnumIterator + Eq + Hash + Copy + Debug,
{
    fn new() -> Self {
        Self {
            slots: K::iter().map(|key| (key, AtomicUsize::new(0))).collect(),
        }
    }

    fn bump(&self, key: K) {
        match self.slots.get(&key) {
            Some(counter) => {
                counter.fetch_add(1, Ordering::Relaxed);
            }
            // Unreachable while `new` seeds every variant.
            None => log::error!("No counter registered for {key:?}"),
        }
    }

    fn get(&self, key: K) -> usize {
        self.slots
            .get(&key)
            .map_or(0, |counter| counter.load(Ordering::SeqCst))
    }

    fn sum(&self) -> usize {
        K::iter().map(|key| self.get(key)).sum()
    }

    fn nonzero(&self) -> Vec<(K, usize)> {
        K::iter()
            .map(|key| (key, self.get(key)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Thread-safe tally of how request chains ended.
///
/// Share it across tasks with `Arc`.
pub struct ProcessingStats {
    errors: Counters<ErrorType>,
    info: Counters<InfoType>,
    completed: AtomicUsize,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        ProcessingStats {
            errors: Counters::new(),
            info: Counters::new(),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn increment_error(&self, error: ErrorType) {
        self.errors.bump(error);
    }

    pub fn increment_info(&self, info_type: InfoType) {
        self.info.bump(info_type);
    }

    /// Record one successfully completed chain.
    pub fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors.get(error)
    }

    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        self.info.get(info_type)
    }

    /// Number of chains that completed successfully.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total_errors(&self) -> usize {
        self.errors.sum()
    }

    pub fn total_info(&self) -> usize {
        self.info.sum()
    }

    /// Error types seen at least once, in declaration order.
    pub fn error_breakdown(&self) -> Vec<(ErrorType, usize)> {
        self.errors.nonzero()
    }

    /// Info types seen at least once, in declaration order.
    pub fn info_breakdown(&self) -> Vec<(InfoType, usize)> {
        self.info.nonzero()
    }
}
