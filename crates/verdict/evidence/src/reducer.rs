//! Merge strategies for concurrently written state channels.

use crate::store::{self, EvidenceMap};

/// Combines a channel's current value with one write.
///
/// Implementations must be associative and insensitive to the order in
/// which concurrent writes arrive.
pub trait Reducer<T>: Send + Sync {
    fn reduce(&self, current: T, update: T) -> T;
}

/// Key-union for evidence maps.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyUnion;

impl Reducer<EvidenceMap> for KeyUnion {
    fn reduce(&self, current: EvidenceMap, update: EvidenceMap) -> EvidenceMap {
        store::merge(current, update)
    }
}

/// List append.
#[derive(Clone, Copy, Debug, Default)]
pub struct Append;

impl<T: Send + Sync> Reducer<Vec<T>> for Append {
    fn reduce(&self, mut current: Vec<T>, mut update: Vec<T>) -> Vec<T> {
        current.append(&mut update);
        current
    }
}

/// A value that is only ever written through its reducer.
#[derive(Debug)]
pub struct Channel<T, R> {
    value: T,
    reducer: R,
    writes: u64,
}

impl<T: Default, R: Reducer<T>> Channel<T, R> {
    pub fn new(reducer: R) -> Self {
        Self {
            value: T::default(),
            reducer,
            writes: 0,
        }
    }

    pub fn write(&mut self, update: T) {
        let current = std::mem::take(&mut self.value);
        self.value = self.reducer.reduce(current, update);
        self.writes += 1;
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
