//! Bounded per-instrument tick history.

use std::collections::VecDeque;

use common::MarketSnapshot;

/// Default number of ticks retained per instrument.
pub const DEFAULT_CAPACITY: usize = 120;

/// FIFO of recent snapshots for one instrument, oldest first.
///
/// Length never exceeds the configured capacity; pushing into a full buffer
/// evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    ticks: VecDeque<MarketSnapshot>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ticks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append the latest tick, evicting the oldest one when full.
    pub fn push(&mut self, snapshot: MarketSnapshot) {
        if self.ticks.len() == self.capacity {
            self.ticks.pop_front();
        }
        self.ticks.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarketSnapshot> {
        self.ticks.iter()
    }

    /// Close prices oldest to newest.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks.iter().map(|tick| tick.last_price)
    }

    /// Traded volumes oldest to newest.
    pub fn volumes(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks.iter().map(|tick| tick.volume)
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
