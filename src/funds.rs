//! TTL-memoized view of available trading capital.

use std::time::{Duration, Instant};

/// Floor applied to the configured TTL.
const MIN_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
struct FundsEntry {
    amount: f64,
    captured_at: Instant,
}

/// Memoizes the last capital read so the engine does not hammer the broker
/// on every tick. Entries past their TTL are never served.
#[derive(Debug)]
pub struct FundsCache {
    ttl: Duration,
    entry: Option<FundsEntry>,
}

impl FundsCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs).max(MIN_TTL),
            entry: None,
        }
    }

    /// Cached amount, if still within the TTL.
    pub fn get(&self) -> Option<f64> {
        self.entry
            .filter(|entry| entry.captured_at.elapsed() < self.ttl)
            .map(|entry| entry.amount)
    }

    /// Record a fresh read from the capital source. Negative reads clamp to zero.
    pub fn store(&mut self, amount: f64) {
        self.entry = Some(FundsEntry {
            amount: amount.max(0.0),
            captured_at: Instant::now(),
        });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    #[cfg(test)]
    fn backdate(&mut self, age: Duration) {
        if let Some(entry) = self.entry.as_mut() {
            entry.captured_at = Instant::now() - age;
        }
    }
}
