//! Per-day trade tallies with calendar rollover.

use std::collections::HashMap;

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct DailyCounters {
    day: NaiveDate,
    per_instrument: HashMap<String, u32>,
    total: u32,
}

impl DailyCounters {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            day: today,
            per_instrument: HashMap::new(),
            total: 0,
        }
    }

    /// Reset tallies when the stored day is stale. Idempotent within a day.
    pub fn rollover_if_needed(&mut self, today: NaiveDate) {
        if self.day != today {
            self.day = today;
            self.per_instrument.clear();
            self.total = 0;
        }
    }

    /// Record one confirmed execution. Called at most once per fill.
    pub fn record_trade(&mut self, instrument_id: &str) {
        *self
            .per_instrument
            .entry(instrument_id.to_string())
            .or_insert(0) += 1;
        self.total = self.total.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn for_instrument(&self, instrument_id: &str) -> u32 {
        self.per_instrument
            .get(instrument_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn records_per_instrument_and_aggregate() {
        let mut counters = DailyCounters::new(date(1));
        counters.record_trade("1333");
        counters.record_trade("1333");
        counters.record_trade("288");

        assert_eq!(counters.total(), 3);
        assert_eq!(counters.for_instrument("1333"), 2);
        assert_eq!(counters.for_instrument("288"), 1);
        assert_eq!(counters.for_instrument("11536"), 0);
    }

    #[test]
    fn rollover_resets_exactly_once() {
        let mut counters = DailyCounters::new(date(1));
        counters.record_trade("1333");

        // same day: nothing happens, however often it is checked
        counters.rollover_if_needed(date(1));
        counters.rollover_if_needed(date(1));
        assert_eq!(counters.total(), 1);

        // new day: everything resets
        counters.rollover_if_needed(date(2));
        assert_eq!(counters.total(), 0);
        assert_eq!(counters.for_instrument("1333"), 0);
        assert_eq!(counters.day(), date(2));

        // and stays reset on repeat checks
        counters.record_trade("1333");
        counters.rollover_if_needed(date(2));
        assert_eq!(counters.total(), 1);
    }
}
