//! Mapping of ledger timestamps onto auction cycles.
//!
//! Nothing here reads a clock. Every answer is a pure function of the
//! stored settings and the timestamp handed in by the host, so replaying
//! the same invocation always lands in the same cycle.

use crate::types::Settings;

/// Where the auction stands at a given timestamp.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// `now` is before `start_time`.
    NotStarted,
    /// Contributions are credited to this cycle index.
    Open(u64),
    /// Every cycle has closed.
    Ended,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CycleClock {
    pub start_time: u64,
    pub cycle_duration: u64,
    pub total_cycles: u64,
}

impl CycleClock {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            start_time: settings.start_time,
            cycle_duration: settings.cycle_duration,
            total_cycles: settings.total_cycles,
        }
    }

    /// Unclamped cycle index, `None` before the auction starts.
    ///
    /// A value `>= total_cycles` means the auction has ended.
    pub fn raw_index(&self, now: u64) -> Option<u64> {
        if now < self.start_time || self.cycle_duration == 0 {
            return None;
        }
        Some((now - self.start_time) / self.cycle_duration)
    }

    pub fn phase(&self, now: u64) -> Phase {
        match self.raw_index(now) {
            None => Phase::NotStarted,
            Some(index) if index >= self.total_cycles => Phase::Ended,
            Some(index) => Phase::Open(index),
        }
    }

    /// Active cycle clamped to `[0, total_cycles - 1]`.
    pub fn active_index(&self, now: u64) -> u64 {
        let last = self.total_cycles.saturating_sub(1);
        self.raw_index(now).map_or(0, |index| index.min(last))
    }

    /// Number of cycles that have fully closed. Cycles `0..closed_cycles(now)` are frozen.
    pub fn closed_cycles(&self, now: u64) -> u64 {
        self.raw_index(now)
            .map_or(0, |index| index.min(self.total_cycles))
    }

    /// Timestamp at which `cycle` closes.
    pub fn cycle_end(&self, cycle: u64) -> u64 {
        self.start_time
            .saturating_add(cycle.saturating_add(1).saturating_mul(self.cycle_duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> CycleClock {
        CycleClock {
            start_time: 1_000,
            cycle_duration: 25,
            total_cycles: 4,
        }
    }

    #[test]
    fn before_start_is_not_started() {
        let c = clock();
        assert_eq!(c.raw_index(999), None);
        assert_eq!(c.phase(0), Phase::NotStarted);
        assert_eq!(c.active_index(999), 0);
        assert_eq!(c.closed_cycles(999), 0);
    }

    #[test]
    fn boundaries_belong_to_the_next_cycle() {
        let c = clock();
        assert_eq!(c.phase(1_000), Phase::Open(0));
        assert_eq!(c.phase(1_024), Phase::Open(0));
        assert_eq!(c.phase(1_025), Phase::Open(1));
        assert_eq!(c.closed_cycles(1_024), 0);
        assert_eq!(c.closed_cycles(1_025), 1);
    }

    #[test]
    fn ends_after_last_cycle() {
        let c = clock();
        assert_eq!(c.phase(1_099), Phase::Open(3));
        assert_eq!(c.phase(1_100), Phase::Ended);
        assert_eq!(c.raw_index(5_000), Some(160));
        assert_eq!(c.active_index(5_000), 3);
        assert_eq!(c.closed_cycles(5_000), 4);
    }

    #[test]
    fn cycle_end_matches_phase_change() {
        let c = clock();
        for cycle in 0..4 {
            let end = c.cycle_end(cycle);
            assert_eq!(c.phase(end - 1), Phase::Open(cycle));
            assert_eq!(c.closed_cycles(end), cycle + 1);
        }
    }
}
