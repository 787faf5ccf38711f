//! Session boundaries for session-scoped accumulators.

use crate::domain::Candle;
use crate::series::cache::CacheKey;

/// Classifies whether a given index starts a new session (trading day or
/// another domain-defined boundary). Session-scoped accumulators such as
/// VWAP reset at every index the checker marks.
///
/// The checker contributes its `key()` to the cache keys of the indicators
/// built on it, so two accumulators with the same inputs but different
/// session rules never alias each other's cached values.
pub trait SessionChecker: Send + Sync {
    /// Structural identity of this session rule.
    fn key(&self) -> CacheKey;

    /// True if `index` opens a new session. `prev` is the candle at
    /// `index - 1`, absent at index 0 — which always starts a session.
    fn starts_new_session(&self, index: usize, prev: Option<&Candle>, current: &Candle) -> bool;
}

/// New session whenever the calendar day (UTC) of the open time changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailySession;

impl SessionChecker for DailySession {
    fn key(&self) -> CacheKey {
        CacheKey::leaf("session/daily")
    }

    fn starts_new_session(&self, _index: usize, prev: Option<&Candle>, current: &Candle) -> bool {
        match prev {
            None => true,
            Some(p) => p.open_time.date_naive() != current.open_time.date_naive(),
        }
    }
}

/// New session every `length` indices, starting at index 0.
///
/// Used for synthetic sessions on feeds without a meaningful calendar, and
/// by tests that need deterministic session boundaries.
#[derive(Debug, Clone, Copy)]
pub struct FixedLengthSession {
    length: usize,
}

impl FixedLengthSession {
    pub fn new(length: usize) -> Self {
        assert!(length >= 1, "session length must be >= 1");
        Self { length }
    }
}

impl SessionChecker for FixedLengthSession {
    fn key(&self) -> CacheKey {
        CacheKey::composite("session/fixed", vec![], vec![self.length as i64])
    }

    fn starts_new_session(&self, index: usize, _prev: Option<&Candle>, _current: &Candle) -> bool {
        index % self.length == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn candle_at(h: u32, d: u32) -> Candle {
        Candle {
            open_time: Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap(),
            open: dec!(100),
            high: dec!(101),
            low: dec!(99),
            close: dec!(100),
            volume: 10,
        }
    }

    #[test]
    fn daily_session_resets_on_day_change() {
        let checker = DailySession;
        let yesterday = candle_at(23, 2);
        let today = candle_at(0, 3);
        let later_today = candle_at(1, 3);

        assert!(checker.starts_new_session(0, None, &yesterday));
        assert!(checker.starts_new_session(5, Some(&yesterday), &today));
        assert!(!checker.starts_new_session(6, Some(&today), &later_today));
    }

    #[test]
    fn fixed_length_session_marks_every_nth_index() {
        let checker = FixedLengthSession::new(5);
        let c = candle_at(0, 2);
        for i in 0..12 {
            assert_eq!(
                checker.starts_new_session(i, Some(&c), &c),
                i % 5 == 0,
                "index {i}"
            );
        }
    }

    #[test]
    fn session_keys_are_distinct() {
        assert_ne!(DailySession.key(), FixedLengthSession::new(5).key());
        assert_ne!(
            FixedLengthSession::new(5).key(),
            FixedLengthSession::new(6).key()
        );
    }
}
