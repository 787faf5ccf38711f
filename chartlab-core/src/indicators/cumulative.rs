//! Rolling and session-scoped sums.
//!
//! `Cumulative(n)` is the sum over the same clipped window as the SMA.
//! `SessionCumulative` is a running sum reset to the bare input value at
//! every index its `SessionChecker` marks as a session start (index 0
//! always starts one).

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::indicators::engine::{Cached, Calculation, Recursive, RecursiveCalculation};
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::{CandleSeries, SeriesError, SessionChecker};

#[derive(Clone)]
pub struct CumulativeCalc {
    input: Arc<dyn Indicator>,
    length: usize,
}

impl Calculation for CumulativeCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let start = (index + 1).saturating_sub(self.length);
        let mut sum = Decimal::ZERO;
        for i in start..=index {
            sum += self.input.get(i)?;
        }
        Ok(sum)
    }
}

/// Rolling sum over a clipped window.
pub type Cumulative = Cached<CumulativeCalc>;

impl Cumulative {
    pub fn new(input: Arc<dyn Indicator>, length: usize) -> Self {
        assert!(length >= 1, "Cumulative length must be >= 1");
        let series = input.series().clone();
        let key = CacheKey::compose("cum", &[input.cache_key()], vec![length as i64]);
        Cached::with_key(series, key, CumulativeCalc { input, length })
    }
}

#[derive(Clone)]
pub struct SessionCumulativeCalc {
    series: Arc<CandleSeries>,
    input: Arc<dyn Indicator>,
    checker: Arc<dyn SessionChecker>,
}

impl RecursiveCalculation for SessionCumulativeCalc {
    fn seed(&self) -> Result<Decimal, SeriesError> {
        self.input.get(0)
    }

    fn step(&self, prev: Decimal, index: usize) -> Result<Decimal, SeriesError> {
        let current = self.series.get(index)?;
        let previous = self.series.get(index - 1)?;
        let value = self.input.get(index)?;
        if self
            .checker
            .starts_new_session(index, Some(&previous), &current)
        {
            Ok(value)
        } else {
            Ok(prev + value)
        }
    }
}

/// Running sum that restarts at every session boundary.
pub type SessionCumulative = Recursive<SessionCumulativeCalc>;

impl SessionCumulative {
    pub fn new(input: Arc<dyn Indicator>, checker: Arc<dyn SessionChecker>) -> Self {
        let series = input.series().clone();
        let session_key = checker.key();
        let key = CacheKey::compose(
            "session-cum",
            &[input.cache_key(), Some(&session_key)],
            vec![],
        );
        Recursive::with_key(
            series.clone(),
            key,
            SessionCumulativeCalc {
                series,
                input,
                checker,
            },
        )
    }
}
