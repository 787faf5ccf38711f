//! Windowed extrema: highest and lowest input value over a clipped window.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::indicators::engine::{Cached, Calculation};
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::SeriesError;

#[derive(Clone)]
pub struct HighestCalc {
    input: Arc<dyn Indicator>,
    length: usize,
}

impl Calculation for HighestCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let start = (index + 1).saturating_sub(self.length);
        let mut best = self.input.get(start)?;
        for i in start + 1..=index {
            best = best.max(self.input.get(i)?);
        }
        Ok(best)
    }
}

/// Highest input value over the last `n` candles (clipped near the start).
pub type Highest = Cached<HighestCalc>;

impl Highest {
    pub fn new(input: Arc<dyn Indicator>, length: usize) -> Self {
        assert!(length >= 1, "Highest length must be >= 1");
        let series = input.series().clone();
        let key = CacheKey::compose("highest", &[input.cache_key()], vec![length as i64]);
        Cached::with_key(series, key, HighestCalc { input, length })
    }
}

#[derive(Clone)]
pub struct LowestCalc {
    input: Arc<dyn Indicator>,
    length: usize,
}

impl Calculation for LowestCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let start = (index + 1).saturating_sub(self.length);
        let mut best = self.input.get(start)?;
        for i in start + 1..=index {
            best = best.min(self.input.get(i)?);
        }
        Ok(best)
    }
}

/// Lowest input value over the last `n` candles (clipped near the start).
pub type Lowest = Cached<LowestCalc>;

impl Lowest {
    pub fn new(input: Arc<dyn Indicator>, length: usize) -> Self {
        assert!(length >= 1, "Lowest length must be >= 1");
        let series = input.series().clone();
        let key = CacheKey::compose("lowest", &[input.cache_key()], vec![length as i64]);
        Cached::with_key(series, key, LowestCalc { input, length })
    }
}
