//! The two evaluator strategies behind every catalog indicator.
//!
//! [`Cached`] memoizes a per-index formula that reads its inputs at the
//! requested index or earlier and never recurses through its own output.
//!
//! [`Recursive`] evaluates self-referential formulas of the shape
//! `value[i] = f(value[i-1], input[i])`. A naive recursive descent from a
//! high index would chain `i` stack frames and recompute shared prefixes on
//! every cache miss; instead the engine walks forward iteratively from the
//! slot's frontier (the highest contiguously cached index), caching every
//! intermediate value. Each call costs O(distance to the frontier), and a
//! monotonically increasing query sequence costs O(n) in total.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::{CandleSeries, SeriesError};

/// Per-index formula for a [`Cached`] indicator.
///
/// `calculate` may read inputs at `index`, `index - 1`, etc., but must not
/// read this indicator's own output; self-referential formulas belong in a
/// [`RecursiveCalculation`].
pub trait Calculation: Send + Sync {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError>;
}

/// Memoizing evaluator for backward-looking formulas.
#[derive(Clone)]
pub struct Cached<C> {
    series: Arc<CandleSeries>,
    key: Option<CacheKey>,
    calc: C,
}

impl<C: Calculation> Cached<C> {
    pub(crate) fn with_key(series: Arc<CandleSeries>, key: Option<CacheKey>, calc: C) -> Self {
        Self { series, key, calc }
    }
}

impl<C: Calculation> Indicator for Cached<C> {
    fn series(&self) -> &Arc<CandleSeries> {
        &self.series
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        self.key.as_ref()
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        self.series.check_index(index)?;
        let Some(key) = &self.key else {
            return self.calc.calculate(index);
        };
        if let Some(value) = self.series.cache_lookup(key, index) {
            return Ok(value);
        }
        let value = self.calc.calculate(index)?;
        self.series.cache_store(key, index, value);
        Ok(value)
    }
}

/// Base case and step of a [`Recursive`] indicator.
pub trait RecursiveCalculation: Send + Sync {
    /// `value[0]`.
    fn seed(&self) -> Result<Decimal, SeriesError>;

    /// `value[index]` from `value[index - 1]`. Called with `index >= 1`.
    fn step(&self, prev: Decimal, index: usize) -> Result<Decimal, SeriesError>;
}

/// Forward-filling evaluator for self-referential formulas.
#[derive(Clone)]
pub struct Recursive<C> {
    series: Arc<CandleSeries>,
    key: Option<CacheKey>,
    calc: C,
}

impl<C: RecursiveCalculation> Recursive<C> {
    pub(crate) fn with_key(series: Arc<CandleSeries>, key: Option<CacheKey>, calc: C) -> Self {
        Self { series, key, calc }
    }
}

impl<C: RecursiveCalculation> Indicator for Recursive<C> {
    fn series(&self) -> &Arc<CandleSeries> {
        &self.series
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        self.key.as_ref()
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        self.series.check_index(index)?;

        let Some(key) = &self.key else {
            // Unkeyed: nothing to resume from, walk the whole prefix.
            let mut value = self.calc.seed()?;
            for i in 1..=index {
                value = self.calc.step(value, i)?;
            }
            return Ok(value);
        };

        if let Some(value) = self.series.cache_lookup(key, index) {
            return Ok(value);
        }

        // Resume from the frontier when it is behind the requested index;
        // otherwise (no frontier yet, or it was rolled back past a hole)
        // re-seed from the base case.
        let (mut i, mut value) = match self.series.cache_frontier(key) {
            Some((frontier, value)) if frontier < index => (frontier, value),
            _ => {
                let seed = self.calc.seed()?;
                self.series.cache_store_recursive(key, 0, seed);
                (0, seed)
            }
        };
        while i < index {
            i += 1;
            value = self.calc.step(value, i)?;
            self.series.cache_store_recursive(key, i, value);
        }
        Ok(value)
    }
}
