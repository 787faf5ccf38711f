//! CandleSeries — ordered, time-indexed candle container.
//!
//! One series per (symbol, timeframe). Exclusively owned by whichever
//! component streams data into it (repository batch load, live feed, or a
//! replay session); indicators hold `Arc` read references and never copy.
//!
//! Two lifecycle modes:
//! - *static*: built once from a closed historical batch, never mutated;
//! - *live*: candles appended at the tail as time advances, with the tail
//!   itself replaceable in place (`update_tail`) while its period is still
//!   open. Appending freezes the previous tail permanently.
//!
//! Index stability invariant: `get(i)` for `i < last_index` never changes
//! once the series has grown past `i`. That is what makes cache entries
//! below the tail permanent.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{Candle, MathContext, Timeframe};
use crate::series::cache::{CacheKey, CacheStore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("index {index} out of range for series of {len} candles")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("out-of-order insert: open time {next} does not follow {prev}")]
    OutOfOrderInsert {
        prev: DateTime<Utc>,
        next: DateTime<Utc>,
    },

    #[error("open time {open_time} is not aligned to {timeframe} buckets")]
    MisalignedOpenTime {
        open_time: DateTime<Utc>,
        timeframe: Timeframe,
    },

    #[error("series is empty")]
    Empty,
}

/// Ordered candle container for one symbol and timeframe, owning the
/// memoization store for every indicator computed over it.
///
/// Single-writer / multiple-reader: exactly one owner calls `append` and
/// `update_tail`; reads may come from any thread concurrently. The candle
/// vector and the cache store each sit behind their own lock, which is the
/// entire synchronization story — no cross-series coordination exists.
pub struct CandleSeries {
    symbol: String,
    timeframe: Timeframe,
    math: MathContext,
    candles: RwLock<Vec<Candle>>,
    cache: Mutex<CacheStore>,
}

impl std::fmt::Debug for CandleSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandleSeries")
            .field("symbol", &self.symbol)
            .field("timeframe", &self.timeframe)
            .field("len", &self.len())
            .finish()
    }
}

impl CandleSeries {
    /// New empty series in live/append mode.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, math: MathContext) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            math,
            candles: RwLock::new(Vec::new()),
            cache: Mutex::new(CacheStore::default()),
        }
    }

    /// Build a static series from a pre-sorted repository batch.
    ///
    /// The batch must be strictly increasing in open time and aligned to the
    /// timeframe; gaps (missing buckets) are fine, duplicates are not.
    pub fn from_candles(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        math: MathContext,
        batch: Vec<Candle>,
    ) -> Result<Self, SeriesError> {
        let series = Self::new(symbol, timeframe, math);
        {
            let mut candles = series.candles.write();
            for candle in batch {
                Self::check_insertable(timeframe, candles.last(), &candle)?;
                candles.push(candle);
            }
            debug!(
                symbol = %series.symbol,
                timeframe = %series.timeframe,
                candles = candles.len(),
                "built series from batch"
            );
        }
        Ok(series)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// The rounding policy threaded through every indicator attached to
    /// this series.
    pub fn math(&self) -> MathContext {
        self.math
    }

    pub fn len(&self) -> usize {
        self.candles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.read().is_empty()
    }

    /// Index of the newest candle, `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.candles.read().len().checked_sub(1)
    }

    pub fn first(&self) -> Option<Candle> {
        self.candles.read().first().copied()
    }

    pub fn last(&self) -> Option<Candle> {
        self.candles.read().last().copied()
    }

    /// Candle at `index`, failing fast outside `[0, last_index]`.
    pub fn get(&self, index: usize) -> Result<Candle, SeriesError> {
        let candles = self.candles.read();
        candles
            .get(index)
            .copied()
            .ok_or(SeriesError::IndexOutOfRange {
                index,
                len: candles.len(),
            })
    }

    /// Bounds check without fetching; used by indicator evaluators.
    pub(crate) fn check_index(&self, index: usize) -> Result<(), SeriesError> {
        let len = self.candles.read().len();
        if index < len {
            Ok(())
        } else {
            Err(SeriesError::IndexOutOfRange { index, len })
        }
    }

    /// Index of the first candle with open time `>= instant`.
    pub fn index_at_or_after(&self, instant: DateTime<Utc>) -> Option<usize> {
        let candles = self.candles.read();
        let idx = candles.partition_point(|c| c.open_time < instant);
        (idx < candles.len()).then_some(idx)
    }

    /// Index of the last candle with open time `<= instant`.
    pub fn index_at_or_before(&self, instant: DateTime<Utc>) -> Option<usize> {
        let candles = self.candles.read();
        let idx = candles.partition_point(|c| c.open_time <= instant);
        idx.checked_sub(1)
    }

    /// Append a candle at the tail. Its open time must be strictly greater
    /// than the current tail's and aligned to the timeframe; the previous
    /// tail becomes permanently immutable.
    pub fn append(&self, candle: Candle) -> Result<(), SeriesError> {
        let mut candles = self.candles.write();
        Self::check_insertable(self.timeframe, candles.last(), &candle)?;
        candles.push(candle);
        Ok(())
    }

    /// Replace the tail candle in place, preserving its index and open time
    /// (an in-progress live candle being repainted). Evicts every cache
    /// entry at the tail index: that index's values are no longer derived
    /// from immutable inputs.
    pub fn update_tail(&self, candle: Candle) -> Result<(), SeriesError> {
        let mut candles = self.candles.write();
        let last = candles.last_mut().ok_or(SeriesError::Empty)?;
        if candle.open_time != last.open_time {
            return Err(SeriesError::OutOfOrderInsert {
                prev: last.open_time,
                next: candle.open_time,
            });
        }
        *last = candle;
        let tail_index = candles.len() - 1;
        drop(candles);
        self.cache.lock().evict_at(tail_index);
        Ok(())
    }

    /// Lazy, restartable view of `[from, to_inclusive]`, clamped to the
    /// candles that exist at iteration time.
    pub fn subrange(&self, from: usize, to_inclusive: usize) -> SubrangeIter<'_> {
        SubrangeIter {
            series: self,
            next: from,
            end: to_inclusive,
        }
    }

    fn check_insertable(
        timeframe: Timeframe,
        tail: Option<&Candle>,
        candle: &Candle,
    ) -> Result<(), SeriesError> {
        if !timeframe.is_aligned(candle.open_time) {
            return Err(SeriesError::MisalignedOpenTime {
                open_time: candle.open_time,
                timeframe,
            });
        }
        if let Some(tail) = tail {
            if candle.open_time <= tail.open_time {
                return Err(SeriesError::OutOfOrderInsert {
                    prev: tail.open_time,
                    next: candle.open_time,
                });
            }
        }
        Ok(())
    }

    // ── cache store access (indicator engine only) ───────────────────────

    pub(crate) fn cache_lookup(&self, key: &CacheKey, index: usize) -> Option<Decimal> {
        self.cache.lock().lookup(key, index)
    }

    pub(crate) fn cache_store(&self, key: &CacheKey, index: usize, value: Decimal) {
        self.cache.lock().store(key, index, value);
    }

    pub(crate) fn cache_frontier(&self, key: &CacheKey) -> Option<(usize, Decimal)> {
        self.cache.lock().frontier(key)
    }

    pub(crate) fn cache_store_recursive(&self, key: &CacheKey, index: usize, value: Decimal) {
        self.cache.lock().store_recursive(key, index, value);
    }
}

/// Iterator over a clamped index range of a series.
///
/// Restartable (`Clone`) and tolerant of the series growing while iterating;
/// each step re-reads under the series lock, so no borrow of the underlying
/// storage is held between steps.
#[derive(Clone)]
pub struct SubrangeIter<'a> {
    series: &'a CandleSeries,
    next: usize,
    end: usize,
}

impl Iterator for SubrangeIter<'_> {
    type Item = Candle;

    fn next(&mut self) -> Option<Candle> {
        if self.next > self.end {
            return None;
        }
        let candle = self.series.get(self.next).ok()?;
        self.next += 1;
        Some(candle)
    }
}
