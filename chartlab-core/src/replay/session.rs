//! Step-wise historical replay with on-the-fly resampling.
//!
//! A `ReplaySession` walks a base series one candle per `next` call and
//! maintains a derived series at a coarser (or equal) timeframe, exactly as
//! a live broker feed would have produced it at that point in time: closed
//! buckets are appended, and the bucket enclosing the current instant is
//! repainted in place via `update_tail` — which fires the cache
//! invalidation handshake for any indicator attached to the derived series.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{Candle, Timeframe};
use crate::replay::resample::BucketState;
use crate::series::{CandleSeries, SeriesError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("replay exhausted after {consumed} candles")]
    Exhausted { consumed: usize },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Replays a base series into a derived series of the target timeframe.
///
/// Owned by a single consumer; stepping and resetting take `&mut self`.
/// Stopping a replay is simply ceasing to call `next`.
pub struct ReplaySession {
    base: Arc<CandleSeries>,
    target: Timeframe,
    initial_index: usize,
    offset: usize,
    derived: Arc<CandleSeries>,
    bucket: Option<BucketState>,
}

impl ReplaySession {
    /// Replay from the start of `base`.
    ///
    /// Panics if `target` is not a whole multiple of the base timeframe.
    pub fn new(base: Arc<CandleSeries>, target: Timeframe) -> Self {
        Self::starting_at(base, target, 0)
    }

    /// Replay from a given base index (e.g. resume mid-history).
    pub fn starting_at(base: Arc<CandleSeries>, target: Timeframe, initial_index: usize) -> Self {
        assert!(
            target.is_multiple_of(base.timeframe()),
            "cannot replay {} into {}",
            base.timeframe(),
            target,
        );
        let derived = Self::fresh_derived(&base, target);
        Self {
            base,
            target,
            initial_index,
            offset: 0,
            derived,
            bucket: None,
        }
    }

    fn fresh_derived(base: &CandleSeries, target: Timeframe) -> Arc<CandleSeries> {
        Arc::new(CandleSeries::new(base.symbol(), target, base.math()))
    }

    /// The derived series the session publishes into.
    ///
    /// `reset` replaces it with a fresh one; indicators attached to the old
    /// series keep reading a frozen snapshot and must be rebuilt against the
    /// new handle (cheap — the cache store travels with the series, and
    /// rebuilt graphs share it structurally).
    pub fn derived_series(&self) -> &Arc<CandleSeries> {
        &self.derived
    }

    /// Number of base candles consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The most recently published (possibly partial) candle.
    pub fn current_candle(&self) -> Option<Candle> {
        self.derived.last()
    }

    /// True once every base candle from the initial index on is consumed.
    pub fn is_exhausted(&self) -> bool {
        self.initial_index + self.offset >= self.base.len()
    }

    /// Back to offset 0: clears the accumulator and starts a fresh derived
    /// series. Always safe, whatever the current offset.
    pub fn reset(&mut self) {
        debug!(
            symbol = %self.base.symbol(),
            consumed = self.offset,
            "replay reset"
        );
        self.offset = 0;
        self.bucket = None;
        self.derived = Self::fresh_derived(&self.base, self.target);
    }

    /// Consume the next base candle and publish the resulting derived
    /// candle — the base candle itself for same-timeframe replay, otherwise
    /// the partial bucket enclosing it.
    ///
    /// Fails with `ReplayError::Exhausted` past the end of the base series.
    pub fn next(&mut self) -> Result<Candle, ReplayError> {
        let index = self.initial_index + self.offset;
        let candle = self.base.get(index).map_err(|_| ReplayError::Exhausted {
            consumed: self.offset,
        })?;

        let published = if self.target == self.base.timeframe() {
            self.derived.append(candle)?;
            candle
        } else {
            let bucket_start = self.target.align(candle.open_time);
            match self.bucket.as_mut() {
                Some(bucket) if bucket.open_time() == bucket_start => {
                    bucket.merge(&candle);
                    let partial = bucket.candle();
                    self.derived.update_tail(partial)?;
                    partial
                }
                _ => {
                    debug!(%bucket_start, "replay opened a new bucket");
                    let bucket = BucketState::open(bucket_start, &candle);
                    let partial = bucket.candle();
                    self.derived.append(partial)?;
                    self.bucket = Some(bucket);
                    partial
                }
            }
        };
        self.offset += 1;
        Ok(published)
    }

    /// Convenience for tests and warm-up: run `next` until exhausted.
    pub fn run_to_end(&mut self) -> Result<(), ReplayError> {
        while !self.is_exhausted() {
            self.next()?;
        }
        Ok(())
    }

    /// The close of the current base candle — the authoritative "current
    /// price" at this point of the replay.
    pub fn current_price(&self) -> Option<Decimal> {
        let consumed = self.initial_index + self.offset;
        let index = consumed.checked_sub(1)?;
        self.base.get(index).ok().map(|c| c.close)
    }
}
