//! Candle aggregation across timeframes.
//!
//! A higher-timeframe bucket aggregates every base candle whose open time
//! falls inside it: `open` is the first candle's open, `high`/`low` the
//! running extrema, `close` the latest close, and `volume` the sum of the
//! member volumes — a bucket's volume is the total traded across its base
//! candles, matching what a broker feed reports for the coarse timeframe.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Candle, Timeframe};
use crate::series::CandleSeries;

/// Accumulator for one in-progress higher-timeframe bucket.
#[derive(Debug, Clone)]
pub(crate) struct BucketState {
    open_time: DateTime<Utc>,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: u64,
}

impl BucketState {
    /// Open a bucket at `bucket_start` from its first base candle.
    pub(crate) fn open(bucket_start: DateTime<Utc>, first: &Candle) -> Self {
        Self {
            open_time: bucket_start,
            open: first.open,
            high: first.high,
            low: first.low,
            close: first.close,
            volume: first.volume,
        }
    }

    /// Fold the next base candle of the same bucket into the accumulator.
    pub(crate) fn merge(&mut self, candle: &Candle) {
        self.high = self.high.max(candle.high);
        self.low = self.low.min(candle.low);
        self.close = candle.close;
        self.volume += candle.volume;
    }

    pub(crate) fn open_time(&self) -> DateTime<Utc> {
        self.open_time
    }

    /// The (possibly partial) candle this bucket currently describes.
    pub(crate) fn candle(&self) -> Candle {
        Candle {
            open_time: self.open_time,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

/// Batch-resample a whole series into `target`-timeframe candles.
///
/// The non-replay variant used for static history: every bucket covered by
/// the base series is emitted, the last one possibly built from fewer base
/// candles if the series ends mid-bucket. Gaps in the base series simply
/// produce buckets with fewer members; fully absent buckets are absent from
/// the output too.
///
/// Panics if `target` is not a whole multiple of the base timeframe.
pub fn resample_closed(base: &CandleSeries, target: Timeframe) -> Vec<Candle> {
    assert!(
        target.is_multiple_of(base.timeframe()),
        "cannot resample {} into {}",
        base.timeframe(),
        target,
    );

    let mut out = Vec::new();
    let mut bucket: Option<BucketState> = None;
    let last = match base.last_index() {
        Some(last) => last,
        None => return out,
    };
    for candle in base.subrange(0, last) {
        let bucket_start = target.align(candle.open_time);
        match bucket.as_mut() {
            Some(b) if b.open_time() == bucket_start => b.merge(&candle),
            _ => {
                if let Some(b) = bucket.take() {
                    out.push(b.candle());
                }
                bucket = Some(BucketState::open(bucket_start, &candle));
            }
        }
    }
    if let Some(b) = bucket {
        out.push(b.candle());
    }
    out
}
