//! Candle — the fundamental market data unit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::math::MathContext;

/// One OHLCV price bar for a fixed time bucket.
///
/// `open_time` is the open time of the bucket, not the close time. A candle
/// is immutable once it sits at any position other than the tail of its
/// series; the tail candle of a live series is replaced wholesale via
/// `CandleSeries::update_tail` while its period is still in progress.
///
/// The usual invariant `low <= open, close <= high` is *not* enforced here.
/// Upstream feeds occasionally violate it and consumers are expected to
/// tolerate violations; `is_sane` exists as a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

impl Candle {
    /// Basic OHLC sanity check: high is the max and low is the min of the
    /// four prices.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    /// Typical price: `(high + low + close) / 3`, rounded by `ctx`.
    pub fn typical_price(&self, ctx: &MathContext) -> Decimal {
        ctx.div(self.high + self.low + self.close, Decimal::from(3))
    }
}
