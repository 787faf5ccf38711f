//! True Range.
//!
//! `TR[i] = max(high[i] - low[i], |high[i] - close[i-1]|, |close[i-1] - low[i]|)`.
//! At index 0 the two terms involving the previous close are taken as 0.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::indicators::engine::{Cached, Calculation};
use crate::series::cache::CacheKey;
use crate::series::{CandleSeries, SeriesError};

#[derive(Clone)]
pub struct TrueRangeCalc {
    series: Arc<CandleSeries>,
}

impl Calculation for TrueRangeCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let candle = self.series.get(index)?;
        let range = candle.high - candle.low;
        let (high_close, close_low) = if index == 0 {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            let prev_close = self.series.get(index - 1)?.close;
            ((candle.high - prev_close).abs(), (prev_close - candle.low).abs())
        };
        Ok(range.max(high_close).max(close_low))
    }
}

pub type TrueRange = Cached<TrueRangeCalc>;

impl TrueRange {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        let calc = TrueRangeCalc {
            series: series.clone(),
        };
        Cached::with_key(series, Some(CacheKey::leaf("tr")), calc)
    }
}
