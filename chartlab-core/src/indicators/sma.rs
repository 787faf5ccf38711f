//! Simple Moving Average.
//!
//! Mean of `input[i-n+1 ..= i]`. Near the start of the series the window is
//! clipped to the candles that exist and the divisor shrinks with it:
//! `SMA(5)` at index 2 is the mean of three values, not five padded with
//! zeros.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::MathContext;
use crate::indicators::engine::{Cached, Calculation};
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::SeriesError;

#[derive(Clone)]
pub struct SmaCalc {
    input: Arc<dyn Indicator>,
    length: usize,
    ctx: MathContext,
}

impl Calculation for SmaCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let start = (index + 1).saturating_sub(self.length);
        let mut sum = Decimal::ZERO;
        for i in start..=index {
            sum += self.input.get(i)?;
        }
        let count = index - start + 1;
        Ok(self.ctx.div(sum, Decimal::from(count as u64)))
    }
}

pub type Sma = Cached<SmaCalc>;

impl Sma {
    pub fn new(input: Arc<dyn Indicator>, length: usize) -> Self {
        assert!(length >= 1, "SMA length must be >= 1");
        let series = input.series().clone();
        let ctx = series.math();
        let key = CacheKey::compose("sma", &[input.cache_key()], vec![length as i64]);
        Cached::with_key(series, key, SmaCalc { input, length, ctx })
    }
}
