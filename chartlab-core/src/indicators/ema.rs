//! Exponential Moving Average.
//!
//! Recursive: `EMA[i] = EMA[i-1] + m * (input[i] - EMA[i-1])` with
//! `m = 2 / (length + 1)` and base case `EMA[0] = input[0]`.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::MathContext;
use crate::indicators::engine::{Recursive, RecursiveCalculation};
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::SeriesError;

#[derive(Clone)]
pub struct EmaCalc {
    input: Arc<dyn Indicator>,
    multiplier: Decimal,
    ctx: MathContext,
}

impl RecursiveCalculation for EmaCalc {
    fn seed(&self) -> Result<Decimal, SeriesError> {
        self.input.get(0)
    }

    fn step(&self, prev: Decimal, index: usize) -> Result<Decimal, SeriesError> {
        let value = self.input.get(index)?;
        Ok(prev + self.ctx.mul(self.multiplier, value - prev))
    }
}

pub type Ema = Recursive<EmaCalc>;

impl Ema {
    pub fn new(input: Arc<dyn Indicator>, length: usize) -> Self {
        assert!(length >= 1, "EMA length must be >= 1");
        let series = input.series().clone();
        let ctx = series.math();
        let key = CacheKey::compose("ema", &[input.cache_key()], vec![length as i64]);
        let multiplier = ctx.div(Decimal::TWO, Decimal::from(length as u64 + 1));
        Recursive::with_key(
            series,
            key,
            EmaCalc {
                input,
                multiplier,
                ctx,
            },
        )
    }
}
