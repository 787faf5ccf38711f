//! Per-index gains and losses of an input series.
//!
//! `Gain[i] = max(0, input[i] - input[i-1])`,
//! `Loss[i] = max(0, input[i-1] - input[i])`, both 0 at index 0.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::indicators::engine::{Cached, Calculation};
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::SeriesError;

#[derive(Clone)]
pub struct GainCalc {
    input: Arc<dyn Indicator>,
}

impl Calculation for GainCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        if index == 0 {
            return Ok(Decimal::ZERO);
        }
        let diff = self.input.get(index)? - self.input.get(index - 1)?;
        Ok(diff.max(Decimal::ZERO))
    }
}

pub type Gain = Cached<GainCalc>;

impl Gain {
    pub fn new(input: Arc<dyn Indicator>) -> Self {
        let series = input.series().clone();
        let key = CacheKey::compose("gain", &[input.cache_key()], vec![]);
        Cached::with_key(series, key, GainCalc { input })
    }
}

#[derive(Clone)]
pub struct LossCalc {
    input: Arc<dyn Indicator>,
}

impl Calculation for LossCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        if index == 0 {
            return Ok(Decimal::ZERO);
        }
        let diff = self.input.get(index - 1)? - self.input.get(index)?;
        Ok(diff.max(Decimal::ZERO))
    }
}

pub type Loss = Cached<LossCalc>;

impl Loss {
    pub fn new(input: Arc<dyn Indicator>) -> Self {
        let series = input.series().clone();
        let key = CacheKey::compose("loss", &[input.cache_key()], vec![]);
        Cached::with_key(series, key, LossCalc { input })
    }
}
