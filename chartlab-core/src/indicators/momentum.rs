//! Momentum — lookback difference, not percentage.
//!
//! `momentum[i] = input[i] - input[i - n]`, with the lookback clipped to
//! index 0 near the start of the series.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::indicators::engine::{Cached, Calculation};
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::SeriesError;

#[derive(Clone)]
pub struct MomentumCalc {
    input: Arc<dyn Indicator>,
    length: usize,
}

impl Calculation for MomentumCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let back = index.saturating_sub(self.length);
        Ok(self.input.get(index)? - self.input.get(back)?)
    }
}

pub type Momentum = Cached<MomentumCalc>;

impl Momentum {
    pub fn new(input: Arc<dyn Indicator>, length: usize) -> Self {
        assert!(length >= 1, "Momentum length must be >= 1");
        let series = input.series().clone();
        let key = CacheKey::compose("momentum", &[input.cache_key()], vec![length as i64]);
        Cached::with_key(series, key, MomentumCalc { input, length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::testing::make_series;
    use crate::indicators::ClosePrice;
    use rust_decimal_macros::dec;

    #[test]
    fn momentum_is_the_lookback_difference() {
        let series = make_series(&[dec!(100), dec!(110), dec!(105), dec!(115)]);
        let momentum = Momentum::new(Arc::new(ClosePrice::new(series)), 2);
        assert_eq!(momentum.get(2).unwrap(), dec!(5));
        assert_eq!(momentum.get(3).unwrap(), dec!(5));
    }

    #[test]
    fn lookback_clips_to_the_series_start() {
        let series = make_series(&[dec!(100), dec!(110)]);
        let momentum = Momentum::new(Arc::new(ClosePrice::new(series)), 5);
        assert_eq!(momentum.get(0).unwrap(), dec!(0));
        assert_eq!(momentum.get(1).unwrap(), dec!(10));
    }
}
