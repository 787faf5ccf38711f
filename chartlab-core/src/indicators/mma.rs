//! Modified (Wilder) Moving Average.
//!
//! Same recursion as the EMA with `m = 1 / length`; the smoothing used by
//! ATR, RSI and the rest of the Wilder family. Base case `MMA[0] = input[0]`.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::MathContext;
use crate::indicators::engine::{Recursive, RecursiveCalculation};
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::SeriesError;

#[derive(Clone)]
pub struct MmaCalc {
    input: Arc<dyn Indicator>,
    multiplier: Decimal,
    ctx: MathContext,
}

impl RecursiveCalculation for MmaCalc {
    fn seed(&self) -> Result<Decimal, SeriesError> {
        self.input.get(0)
    }

    fn step(&self, prev: Decimal, index: usize) -> Result<Decimal, SeriesError> {
        let value = self.input.get(index)?;
        Ok(prev + self.ctx.mul(self.multiplier, value - prev))
    }
}

pub type Mma = Recursive<MmaCalc>;

impl Mma {
    pub fn new(input: Arc<dyn Indicator>, length: usize) -> Self {
        assert!(length >= 1, "MMA length must be >= 1");
        let series = input.series().clone();
        let ctx = series.math();
        let key = CacheKey::compose("mma", &[input.cache_key()], vec![length as i64]);
        let multiplier = ctx.div(Decimal::ONE, Decimal::from(length as u64));
        Recursive::with_key(
            series,
            key,
            MmaCalc {
                input,
                multiplier,
                ctx,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::testing::make_series;
    use crate::indicators::ClosePrice;
    use rust_decimal_macros::dec;

    #[test]
    fn mma_4_known_values() {
        // m = 1/4 = 0.25, MMA[0] = 10
        // MMA[1] = 10 + 0.25*(14-10) = 11
        // MMA[2] = 11 + 0.25*(15-11) = 12
        let series = make_series(&[dec!(10), dec!(14), dec!(15)]);
        let mma = Mma::new(Arc::new(ClosePrice::new(series)), 4);
        assert_eq!(mma.get(0).unwrap(), dec!(10));
        assert_eq!(mma.get(1).unwrap(), dec!(11));
        assert_eq!(mma.get(2).unwrap(), dec!(12));
    }

    #[test]
    fn mma_and_ema_keys_differ_for_same_parameters() {
        use crate::indicators::Ema;
        let series = make_series(&[dec!(1), dec!(2)]);
        let mma = Mma::new(Arc::new(ClosePrice::new(series.clone())), 14);
        let ema = Ema::new(Arc::new(ClosePrice::new(series)), 14);
        assert_ne!(mma.cache_key(), ema.cache_key());
    }

    #[test]
    fn mma_smooths_more_slowly_than_ema_of_same_length() {
        use crate::indicators::Ema;
        let closes = [dec!(10), dec!(10), dec!(10), dec!(20)];
        let series = make_series(&closes);
        let mma = Mma::new(Arc::new(ClosePrice::new(series.clone())), 4);
        let ema = Ema::new(Arc::new(ClosePrice::new(series)), 4);
        // A jump at the tail moves the Wilder average by 1/4 of the gap but
        // the EMA by 2/5 of it.
        assert!(mma.get(3).unwrap() < ema.get(3).unwrap());
    }
}
