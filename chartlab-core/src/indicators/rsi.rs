//! Relative Strength Index.
//!
//! `RSI = 100 - 100 / (1 + RS)` with `RS = MMA(Gain, n) / MMA(Loss, n)`.
//! Guarded edges: average loss 0 and average gain 0 → 0; average loss 0
//! with positive average gain → 100. Both are documented contract values,
//! not errors.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::MathContext;
use crate::indicators::engine::{Cached, Calculation};
use crate::indicators::gain_loss::{Gain, Loss};
use crate::indicators::mma::Mma;
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::SeriesError;

#[derive(Clone)]
pub struct RsiCalc {
    avg_gain: Mma,
    avg_loss: Mma,
    ctx: MathContext,
}

impl Calculation for RsiCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let gain = self.avg_gain.get(index)?;
        let loss = self.avg_loss.get(index)?;
        if loss.is_zero() {
            return Ok(if gain.is_zero() {
                Decimal::ZERO
            } else {
                Decimal::ONE_HUNDRED
            });
        }
        let rs = self.ctx.div(gain, loss);
        Ok(Decimal::ONE_HUNDRED - self.ctx.div(Decimal::ONE_HUNDRED, Decimal::ONE + rs))
    }
}

pub type Rsi = Cached<RsiCalc>;

impl Rsi {
    pub fn new(input: Arc<dyn Indicator>, length: usize) -> Self {
        assert!(length >= 1, "RSI length must be >= 1");
        let series = input.series().clone();
        let ctx = series.math();
        let avg_gain = Mma::new(Arc::new(Gain::new(input.clone())), length);
        let avg_loss = Mma::new(Arc::new(Loss::new(input)), length);
        let key = CacheKey::compose(
            "rsi",
            &[avg_gain.cache_key(), avg_loss.cache_key()],
            vec![],
        );
        Cached::with_key(
            series,
            key,
            RsiCalc {
                avg_gain,
                avg_loss,
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

    fn rsi_of_closes(closes: &[Decimal], length: usize) -> Rsi {
        let series = make_series(closes);
        Rsi::new(Arc::new(ClosePrice::new(series)), length)
    }

    #[test]
    fn all_rising_closes_pin_rsi_at_100() {
        let closes: Vec<Decimal> = (0..15).map(|i| Decimal::from(100 + i)).collect();
        let rsi = rsi_of_closes(&closes, 14);
        assert_eq!(rsi.get(14).unwrap(), dec!(100));
    }

    #[test]
    fn all_flat_closes_pin_rsi_at_0() {
        let rsi = rsi_of_closes(&[dec!(100); 15], 14);
        assert_eq!(rsi.get(14).unwrap(), dec!(0));
    }

    #[test]
    fn all_falling_closes_pin_rsi_at_0() {
        let closes: Vec<Decimal> = (0..15).map(|i| Decimal::from(200 - i)).collect();
        let rsi = rsi_of_closes(&closes, 14);
        assert_eq!(rsi.get(14).unwrap(), dec!(0));
    }

    #[test]
    fn index_zero_has_no_movement() {
        let rsi = rsi_of_closes(&[dec!(100), dec!(101)], 14);
        assert_eq!(rsi.get(0).unwrap(), dec!(0));
    }

    #[test]
    fn mixed_series_stays_inside_bounds() {
        let rsi = rsi_of_closes(
            &[
                dec!(100),
                dec!(105),
                dec!(98),
                dec!(110),
                dec!(95),
                dec!(115),
                dec!(90),
            ],
            3,
        );
        // From index 2 on both average gain and average loss are positive.
        for i in 2..7 {
            let v = rsi.get(i).unwrap();
            assert!(
                v > dec!(0) && v < dec!(100),
                "RSI out of bounds at index {i}: {v}"
            );
        }
    }

    #[test]
    fn known_value() {
        // Closes 44, 44.34, 44.09: gains (0, 0.34, 0), losses (0, 0, 0.25).
        // MMA(gain,2)[2] = (0 + 0.34/2)/... walk: g[0]=0, g[1]=0.34, g[2]=0
        //   avg_gain[1] = 0 + (0.34-0)/2 = 0.17; avg_gain[2] = 0.17 - 0.17/2 = 0.085
        //   avg_loss[1] = 0;                 avg_loss[2] = 0 + 0.25/2 = 0.125
        // RS = 0.085/0.125 = 0.68; RSI = 100 - 100/1.68
        let rsi = rsi_of_closes(&[dec!(44), dec!(44.34), dec!(44.09)], 2);
        assert_eq!(rsi.get(2).unwrap(), dec!(40.476190476190));
    }
}
