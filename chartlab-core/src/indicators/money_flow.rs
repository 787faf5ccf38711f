//! Money flow family: raw/positive/negative money flow and the Money Flow
//! Index.
//!
//! Raw money flow is `typical price × volume`. A candle's flow counts as
//! positive when its typical price rose against the previous candle's,
//! negative when it fell, and neither when unchanged — or at index 0, where
//! there is no previous typical price.
//!
//! `MFI = 100 - 100 / (1 + Σpos / Σneg)` over a clipped window of `n`
//! candles, with the same guarded edges as the RSI: no negative flow and no
//! positive flow → 0, no negative flow with positive flow present → 100.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::MathContext;
use crate::indicators::cumulative::Cumulative;
use crate::indicators::engine::{Cached, Calculation};
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::{CandleSeries, SeriesError};

/// Flow of `index` if its typical price moved in the wanted direction, else 0.
fn directional_flow(
    series: &CandleSeries,
    index: usize,
    positive: bool,
) -> Result<Decimal, SeriesError> {
    if index == 0 {
        return Ok(Decimal::ZERO);
    }
    let ctx = series.math();
    let current = series.get(index)?;
    let previous = series.get(index - 1)?;
    let typical = current.typical_price(&ctx);
    let prev_typical = previous.typical_price(&ctx);
    let counts = if positive {
        typical > prev_typical
    } else {
        typical < prev_typical
    };
    if counts {
        Ok(ctx.mul(typical, Decimal::from(current.volume)))
    } else {
        Ok(Decimal::ZERO)
    }
}

#[derive(Clone)]
pub struct RawMoneyFlowCalc {
    series: Arc<CandleSeries>,
}

impl Calculation for RawMoneyFlowCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let ctx = self.series.math();
        let candle = self.series.get(index)?;
        Ok(ctx.mul(candle.typical_price(&ctx), Decimal::from(candle.volume)))
    }
}

/// `typical price × volume` of each candle.
pub type RawMoneyFlow = Cached<RawMoneyFlowCalc>;

impl RawMoneyFlow {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        let calc = RawMoneyFlowCalc {
            series: series.clone(),
        };
        Cached::with_key(series, Some(CacheKey::leaf("flow/raw")), calc)
    }
}

#[derive(Clone)]
pub struct PositiveMoneyFlowCalc {
    series: Arc<CandleSeries>,
}

impl Calculation for PositiveMoneyFlowCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        directional_flow(&self.series, index, true)
    }
}

/// Raw money flow of candles whose typical price rose, else 0.
pub type PositiveMoneyFlow = Cached<PositiveMoneyFlowCalc>;

impl PositiveMoneyFlow {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        let calc = PositiveMoneyFlowCalc {
            series: series.clone(),
        };
        Cached::with_key(series, Some(CacheKey::leaf("flow/positive")), calc)
    }
}

#[derive(Clone)]
pub struct NegativeMoneyFlowCalc {
    series: Arc<CandleSeries>,
}

impl Calculation for NegativeMoneyFlowCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        directional_flow(&self.series, index, false)
    }
}

/// Raw money flow of candles whose typical price fell, else 0.
pub type NegativeMoneyFlow = Cached<NegativeMoneyFlowCalc>;

impl NegativeMoneyFlow {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        let calc = NegativeMoneyFlowCalc {
            series: series.clone(),
        };
        Cached::with_key(series, Some(CacheKey::leaf("flow/negative")), calc)
    }
}

#[derive(Clone)]
pub struct MfiCalc {
    positive_sum: Cumulative,
    negative_sum: Cumulative,
    ctx: MathContext,
}

impl Calculation for MfiCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let positive = self.positive_sum.get(index)?;
        let negative = self.negative_sum.get(index)?;
        if negative.is_zero() {
            return Ok(if positive.is_zero() {
                Decimal::ZERO
            } else {
                Decimal::ONE_HUNDRED
            });
        }
        let ratio = self.ctx.div(positive, negative);
        Ok(Decimal::ONE_HUNDRED - self.ctx.div(Decimal::ONE_HUNDRED, Decimal::ONE + ratio))
    }
}

pub type Mfi = Cached<MfiCalc>;

impl Mfi {
    pub fn new(series: Arc<CandleSeries>, length: usize) -> Self {
        assert!(length >= 1, "MFI length must be >= 1");
        let ctx = series.math();
        let positive_sum =
            Cumulative::new(Arc::new(PositiveMoneyFlow::new(series.clone())), length);
        let negative_sum =
            Cumulative::new(Arc::new(NegativeMoneyFlow::new(series.clone())), length);
        let key = CacheKey::compose(
            "mfi",
            &[positive_sum.cache_key(), negative_sum.cache_key()],
            vec![],
        );
        Cached::with_key(
            series,
            key,
            MfiCalc {
                positive_sum,
                negative_sum,
                ctx,
            },
        )
    }
}
