//! Volume-Weighted Average Price, session-scoped.
//!
//! `VWAP[i] = Σ(typical × volume) / Σ(volume)`, both sums running since the
//! start of the current session. A zero cumulative volume yields 0 by
//! contract (an empty or volumeless session has no meaningful price).

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::MathContext;
use crate::indicators::cumulative::SessionCumulative;
use crate::indicators::engine::{Cached, Calculation};
use crate::indicators::money_flow::RawMoneyFlow;
use crate::indicators::price::Volume;
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::{CandleSeries, SeriesError, SessionChecker};

#[derive(Clone)]
pub struct VwapCalc {
    price_volume_sum: SessionCumulative,
    volume_sum: SessionCumulative,
    ctx: MathContext,
}

impl Calculation for VwapCalc {
    fn calculate(&self, index: usize) -> Result<Decimal, SeriesError> {
        let volume = self.volume_sum.get(index)?;
        if volume.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let price_volume = self.price_volume_sum.get(index)?;
        Ok(self.ctx.div(price_volume, volume))
    }
}

pub type Vwap = Cached<VwapCalc>;

impl Vwap {
    pub fn new(series: Arc<CandleSeries>, checker: Arc<dyn SessionChecker>) -> Self {
        let ctx = series.math();
        let price_volume_sum = SessionCumulative::new(
            Arc::new(RawMoneyFlow::new(series.clone())),
            checker.clone(),
        );
        let volume_sum = SessionCumulative::new(Arc::new(Volume::new(series.clone())), checker);
        let key = CacheKey::compose(
            "vwap",
            &[price_volume_sum.cache_key(), volume_sum.cache_key()],
            vec![],
        );
        Cached::with_key(
            series,
            key,
            VwapCalc {
                price_volume_sum,
                volume_sum,
                ctx,
            },
        )
    }
}
