//! Average True Range: Wilder smoothing of the true range.
//!
//! Composition, not a formula of its own: `ATR(n) = MMA(TR, n)`. The cache
//! key is therefore the inner MMA's key — an `Atr` and a hand-built
//! `Mma::new(TrueRange, n)` are the same computation and share one slot.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::indicators::mma::Mma;
use crate::indicators::true_range::TrueRange;
use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::{CandleSeries, SeriesError};

#[derive(Clone)]
pub struct Atr {
    inner: Mma,
}

impl Atr {
    pub fn new(series: Arc<CandleSeries>, length: usize) -> Self {
        let tr = Arc::new(TrueRange::new(series));
        Self {
            inner: Mma::new(tr, length),
        }
    }
}

impl Indicator for Atr {
    fn series(&self) -> &Arc<CandleSeries> {
        self.inner.series()
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        self.inner.cache_key()
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        self.inner.get(index)
    }
}
