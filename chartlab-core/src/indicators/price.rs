//! Primitive projections of the raw candle data.
//!
//! These are the leaves of every indicator graph. Each carries a leaf
//! `CacheKey` so composites built on it are structurally addressable, but
//! none is memoized itself — the computation *is* the field read.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::indicators::Indicator;
use crate::series::cache::CacheKey;
use crate::series::{CandleSeries, SeriesError};

/// Close price of each candle.
#[derive(Clone)]
pub struct ClosePrice {
    series: Arc<CandleSeries>,
    key: CacheKey,
}

impl ClosePrice {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        Self {
            series,
            key: CacheKey::leaf("price/close"),
        }
    }
}

impl Indicator for ClosePrice {
    fn series(&self) -> &Arc<CandleSeries> {
        &self.series
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        Some(&self.key)
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        Ok(self.series.get(index)?.close)
    }
}

/// Open price of each candle.
#[derive(Clone)]
pub struct OpenPrice {
    series: Arc<CandleSeries>,
    key: CacheKey,
}

impl OpenPrice {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        Self {
            series,
            key: CacheKey::leaf("price/open"),
        }
    }
}

impl Indicator for OpenPrice {
    fn series(&self) -> &Arc<CandleSeries> {
        &self.series
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        Some(&self.key)
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        Ok(self.series.get(index)?.open)
    }
}

/// High price of each candle.
#[derive(Clone)]
pub struct HighPrice {
    series: Arc<CandleSeries>,
    key: CacheKey,
}

impl HighPrice {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        Self {
            series,
            key: CacheKey::leaf("price/high"),
        }
    }
}

impl Indicator for HighPrice {
    fn series(&self) -> &Arc<CandleSeries> {
        &self.series
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        Some(&self.key)
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        Ok(self.series.get(index)?.high)
    }
}

/// Low price of each candle.
#[derive(Clone)]
pub struct LowPrice {
    series: Arc<CandleSeries>,
    key: CacheKey,
}

impl LowPrice {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        Self {
            series,
            key: CacheKey::leaf("price/low"),
        }
    }
}

impl Indicator for LowPrice {
    fn series(&self) -> &Arc<CandleSeries> {
        &self.series
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        Some(&self.key)
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        Ok(self.series.get(index)?.low)
    }
}

/// Traded volume of each candle.
#[derive(Clone)]
pub struct Volume {
    series: Arc<CandleSeries>,
    key: CacheKey,
}

impl Volume {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        Self {
            series,
            key: CacheKey::leaf("price/volume"),
        }
    }
}

impl Indicator for Volume {
    fn series(&self) -> &Arc<CandleSeries> {
        &self.series
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        Some(&self.key)
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        Ok(Decimal::from(self.series.get(index)?.volume))
    }
}

/// Typical price `(high + low + close) / 3`, rounded by the series context.
#[derive(Clone)]
pub struct TypicalPrice {
    series: Arc<CandleSeries>,
    key: CacheKey,
}

impl TypicalPrice {
    pub fn new(series: Arc<CandleSeries>) -> Self {
        Self {
            series,
            key: CacheKey::leaf("price/typical"),
        }
    }
}

impl Indicator for TypicalPrice {
    fn series(&self) -> &Arc<CandleSeries> {
        &self.series
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        Some(&self.key)
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        let ctx = self.series.math();
        Ok(self.series.get(index)?.typical_price(&ctx))
    }
}

/// Fixed value at every index.
///
/// Intentionally never memoized: `cache_key` is `None`, and any composite
/// embedding a `Constant` input is itself unkeyed and unmemoized.
#[derive(Clone)]
pub struct Constant {
    series: Arc<CandleSeries>,
    value: Decimal,
}

impl Constant {
    pub fn new(series: Arc<CandleSeries>, value: Decimal) -> Self {
        Self { series, value }
    }
}

impl Indicator for Constant {
    fn series(&self) -> &Arc<CandleSeries> {
        &self.series
    }

    fn cache_key(&self) -> Option<&CacheKey> {
        None
    }

    fn get(&self, index: usize) -> Result<Decimal, SeriesError> {
        self.series.check_index(index)?;
        Ok(self.value)
    }
}
