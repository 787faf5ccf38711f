//! Indicator engine and catalog.
//!
//! Indicators are pull-based: `get(index)` computes (or recalls) the value
//! at one candle index, reading inputs lazily. Memoization is structural —
//! results live in the owning series' cache store under a `CacheKey`, so
//! independently built but logically identical indicator graphs share work.
//!
//! The catalog types are thin compositions over the two evaluator
//! strategies in [`engine`]: `Cached` for formulas that only look backward
//! or sideways, `Recursive` for formulas defined in terms of their own
//! previous value (the EMA/MMA family).

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::series::cache::CacheKey;
use crate::series::{CandleSeries, SeriesError};

pub mod atr;
pub mod cumulative;
pub mod ema;
pub mod engine;
pub mod extrema;
pub mod gain_loss;
pub mod mma;
pub mod momentum;
pub mod money_flow;
pub mod price;
pub mod rsi;
pub mod sma;
pub mod true_range;
pub mod vwap;

pub use atr::Atr;
pub use cumulative::{Cumulative, SessionCumulative};
pub use ema::Ema;
pub use engine::{Cached, Calculation, Recursive, RecursiveCalculation};
pub use extrema::{Highest, Lowest};
pub use gain_loss::{Gain, Loss};
pub use mma::Mma;
pub use momentum::Momentum;
pub use money_flow::{Mfi, NegativeMoneyFlow, PositiveMoneyFlow, RawMoneyFlow};
pub use price::{Constant, ClosePrice, HighPrice, LowPrice, OpenPrice, TypicalPrice, Volume};
pub use rsi::Rsi;
pub use sma::Sma;
pub use true_range::TrueRange;
pub use vwap::Vwap;

/// Capability contract of every indicator.
///
/// `get(index)` performs a bounded amount of CPU-only work and fails fast
/// with `IndexOutOfRange` outside `[0, last_index]` of the underlying
/// series. The guarded zero-division cases of the catalog (RSI, MFI, VWAP)
/// are ordinary `Ok` values per their documented contract, never errors.
///
/// `cache_key()` is `None` only for indicators that are intentionally never
/// memoized (e.g. [`Constant`]); a composite built on an unkeyed input is
/// itself unkeyed and unmemoized.
pub trait Indicator: Send + Sync {
    /// The series this indicator reads from and caches into.
    fn series(&self) -> &Arc<CandleSeries>;

    /// Structural identity for memoization, if any.
    fn cache_key(&self) -> Option<&CacheKey>;

    /// Value at `index`.
    fn get(&self, index: usize) -> Result<Decimal, SeriesError>;
}
