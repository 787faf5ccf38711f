//! ChartLab Core — candle series, indicator engine, resampling/replay.
//!
//! This crate contains the computation core of the charting application:
//! - Domain types (candles, timeframes, the decimal rounding policy)
//! - `CandleSeries`: time-indexed candle storage with a mutable live tail
//!   and a structurally-keyed memoization store
//! - Pull-based indicator engine (`Cached` / `Recursive` evaluators) and
//!   the indicator catalog built on it
//! - Resampling/replay engine deriving coarser-timeframe candle streams
//!
//! No UI, persistence, or strategy types live here; those collaborators
//! consume this crate through `CandleSeries`, `Indicator::get`, and
//! `ReplaySession`.

pub mod domain;
pub mod indicators;
pub mod replay;
pub mod series;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything shared across the feed and UI threads
    /// is Send + Sync. If any type fails this check, the build breaks
    /// immediately.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::Timeframe>();
        require_sync::<domain::Timeframe>();
        require_send::<domain::MathContext>();
        require_sync::<domain::MathContext>();

        // Series and cache
        require_send::<series::CandleSeries>();
        require_sync::<series::CandleSeries>();
        require_send::<series::CacheKey>();
        require_sync::<series::CacheKey>();
        require_send::<series::SeriesError>();
        require_sync::<series::SeriesError>();

        // Catalog indicators (trait objects must cross threads)
        require_send::<std::sync::Arc<dyn indicators::Indicator>>();
        require_sync::<std::sync::Arc<dyn indicators::Indicator>>();
        require_send::<indicators::Ema>();
        require_sync::<indicators::Ema>();
        require_send::<indicators::Atr>();
        require_sync::<indicators::Atr>();
        require_send::<indicators::Rsi>();
        require_sync::<indicators::Rsi>();
        require_send::<indicators::Vwap>();
        require_sync::<indicators::Vwap>();

        // Replay sessions move to a worker thread but are single-consumer.
        require_send::<replay::ReplaySession>();
        require_send::<replay::ReplayError>();
    }
}
