//! Domain types: candles, timeframes, the decimal rounding policy.

pub mod candle;
pub mod math;
pub mod timeframe;

pub use candle::Candle;
pub use math::MathContext;
pub use timeframe::{Timeframe, TimeframeParseError};
