//! Candle storage: the series container, its memoization store, and
//! session boundary classification.

pub mod cache;
pub mod candle_series;
pub mod session;

pub use cache::CacheKey;
pub use candle_series::{CandleSeries, SeriesError, SubrangeIter};
pub use session::{DailySession, FixedLengthSession, SessionChecker};
