//! Integration tests for the resampling/replay engine.
//!
//! Tests:
//! 1. Bucket aggregation semantics (first open, max high, min low, last
//!    close, summed volume)
//! 2. Step-wise replay equals batch resampling once exhausted
//! 3. A partial bucket repaint drives the cache-invalidation path of
//!    indicators attached to the derived series

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use chartlab_core::domain::{Candle, MathContext, Timeframe};
use chartlab_core::indicators::{ClosePrice, Ema, Indicator, Sma};
use chartlab_core::replay::{resample_closed, ReplayError, ReplaySession};
use chartlab_core::series::CandleSeries;

fn open_time(i: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap() + chrono::Duration::minutes(i as i64)
}

fn series_from_rows(rows: &[(Decimal, Decimal, Decimal, Decimal, u64)]) -> Arc<CandleSeries> {
    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, &(open, high, low, close, volume))| Candle {
            open_time: open_time(i),
            open,
            high,
            low,
            close,
            volume,
        })
        .collect();
    Arc::new(
        CandleSeries::from_candles("TEST", Timeframe::M1, MathContext::default(), candles)
            .unwrap(),
    )
}

/// The canonical aggregation fixture: five one-minute candles with highs
/// [10, 12, 9, 15, 11] and lows [8, 7, 10, 9, 10].
fn aggregation_fixture() -> Arc<CandleSeries> {
    series_from_rows(&[
        (dec!(9), dec!(10), dec!(8), dec!(9), 100),
        (dec!(9), dec!(12), dec!(7), dec!(11), 150),
        (dec!(11), dec!(9), dec!(10), dec!(10), 200),
        (dec!(10), dec!(15), dec!(9), dec!(14), 250),
        (dec!(14), dec!(11), dec!(10), dec!(11), 300),
    ])
}

#[test]
fn five_minute_bucket_aggregates_all_five_base_candles() {
    let base = aggregation_fixture();
    let mut replay = ReplaySession::new(base.clone(), Timeframe::M5);
    let mut last = None;
    while !replay.is_exhausted() {
        last = Some(replay.next().unwrap());
    }

    let bucket = last.unwrap();
    assert_eq!(bucket.open, dec!(9)); // first candle's open
    assert_eq!(bucket.high, dec!(15));
    assert_eq!(bucket.low, dec!(7));
    assert_eq!(bucket.close, dec!(11)); // fifth candle's close
    assert_eq!(bucket.volume, 1000); // summed, not last-write-wins
    assert_eq!(bucket.open_time, open_time(0));
}

#[test]
fn replayed_derived_series_matches_batch_resampling() {
    let rows: Vec<_> = (0..13)
        .map(|i| {
            let p = Decimal::from(100 + (i * 7) % 23);
            (p, p + dec!(2), p - dec!(2), p + dec!(1), 10 + i as u64)
        })
        .collect();
    let base = series_from_rows(&rows);

    let mut replay = ReplaySession::new(base.clone(), Timeframe::M5);
    replay.run_to_end().unwrap();

    let batch = resample_closed(&base, Timeframe::M5);
    let derived = replay.derived_series();
    assert_eq!(derived.len(), batch.len());
    for (i, expected) in batch.iter().enumerate() {
        assert_eq!(derived.get(i).unwrap(), *expected, "bucket {i}");
    }
}

#[test]
fn indicators_on_the_derived_series_follow_partial_buckets() {
    let base = aggregation_fixture();
    let mut replay = ReplaySession::new(base, Timeframe::M5);

    let derived = replay.derived_series().clone();
    let sma = Sma::new(Arc::new(ClosePrice::new(derived.clone())), 3);
    let ema = Ema::new(Arc::new(ClosePrice::new(derived)), 3);

    // Step 1: bucket close is 9.
    replay.next().unwrap();
    assert_eq!(sma.get(0).unwrap(), dec!(9));
    assert_eq!(ema.get(0).unwrap(), dec!(9));

    // Step 2 repaints the same bucket: close moves to 11 and both cached
    // values at the tail index are stale-evicted and recomputed.
    replay.next().unwrap();
    assert_eq!(sma.get(0).unwrap(), dec!(11));
    assert_eq!(ema.get(0).unwrap(), dec!(11));

    // Remaining steps: the bucket closes at 11 either way.
    replay.run_to_end().unwrap();
    assert_eq!(sma.get(0).unwrap(), dec!(11));
}

#[test]
fn same_timeframe_replay_republishes_base_candles() {
    let base = aggregation_fixture();
    let mut replay = ReplaySession::new(base.clone(), Timeframe::M1);
    for i in 0..base.len() {
        assert_eq!(replay.next().unwrap(), base.get(i).unwrap());
    }
    assert!(matches!(
        replay.next(),
        Err(ReplayError::Exhausted { consumed: 5 })
    ));
}

#[test]
fn reset_restarts_cleanly_after_exhaustion() {
    let base = aggregation_fixture();
    let mut replay = ReplaySession::new(base, Timeframe::M5);
    replay.run_to_end().unwrap();
    assert!(replay.next().is_err());

    replay.reset();
    assert_eq!(replay.offset(), 0);
    assert!(replay.current_candle().is_none());

    // A full second pass produces the same closed bucket.
    replay.run_to_end().unwrap();
    let bucket = replay.current_candle().unwrap();
    assert_eq!(bucket.high, dec!(15));
    assert_eq!(bucket.low, dec!(7));
    assert_eq!(bucket.volume, 1000);
}

#[test]
fn gap_in_the_base_skips_buckets_without_zero_filling() {
    // Candles at 09:00 and 09:11 only: two buckets, none in between.
    let series = Arc::new(CandleSeries::new(
        "TEST",
        Timeframe::M1,
        MathContext::default(),
    ));
    let mk = |i: usize, close: Decimal| Candle {
        open_time: open_time(i),
        open: close,
        high: close + dec!(1),
        low: close - dec!(1),
        close,
        volume: 10,
    };
    series.append(mk(0, dec!(100))).unwrap();
    series.append(mk(11, dec!(200))).unwrap();

    let buckets = resample_closed(&series, Timeframe::M5);
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].open_time, open_time(0));
    assert_eq!(buckets[1].open_time, open_time(10)); // 09:10 bucket start
    assert_eq!(buckets[1].close, dec!(200));
}
