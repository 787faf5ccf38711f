//! Timeframe — fixed bucket duration of a candle series.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candle bucket duration.
///
/// Open times of a series are aligned to multiples of its timeframe's
/// duration since the Unix epoch (which puts D1 buckets at UTC midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    pub const fn duration_secs(self) -> i64 {
        match self {
            Timeframe::M1 => 60,
            Timeframe::M5 => 300,
            Timeframe::M15 => 900,
            Timeframe::M30 => 1800,
            Timeframe::H1 => 3600,
            Timeframe::H4 => 14_400,
            Timeframe::D1 => 86_400,
        }
    }

    pub fn duration(self) -> chrono::Duration {
        chrono::Duration::seconds(self.duration_secs())
    }

    /// Floor an instant to the start of its enclosing bucket.
    pub fn align(self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let secs = instant.timestamp();
        let floored = secs - secs.rem_euclid(self.duration_secs());
        DateTime::from_timestamp(floored, 0).expect("bucket-floored timestamp is representable")
    }

    /// True if `instant` sits exactly on a bucket boundary of this timeframe.
    pub fn is_aligned(self, instant: DateTime<Utc>) -> bool {
        self.align(instant) == instant
    }

    /// True if every bucket of this timeframe is a whole number of `other`
    /// buckets, i.e. a series of `other` can be resampled into this one.
    pub fn is_multiple_of(self, other: Timeframe) -> bool {
        self.duration_secs() % other.duration_secs() == 0
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timeframe: {0}")]
pub struct TimeframeParseError(String);

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M1" => Ok(Timeframe::M1),
            "M5" => Ok(Timeframe::M5),
            "M15" => Ok(Timeframe::M15),
            "M30" => Ok(Timeframe::M30),
            "H1" => Ok(Timeframe::H1),
            "H4" => Ok(Timeframe::H4),
            "D1" => Ok(Timeframe::D1),
            other => Err(TimeframeParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn durations() {
        assert_eq!(Timeframe::M1.duration_secs(), 60);
        assert_eq!(Timeframe::M5.duration_secs(), 300);
        assert_eq!(Timeframe::D1.duration_secs(), 86_400);
    }

    #[test]
    fn align_floors_to_bucket_start() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 9, 33, 17).unwrap();
        assert_eq!(
            Timeframe::M5.align(t),
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap()
        );
        assert_eq!(
            Timeframe::H1.align(t),
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()
        );
        assert_eq!(
            Timeframe::D1.align(t),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn align_is_idempotent() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 9, 33, 17).unwrap();
        for tf in [Timeframe::M1, Timeframe::M15, Timeframe::H4, Timeframe::D1] {
            let aligned = tf.align(t);
            assert_eq!(tf.align(aligned), aligned);
            assert!(tf.is_aligned(aligned));
        }
    }

    #[test]
    fn alignment_check() {
        let on = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        let off = Utc.with_ymd_and_hms(2024, 1, 2, 9, 31, 0).unwrap();
        assert!(Timeframe::M5.is_aligned(on));
        assert!(!Timeframe::M5.is_aligned(off));
        assert!(Timeframe::M1.is_aligned(off));
    }

    #[test]
    fn resample_compatibility() {
        assert!(Timeframe::M5.is_multiple_of(Timeframe::M1));
        assert!(Timeframe::D1.is_multiple_of(Timeframe::H4));
        assert!(!Timeframe::M1.is_multiple_of(Timeframe::M5));
        assert!(Timeframe::H4.is_multiple_of(Timeframe::M30));
    }

    #[test]
    fn parse_roundtrip() {
        for tf in [
            Timeframe::M1,
            Timeframe::M5,
            Timeframe::M15,
            Timeframe::M30,
            Timeframe::H1,
            Timeframe::H4,
            Timeframe::D1,
        ] {
            assert_eq!(tf.to_string().parse::<Timeframe>().unwrap(), tf);
        }
        assert!("M2".parse::<Timeframe>().is_err());
    }
}
