use std::{fmt, str::FromStr};

use thiserror::Error;

/// Best lap duration in nanoseconds. Zero means "no valid lap", which is
/// also what negative or garbage upstream values decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LapTime(u64);

pub const PLACEHOLDER: &str = "--";

impl LapTime {
    pub fn from_nanos(ns: u64) -> Self {
        Self(ns)
    }

    pub fn from_millis(ms: u64) -> Self {
        Self(ms * 1_000_000)
    }

    pub fn as_nanos(self) -> u64 {
        self.0
    }

    /// A lap counts only when strictly positive.
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }

    /// Renders `M:SS.mmm` (minutes unbounded), or `--` for an invalid lap.
    /// Sub-millisecond precision is truncated.
    pub fn format(self) -> String {
        if !self.is_valid() {
            return PLACEHOLDER.to_string();
        }

        let ms = self.0 / 1_000_000;
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{minutes}:{seconds:02}.{millis:03}")
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseLapError {
    #[error("expected M:SS.mmm, got {0:?}")]
    Malformed(String),

    #[error("seconds out of range: {0}")]
    SecondsOutOfRange(u64),
}

/// Inverse of [`LapTime::format`]. Round-trips losslessly for any lap with
/// millisecond granularity; the `--` placeholder parses to the invalid lap.
impl FromStr for LapTime {
    type Err = ParseLapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s == PLACEHOLDER {
            return Ok(Self(0));
        }

        let malformed = || ParseLapError::Malformed(s.to_string());

        let (minutes, rest) = s.split_once(':').ok_or_else(malformed)?;
        let (seconds, millis) = rest.split_once('.').ok_or_else(malformed)?;

        if minutes.is_empty() || seconds.len() != 2 || millis.len() != 3 {
            return Err(malformed());
        }

        let minutes: u64 = minutes.parse().map_err(|_| malformed())?;
        let seconds: u64 = seconds.parse().map_err(|_| malformed())?;
        let millis: u64 = millis.parse().map_err(|_| malformed())?;

        if seconds >= 60 {
            return Err(ParseLapError::SecondsOutOfRange(seconds));
        }

        // an adversarial minutes field can overflow the nanosecond range
        let ns = minutes
            .checked_mul(60_000)
            .and_then(|ms| ms.checked_add(seconds * 1_000 + millis))
            .and_then(|ms| ms.checked_mul(1_000_000))
            .ok_or_else(malformed)?;

        Ok(Self(ns))
    }
}

impl fmt::Display for LapTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::{LapTime, ParseLapError, PLACEHOLDER};

    #[test]
    fn test_format_basic() {
        assert_eq!(LapTime::from_millis(75_123).format(), "1:15.123");
        assert_eq!(LapTime::from_millis(70_500).format(), "1:10.500");
        assert_eq!(LapTime::from_millis(605_000).format(), "10:05.000");
    }

    #[test]
    fn test_format_padding() {
        assert_eq!(LapTime::from_millis(60_001).format(), "1:00.001");
        assert_eq!(LapTime::from_millis(59_999).format(), "0:59.999");
        assert_eq!(LapTime::from_millis(1).format(), "0:00.001");
    }

    #[test]
    fn test_format_invalid() {
        assert_eq!(LapTime::from_nanos(0).format(), PLACEHOLDER);
    }

    #[test]
    fn test_format_truncates_sub_millisecond() {
        assert_eq!(LapTime::from_nanos(75_123_999_999).format(), "1:15.123");
    }

    #[test]
    fn test_parse() {
        assert_eq!("1:15.123".parse(), Ok(LapTime::from_millis(75_123)));
        assert_eq!("10:05.000".parse(), Ok(LapTime::from_millis(605_000)));
        assert_eq!("0:00.001".parse(), Ok(LapTime::from_millis(1)));
        assert_eq!("--".parse(), Ok(LapTime::from_nanos(0)));
    }

    #[test]
    fn test_round_trip() {
        for ms in [1u64, 999, 1_000, 59_999, 60_000, 75_123, 605_000, 3_600_000, 36_000_000] {
            let lap = LapTime::from_millis(ms);
            let parsed: LapTime = lap.format().parse().unwrap();
            assert_eq!(parsed, lap);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in ["", "1:15", "1.15.123", "abc", "1:5.123", "1:15.12", "-1:15.123"] {
            assert!(matches!(s.parse::<LapTime>(), Err(ParseLapError::Malformed(_))), "{s:?}");
        }
        assert_eq!(
            "1:75.000".parse::<LapTime>(),
            Err(ParseLapError::SecondsOutOfRange(75))
        );
    }

    #[test]
    fn test_parse_rejects_overflowing_minutes() {
        for s in [
            "99999999999999999:00.000",
            "18446744073709551615:59.999",
            "307445735:00.000",
        ] {
            assert!(matches!(s.parse::<LapTime>(), Err(ParseLapError::Malformed(_))), "{s:?}");
        }

        // largest whole-minute count that still fits in u64 nanoseconds
        assert!("307445734:00.000".parse::<LapTime>().is_ok());
    }

    #[test]
    fn test_numeric_order_not_string_order() {
        let short = LapTime::from_millis(70_000);
        let long = LapTime::from_millis(605_000);

        assert!(short < long);
        // lexicographic comparison of the formatted strings gets this wrong
        assert!(short.format() > long.format());
    }
}
