//! Date handling for the climate routes: the trailing lookback window and
//! clamping of user-supplied ranges to the dataset's bounds.

use chrono::{Days, NaiveDate};
use thiserror::Error;

/// Length of the trailing window used by `/precipitation` and `/tobs`.
pub const LOOKBACK_DAYS: u64 = 365;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{value}` is not a YYYY-MM-DD date")]
pub struct InvalidDate {
    pub value: String,
}

/// Parse a zero-padded `YYYY-MM-DD` date.
///
/// chrono accepts unpadded fields like `2016-8-3`, signed years and
/// space-padded years; those are rejected here so every accepted date has the
/// same textual form as the stored column.
pub fn parse_date(value: &str) -> Result<NaiveDate, InvalidDate> {
    let invalid = || InvalidDate {
        value: value.to_string(),
    };

    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// First day of the lookback window ending at `latest` (inclusive).
pub fn lookback_start(latest: NaiveDate) -> NaiveDate {
    latest
        .checked_sub_days(Days::new(LOOKBACK_DAYS))
        .unwrap_or(NaiveDate::MIN)
}

/// An inclusive date range. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Clamp a requested range to `earliest..=latest`.
    ///
    /// A start before the first observation moves up to it; a missing end, or
    /// one after the last observation, becomes the last observation.
    pub fn clamped(
        start: NaiveDate,
        end: Option<NaiveDate>,
        earliest: NaiveDate,
        latest: NaiveDate,
    ) -> Self {
        let start = start.max(earliest);
        let end = match end {
            Some(end) if end <= latest => end,
            _ => latest,
        };
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}
