//! Conversions between typed duration text, minute counts and stored ranges.
//!
//! A grid cell is persisted as an instant range that starts at local midnight
//! of its day (in a fixed [`GridOffset`]) and ends `minutes` later. The range
//! length is the cell value, so nothing but the two instants is stored.

use std::{fmt, str::FromStr};

use thiserror::Error;
use time::{format_description::BorrowedFormatItem, macros::format_description, macros::offset};
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::GridMonth;

/// Upper bound for a single cell: one full day.
pub const MAX_CELL_MINUTES: u32 = 24 * 60;

const OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

/// Outcome of parsing the text typed into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellInput {
    Minutes(u32),
    /// The cell was emptied on purpose; the entry behind it should go away.
    Clear,
}

impl CellInput {
    pub fn minutes(self) -> Option<u32> {
        match self {
            CellInput::Minutes(minutes) => Some(minutes),
            CellInput::Clear => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    #[error("not a duration: {0:?} (use minutes like 90 or h:mm like 1:30)")]
    Malformed(String),
    #[error("minutes must be between 0 and 59 in {0:?}")]
    MinutesOutOfRange(String),
    #[error("duration is too large: {0:?}")]
    TooLarge(String),
}

/// Parse user input into a cell value.
///
/// Accepts a bare minute count (`90`) or `H:MM` (`1:30`). Blank input is the
/// explicit [`CellInput::Clear`] signal, never an error.
pub fn parse_duration(text: &str) -> Result<CellInput, ParseDurationError> {
    let s = text.trim();
    if s.is_empty() {
        return Ok(CellInput::Clear);
    }

    if is_digits(s) {
        return s
            .parse::<u32>()
            .map(CellInput::Minutes)
            .map_err(|_| ParseDurationError::TooLarge(s.to_string()));
    }

    let Some((hours, minutes)) = s.split_once(':') else {
        return Err(ParseDurationError::Malformed(s.to_string()));
    };
    if !is_digits(hours) || !is_digits(minutes) || minutes.len() > 2 {
        return Err(ParseDurationError::Malformed(s.to_string()));
    }

    let minutes: u32 = minutes
        .parse()
        .map_err(|_| ParseDurationError::Malformed(s.to_string()))?;
    if minutes >= 60 {
        return Err(ParseDurationError::MinutesOutOfRange(s.to_string()));
    }

    hours
        .parse::<u32>()
        .ok()
        .and_then(|h| h.checked_mul(60))
        .and_then(|m| m.checked_add(minutes))
        .map(CellInput::Minutes)
        .ok_or_else(|| ParseDurationError::TooLarge(s.to_string()))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Render minutes as `H:MM`. Zero and negative values render as an empty cell.
pub fn format_duration(minutes: i64) -> String {
    if minutes <= 0 {
        return String::new();
    }
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Minutes between two instants, rounded to the nearest minute.
///
/// A range that ends before it starts yields 0.
pub fn from_range(start: OffsetDateTime, end: OffsetDateTime) -> u32 {
    let seconds = (end - start).whole_seconds();
    if seconds <= 0 {
        return 0;
    }
    u32::try_from((seconds + 30) / 60).unwrap_or(u32::MAX)
}

/// The fixed UTC offset at which grid days begin.
///
/// This is deployment configuration, not a per-user setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOffset(UtcOffset);

impl Default for GridOffset {
    fn default() -> Self {
        Self(offset!(+9))
    }
}

impl GridOffset {
    pub fn new(offset: UtcOffset) -> Self {
        Self(offset)
    }

    pub fn as_utc_offset(&self) -> UtcOffset {
        self.0
    }

    /// Local midnight of `day`.
    pub fn day_start(&self, day: Date) -> OffsetDateTime {
        day.midnight().assume_offset(self.0)
    }

    /// The stored range for a cell on `day` holding `minutes`.
    ///
    /// Minutes are clamped to `[0, MAX_CELL_MINUTES]`. Returns `None` when the
    /// end would fall past the last representable date.
    pub fn to_range(&self, day: Date, minutes: i64) -> Option<(OffsetDateTime, OffsetDateTime)> {
        let start = self.day_start(day);
        let clamped = minutes.clamp(0, i64::from(MAX_CELL_MINUTES));
        let end = start.checked_add(Duration::minutes(clamped))?;
        Some((start, end))
    }

    /// Calendar day of `instant` as seen at this offset.
    pub fn day_of(&self, instant: OffsetDateTime) -> Date {
        instant.to_offset(self.0).date()
    }

    /// Closed-open instant range covering every day of `month`.
    pub fn month_range(&self, month: GridMonth) -> (OffsetDateTime, OffsetDateTime) {
        (
            self.day_start(month.first_day()),
            self.day_start(month.next().first_day()),
        )
    }

    pub fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.0).date()
    }
}

impl fmt::Display for GridOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(OFFSET_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl FromStr for GridOffset {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UtcOffset::parse(s.trim(), OFFSET_FORMAT).map(Self)
    }
}
