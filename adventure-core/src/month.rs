use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use time::{util::days_in_year_month, Date, Duration, Month};

use crate::GridOffset;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month {0:?}, expected YYYY-MM")]
pub struct MonthParseError(String);

/// A calendar month shown as one grid page.
///
/// Stored as the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridMonth(Date);

impl GridMonth {
    /// The month containing `day`.
    pub fn containing(day: Date) -> Self {
        Self(day - Duration::days(i64::from(day.day()) - 1))
    }

    /// The current month as seen at the grid offset.
    pub fn current(offset: GridOffset) -> Self {
        Self::containing(offset.today())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> Month {
        self.0.month()
    }

    pub fn first_day(&self) -> Date {
        self.0
    }

    pub fn day_count(&self) -> u8 {
        days_in_year_month(self.0.year(), self.0.month())
    }

    /// Saturates at the last representable month.
    pub fn next(&self) -> Self {
        self.0
            .checked_add(Duration::days(i64::from(self.day_count())))
            .map(Self)
            .unwrap_or(*self)
    }

    pub fn contains(&self, day: Date) -> bool {
        Self::containing(day) == *self
    }

    /// Every day of the month in order.
    pub fn days(&self) -> Vec<Date> {
        std::iter::successors(Some(self.0), |day| day.next_day())
            .take(usize::from(self.day_count()))
            .collect()
    }
}

impl fmt::Display for GridMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), u8::from(self.0.month()))
    }
}

impl FromStr for GridMonth {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u8 = month.parse().map_err(|_| err())?;
        let month = Month::try_from(month).map_err(|_| err())?;

        Date::from_calendar_date(year, month, 1)
            .map(Self)
            .map_err(|_| err())
    }
}

impl Serialize for GridMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GridMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
