use std::slice::Iter;

use chrono::{Datelike, Duration, NaiveDate};
use derive_more::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    #[display("monday")]
    Monday,
    #[display("tuesday")]
    Tuesday,
    #[display("wednesday")]
    Wednesday,
    #[display("thursday")]
    Thursday,
    #[display("friday")]
    Friday,
    #[display("saturday")]
    Saturday,
    #[display("sunday")]
    Sunday,
}

impl Weekday {
    pub fn iter() -> Iter<'static, Weekday> {
        static WEEKDAYS: [Weekday; 7] = [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ];
        WEEKDAYS.iter()
    }

    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    #[must_use]
    pub fn days_from_monday(self) -> u32 {
        self as u32
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Interval {
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// The `days` days up to and including `last`.
    ///
    /// Windows reaching beyond the calendar range are cut off at its limits.
    #[must_use]
    pub fn trailing_days(last: NaiveDate, days: u32) -> Self {
        let end = last.succ_opt().unwrap_or(NaiveDate::MAX);
        Interval {
            start: end
                .checked_sub_signed(Duration::days(i64::from(days)))
                .unwrap_or(NaiveDate::MIN),
            end,
        }
    }

    #[must_use]
    pub fn union(&self, other: &Interval) -> Self {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A numbered calendar week.
///
/// The week starts on the Monday of the ISO week that contains January 4th of
/// `year`, shifted by `number - 1` weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    year: i32,
    number: u32,
    start: NaiveDate,
}

impl Week {
    pub const MAX_NUMBER: u32 = 53;
    /// Week number used when stepping back across a year boundary.
    pub const WRAP_NUMBER: u32 = 52;

    pub fn new(year: i32, number: u32) -> Result<Self, WeekError> {
        if !(1..=Self::MAX_NUMBER).contains(&number) {
            return Err(WeekError::OutOfRange(number));
        }

        let jan4 = NaiveDate::from_ymd_opt(year, 1, 4).ok_or(WeekError::InvalidYear(year))?;
        let monday = jan4 - Duration::days(i64::from(Weekday::of(jan4).days_from_monday()));
        let start = monday
            .checked_add_signed(Duration::weeks(i64::from(number - 1)))
            .ok_or(WeekError::InvalidYear(year))?;

        Ok(Self {
            year,
            number,
            start,
        })
    }

    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            number: iso.week(),
            start: date - Duration::days(i64::from(Weekday::of(date).days_from_monday())),
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.start + Duration::days(7),
        }
    }

    /// The preceding week; week 1 steps back to week 52 of the prior year.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        if self.number > 1 {
            Self::new(self.year, self.number - 1).ok()
        } else {
            Self::new(self.year - 1, Self::WRAP_NUMBER).ok()
        }
    }

    /// The week directly before this one in the calendar.
    ///
    /// Unlike [`Week::previous`], week 1 steps back to week 53 if the prior
    /// year has one.
    #[must_use]
    pub fn calendar_previous(&self) -> Option<Self> {
        self.start.pred_opt().map(Self::containing)
    }

    /// This week and the `count - 1` weeks before it, newest first.
    #[must_use]
    pub fn trailing(&self, count: usize) -> Vec<Self> {
        std::iter::successors(Some(*self), Week::previous)
            .take(count)
            .collect()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeekError {
    #[error("Week must be in the range 1 to 53 ({0})")]
    OutOfRange(u32),
    #[error("Year out of range ({0})")]
    InvalidYear(i32),
}
