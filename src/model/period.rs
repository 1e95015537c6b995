//! Month validation and period resolution.
//!
//! The dataset spans exactly one calendar year, so every month-scoped query
//! resolves to an inclusive date range within [`REFERENCE_YEAR`]. All period
//! derivation in the crate goes through [`Period`]; nothing else builds date
//! ranges by hand.

use crate::{Error, Result};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The calendar year the dataset is defined to span.
pub const REFERENCE_YEAR: i32 = 2021;

/// A validated calendar month, always in 1-12.
///
/// Parsing is strict: `"0"`, `"13"`, `"abc"` and empty input are all
/// rejected. A zero month is invalid input, never treated as "missing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Month(u32);

impl Month {
    pub fn new(value: u32) -> Result<Self> {
        if (1..=12).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::validation(format!(
                "month must be between 1 and 12, got {value}"
            )))
        }
    }

    pub fn number(self) -> u32 {
        self.0
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().parse::<u32>().map_err(|_| {
            Error::validation(format!("month must be a number between 1 and 12, got '{s}'"))
        })?;
        Month::new(value)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inclusive date range covering one month of the reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    /// Resolves a month to its period within [`REFERENCE_YEAR`].
    pub fn for_month(month: Month) -> Self {
        Self::in_year(month, REFERENCE_YEAR)
    }

    /// Parses and validates a raw month string, then resolves it.
    pub fn resolve(raw_month: &str) -> Result<Self> {
        Ok(Self::for_month(raw_month.parse()?))
    }

    /// Resolves a month within an arbitrary year.
    ///
    /// The end of the month comes from calendar arithmetic (first day of the
    /// next month, minus one day), never a fixed day count, so 31-day months
    /// are not truncated and February follows the year's leap rule.
    pub fn in_year(month: Month, year: i32) -> Self {
        let start = NaiveDate::from_ymd_opt(year, month.number(), 1)
            .expect("a validated month always forms a valid first-of-month date");
        let next_month_start = if month.number() == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month.number() + 1, 1)
        }
        .expect("a validated month always forms a valid first-of-month date");
        let end = next_month_start
            .checked_sub_days(Days::new(1))
            .expect("the day before a first-of-month date always exists");
        Self { start, end }
    }

    /// First day of the month, inclusive.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the month, inclusive.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// True when `date` falls within the period, boundaries included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
