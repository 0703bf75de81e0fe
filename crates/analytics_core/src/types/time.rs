//! Time types, tenors and day count conventions.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `Tenor`: Period strings such as `3M` or `10Y`
//! - `DayCountConvention`: Year fraction conventions used by bond markets
//! - `Frequency`: Coupon frequency
//!
//! # Examples
//!
//! ```
//! use analytics_core::types::{Date, DayCountConvention, Tenor};
//!
//! let start = Date::from_ymd(2024, 1, 31).unwrap();
//! let tenor: Tenor = "1M".parse().unwrap();
//! let end = start.add_tenor(tenor).unwrap();
//! assert_eq!(end, Date::from_ymd(2024, 2, 29).unwrap());
//!
//! let yf = DayCountConvention::Actual360.year_fraction_dates(start, end);
//! assert!((yf - 29.0 / 360.0).abs() < 1e-12);
//! ```

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Subtracting two dates yields the signed number of calendar days.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Errors
    ///
    /// Returns `DateError::InvalidDate` if the components are not a calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses an ISO 8601 date string (`YYYY-MM-DD`).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying chrono date.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day-of-month component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Shifts the date by a signed number of calendar days.
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted.map(Date).ok_or_else(|| overflow(self, days))
    }

    /// Shifts the date by a signed number of months, clamping to month end.
    pub fn add_months(self, months: i32) -> Result<Self, DateError> {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| overflow(self, i64::from(months)))
    }

    /// Shifts the date forward by a tenor.
    pub fn add_tenor(self, tenor: Tenor) -> Result<Self, DateError> {
        match tenor {
            Tenor::Days(n) => self.add_days(i64::from(n)),
            Tenor::Weeks(n) => self.add_days(7 * i64::from(n)),
            Tenor::Months(n) => self.add_months(n as i32),
            Tenor::Years(n) => self.add_months(12 * n as i32),
        }
    }

    /// True when the year is a Gregorian leap year.
    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }
}

fn overflow(date: Date, shift: i64) -> DateError {
    DateError::ParseError(format!("date arithmetic overflow: {} shifted by {}", date, shift))
}

impl Sub for Date {
    type Output = i64;

    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A period length expressed in calendar units.
///
/// Parsed from strings like `5D`, `2W`, `6M`, `10Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tenor {
    /// Calendar days
    Days(u32),
    /// Weeks of seven days
    Weeks(u32),
    /// Calendar months
    Months(u32),
    /// Calendar years
    Years(u32),
}

impl Tenor {
    /// Approximate length in years (365.25 days, 12 months).
    pub fn year_fraction(&self) -> f64 {
        match *self {
            Tenor::Days(n) => f64::from(n) / 365.25,
            Tenor::Weeks(n) => 7.0 * f64::from(n) / 365.25,
            Tenor::Months(n) => f64::from(n) / 12.0,
            Tenor::Years(n) => f64::from(n),
        }
    }
}

impl FromStr for Tenor {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        let trimmed = s.trim().to_uppercase();
        if trimmed.len() < 2 {
            return Err(DateError::InvalidTenor(s.to_string()));
        }
        let (count, unit) = trimmed.split_at(trimmed.len() - 1);
        let n: u32 = count
            .parse()
            .map_err(|_| DateError::InvalidTenor(s.to_string()))?;
        match unit {
            "D" => Ok(Tenor::Days(n)),
            "W" => Ok(Tenor::Weeks(n)),
            "M" => Ok(Tenor::Months(n)),
            "Y" => Ok(Tenor::Years(n)),
            _ => Err(DateError::InvalidTenor(s.to_string())),
        }
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tenor::Days(n) => write!(f, "{}D", n),
            Tenor::Weeks(n) => write!(f, "{}W", n),
            Tenor::Months(n) => write!(f, "{}M", n),
            Tenor::Years(n) => write!(f, "{}Y", n),
        }
    }
}

/// Day count conventions for year fraction calculation.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual_days / 365.0
    Actual365Fixed,

    /// Actual/360: actual_days / 360.0
    Actual360,

    /// 30/360 US Bond Basis
    Thirty360,

    /// Actual/Actual ISDA: days in each calendar year over that year's length.
    ActualActual,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Actual365Fixed => "ACT/365F",
            DayCountConvention::Actual360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
            DayCountConvention::ActualActual => "ACT/ACT",
        }
    }

    /// Year fraction between two dates; negative when `end < start`.
    pub fn year_fraction_dates(&self, start: Date, end: Date) -> f64 {
        if end < start {
            return -self.year_fraction_dates(end, start);
        }
        let (s, e) = (start.into_inner(), end.into_inner());
        match self {
            DayCountConvention::Actual365Fixed => (end - start) as f64 / 365.0,
            DayCountConvention::Actual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let d1 = if s.day() == 31 { 30 } else { s.day() };
                let d2 = if e.day() == 31 && d1 == 30 { 30 } else { e.day() };
                let days = 360 * (e.year() - s.year())
                    + 30 * (e.month() as i32 - s.month() as i32)
                    + (d2 as i32 - d1 as i32);
                days as f64 / 360.0
            }
            DayCountConvention::ActualActual => {
                let mut fraction = 0.0;
                let mut cursor = s;
                while cursor < e {
                    let year = cursor.year();
                    let year_len = if cursor.leap_year() { 366.0 } else { 365.0 };
                    let next_year = NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap_or(e);
                    let stop = next_year.min(e);
                    fraction += (stop - cursor).num_days() as f64 / year_len;
                    cursor = stop;
                }
                fraction
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' '], "").as_str() {
            "ACT365" | "ACT365F" | "ACTUAL365" | "A365" => Ok(DayCountConvention::Actual365Fixed),
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::Actual360),
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            "ACTACT" | "ACTUALACTUAL" => Ok(DayCountConvention::ActualActual),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Coupon payment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// One payment per year
    Annual,
    /// Two payments per year
    SemiAnnual,
    /// Four payments per year
    Quarterly,
    /// Twelve payments per year
    Monthly,
}

impl Frequency {
    /// Number of payments per year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Period between payments as a tenor.
    pub fn tenor(&self) -> Tenor {
        Tenor::Months(12 / self.periods_per_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_date_parse_and_display() {
        let date: Date = "2024-06-15".parse().unwrap();
        assert_eq!(date, Date::from_ymd(2024, 6, 15).unwrap());
        assert_eq!(format!("{}", date), "2024-06-15");
        assert!(Date::parse("15/06/2024").is_err());
    }

    #[test]
    fn test_date_invalid() {
        assert_eq!(
            Date::from_ymd(2023, 2, 29),
            Err(DateError::InvalidDate {
                year: 2023,
                month: 2,
                day: 29
            })
        );
    }

    #[test]
    fn test_add_days_and_months() {
        let d = Date::from_ymd(2024, 3, 31).unwrap();
        assert_eq!(d.add_days(1).unwrap(), Date::from_ymd(2024, 4, 1).unwrap());
        assert_eq!(d.add_days(-31).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(d.add_months(1).unwrap(), Date::from_ymd(2024, 4, 30).unwrap());
        assert_eq!(d.add_months(-13).unwrap(), Date::from_ymd(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_tenor_parse() {
        assert_eq!("5d".parse::<Tenor>().unwrap(), Tenor::Days(5));
        assert_eq!("2W".parse::<Tenor>().unwrap(), Tenor::Weeks(2));
        assert_eq!("10Y".parse::<Tenor>().unwrap(), Tenor::Years(10));
        assert!("Y".parse::<Tenor>().is_err());
        assert!("3Q".parse::<Tenor>().is_err());
        assert_eq!(format!("{}", Tenor::Months(6)), "6M");
    }

    #[test]
    fn test_tenor_year_fraction() {
        assert_relative_eq!(Tenor::Months(3).year_fraction(), 0.25);
        assert_relative_eq!(Tenor::Years(2).year_fraction(), 2.0);
    }

    #[test]
    fn test_thirty_360() {
        let start = Date::from_ymd(2024, 1, 31).unwrap();
        let end = Date::from_ymd(2024, 7, 31).unwrap();
        assert_relative_eq!(
            DayCountConvention::Thirty360.year_fraction_dates(start, end),
            0.5
        );
    }

    #[test]
    fn test_actual_actual_spans_years() {
        let start = Date::from_ymd(2023, 7, 1).unwrap();
        let end = Date::from_ymd(2024, 7, 1).unwrap();
        let expected = 184.0 / 365.0 + 182.0 / 366.0;
        assert_relative_eq!(
            DayCountConvention::ActualActual.year_fraction_dates(start, end),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_year_fraction_negative_direction() {
        let a = Date::from_ymd(2024, 1, 1).unwrap();
        let b = Date::from_ymd(2024, 1, 11).unwrap();
        let dc = DayCountConvention::Actual365Fixed;
        assert_relative_eq!(dc.year_fraction_dates(b, a), -10.0 / 365.0);
    }

    #[test]
    fn test_day_count_from_str() {
        assert_eq!(
            "act/act".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::ActualActual
        );
        assert!("bus/252".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_frequency_tenor() {
        assert_eq!(Frequency::SemiAnnual.tenor(), Tenor::Months(6));
        assert_eq!(Frequency::Annual.periods_per_year(), 1);
    }
}
