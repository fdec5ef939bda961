//! Resolves an optional month/year pair into a concrete calendar period.
//!
//! A [Period] brackets one calendar month in the server's local timezone, from
//! the first instant of day 1 to the last instant of the month's final day.

use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, de};
use time::{Date, Month, OffsetDateTime, UtcOffset};
use time_tz::{OffsetDateTimeExt, Tz};

use crate::{Error, timezone::assume_local};

/// The query parameters that select a period, e.g. `?month=2&year=2024`.
///
/// Blank values such as `?month=&year=` are treated as absent.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PeriodQuery {
    /// The month number, 1 for January through 12 for December.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub month: Option<u8>,
    /// The full calendar year, e.g. 2024.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub year: Option<i32>,
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(de::Error::custom),
    }
}

/// A calendar month together with its resolved start and end instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    /// The month number as requested.
    pub month: u8,
    /// The full calendar year as requested.
    pub year: i32,
    /// The first instant of the first day of the month.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// The last instant of the last day of the month.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl Period {
    /// The inclusive range of instants covered by the period, expressed in UTC.
    ///
    /// The record store keeps all instants in UTC, so this is the range to query with.
    pub fn utc_range(&self) -> RangeInclusive<OffsetDateTime> {
        self.start.to_offset(UtcOffset::UTC)..=self.end.to_offset(UtcOffset::UTC)
    }

    /// Whether `instant` falls within the period.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Resolve the calendar period for `month` and `year` in `timezone`.
///
/// If either `month` or `year` is `None`, both default to the month and year
/// of `now` in `timezone`. The start and end instants each carry the offset
/// `timezone` observes on that day, so a month that crosses a daylight saving
/// change starts and ends on different offsets.
///
/// Months outside 1..=12 are kept as given and their instants roll over into
/// the neighbouring year, e.g. month 13 of 2024 spans January 2025 and month 0
/// spans December of the year before.
///
/// # Errors
/// Returns [Error::Validation] if the month falls in a year the calendar
/// cannot represent.
pub fn resolve_period(
    month: Option<u8>,
    year: Option<i32>,
    now: OffsetDateTime,
    timezone: &Tz,
) -> Result<Period, Error> {
    let (month, year) = match (month, year) {
        (Some(month), Some(year)) => (month, year),
        _ => {
            let now = now.to_timezone(timezone);
            (u8::from(now.month()), now.year())
        }
    };

    let first_day = first_day_of_month(month, year)?;
    let last_day = last_day_of_month(first_day)?;
    let end_of_last_day = last_day
        .with_hms_nano(23, 59, 59, 999_999_999)
        .map_err(|_| unsupported_year(year))?;

    Ok(Period {
        month,
        year,
        start: assume_local(first_day.midnight(), timezone),
        end: assume_local(end_of_last_day, timezone),
    })
}

/// Resolve the period from query parameters.
pub fn resolve_period_query(
    query: PeriodQuery,
    now: OffsetDateTime,
    timezone: &Tz,
) -> Result<Period, Error> {
    resolve_period(query.month, query.year, now, timezone)
}

fn first_day_of_month(month: u8, year: i32) -> Result<Date, Error> {
    let months_since_year_zero = i64::from(year) * 12 + i64::from(month) - 1;
    let calendar_year = i32::try_from(months_since_year_zero.div_euclid(12))
        .map_err(|_| unsupported_year(year))?;
    let calendar_month = u8::try_from(months_since_year_zero.rem_euclid(12) + 1)
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .ok_or_else(|| unsupported_year(year))?;

    Date::from_calendar_date(calendar_year, calendar_month, 1).map_err(|_| unsupported_year(year))
}

fn last_day_of_month(first_day: Date) -> Result<Date, Error> {
    let year = first_day.year();
    first_day
        .replace_day(first_day.month().length(year))
        .map_err(|_| unsupported_year(year))
}

fn unsupported_year(year: i32) -> Error {
    Error::Validation(format!("{year} is not a supported year"))
}
