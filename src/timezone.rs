//! Helpers for resolving the server's configured local timezone.

use time::{OffsetDateTime, PrimitiveDateTime};
use time_tz::{OffsetDateTimeExt, PrimitiveDateTimeExt, Tz};

use crate::Error;

/// Look up a timezone by its canonical name, e.g. "Pacific/Auckland".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a known timezone.
pub fn get_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    time_tz::timezones::get_by_name(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}

/// Get the current date and time in `timezone`.
pub fn local_now(timezone: &Tz) -> OffsetDateTime {
    OffsetDateTime::now_utc().to_timezone(timezone)
}

/// Attach the offset that `timezone` observes at the wall clock time `local`.
///
/// A wall clock time repeated when clocks go back resolves to its first
/// occurrence. A time skipped when clocks go forward takes the offset in
/// effect at the same reading in UTC.
pub fn assume_local(local: PrimitiveDateTime, timezone: &Tz) -> OffsetDateTime {
    local
        .assume_timezone(timezone)
        .take_first()
        .unwrap_or_else(|| local.assume_timezone_utc(timezone))
}
