use time_tz::Tz;

use crate::timezone::get_timezone;

#[track_caller]
pub(crate) fn must_get_timezone(name: &str) -> &'static Tz {
    get_timezone(name).expect("Could not find timezone")
}
