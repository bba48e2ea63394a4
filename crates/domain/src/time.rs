//! Time and timestamp helpers.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

/// UTC timestamp used for `last_changed`, `last_updated`, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
///
/// Only adapters call this; the resolver always receives "now" from its caller.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Local calendar date of `instant` in `tz`.
#[must_use]
pub fn local_date(instant: Timestamp, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Attach `time` to `date` in `tz`.
///
/// An ambiguous local time (clocks going back) maps to the earlier instant.
/// A local time inside a gap (clocks going forward) is read with the offset in
/// force before the gap, which moves it forward by the size of the gap:
/// `02:30` on a spring-forward night becomes `03:30`.
#[must_use]
pub fn combine(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Tz> {
    let naive = NaiveDateTime::new(date, time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = tz.offset_from_utc_datetime(&(naive - Duration::days(1)));
            let utc = naive - Duration::seconds(i64::from(before.fix().local_minus_utc()));
            tz.from_utc_datetime(&utc)
        }
    }
}

/// First instant of the local day following `instant` in `tz`.
#[must_use]
pub fn next_local_midnight(instant: Timestamp, tz: Tz) -> Timestamp {
    let tomorrow = local_date(instant, tz)
        .succ_opt()
        .unwrap_or(NaiveDate::MAX);
    combine(tomorrow, NaiveTime::MIN, tz).with_timezone(&Utc)
}
