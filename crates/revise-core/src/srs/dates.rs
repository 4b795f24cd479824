//! Day-level date handling.
//!
//! Every due date is stored as UTC midnight in the exact textual form
//! `YYYY-MM-DDT00:00:00.000Z`, so same-day comparisons are plain equality
//! and never depend on the time of day or the local timezone.

use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const MIDNIGHT_SUFFIX: &str = "T00:00:00.000Z";

/// First and last days whose ISO form keeps a four-digit year.
pub const FIRST_DAY: NaiveDate = match NaiveDate::from_ymd_opt(1, 1, 1) {
    Some(day) => day,
    None => NaiveDate::MIN,
};
pub const LAST_DAY: NaiveDate = match NaiveDate::from_ymd_opt(9999, 12, 31) {
    Some(day) => day,
    None => NaiveDate::MAX,
};

/// Anything that names a calendar day.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl CalendarDay for DateTime<Utc> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: CalendarDay + ?Sized> CalendarDay for &T {
    fn calendar_day(&self) -> NaiveDate {
        (**self).calendar_day()
    }
}

/// Strip the time of day and render UTC midnight of that day.
pub fn normalize_to_midnight<D: CalendarDay>(date: D) -> String {
    format!("{}{MIDNIGHT_SUFFIX}", date.calendar_day().format("%Y-%m-%d"))
}

/// Whether `date` lies in `FIRST_DAY..=LAST_DAY`.
pub fn is_representable(date: NaiveDate) -> bool {
    (1..=9999).contains(&date.year())
}

/// `date` shifted by `days` calendar days, or `None` when the result leaves
/// the representable range.
pub fn checked_add_days<D: CalendarDay>(date: D, days: i64) -> Option<NaiveDate> {
    let day = date.calendar_day();
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        day.checked_add_days(step)
    } else {
        day.checked_sub_days(step)
    }?;
    is_representable(shifted).then_some(shifted)
}

/// `date` shifted by `days` calendar days (negative goes back), clamped to
/// the representable range.
pub fn add_days<D: CalendarDay>(date: D, days: i64) -> NaiveDate {
    checked_add_days(date, days).unwrap_or(if days < 0 { FIRST_DAY } else { LAST_DAY })
}

/// Whole calendar days from `from` to `to`.
pub fn days_between<A: CalendarDay, B: CalendarDay>(from: A, to: B) -> i64 {
    (to.calendar_day() - from.calendar_day()).num_days()
}

/// Parse a loosely formatted date: RFC 3339 timestamps (any offset is
/// converted to UTC first) or a bare `YYYY-MM-DD`.
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// A due date. Always midnight-normalized; serializes as the ISO string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(NaiveDate);

impl DueDate {
    pub fn new<D: CalendarDay>(date: D) -> Self {
        Self(date.calendar_day())
    }

    pub fn day(&self) -> NaiveDate {
        self.0
    }

    pub fn shifted(&self, days: i64) -> Self {
        Self(add_days(self.0, days))
    }

    pub fn to_iso(&self) -> String {
        normalize_to_midnight(self.0)
    }
}

impl CalendarDay for DueDate {
    fn calendar_day(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DueDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{MIDNIGHT_SUFFIX}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DueDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_day(s)
            .filter(|day| is_representable(*day))
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "dueDate".into(),
                message: format!("'{s}' is not a date"),
            })
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of "now". Everything date-dependent reads time through this so
/// tests can pin the calendar.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance_days(&self, days: i64) {
        self.now.set(self.now.get() + Duration::days(days));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn normalizes_any_time_of_day() {
        let evening = Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 59).unwrap();
        assert_eq!(normalize_to_midnight(evening), "2026-03-09T00:00:00.000Z");
        let date = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(normalize_to_midnight(date), "2026-12-31T00:00:00.000Z");
    }

    #[test]
    fn due_date_round_trips_through_json() {
        let due = DueDate::new(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        let json = serde_json::to_string(&due).unwrap();
        assert_eq!(json, "\"2026-01-02T00:00:00.000Z\"");
        let back: DueDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, due);
    }

    #[test]
    fn due_date_parsing_drops_time_component() {
        let due: DueDate = "2026-05-04T15:30:00+00:00".parse().unwrap();
        assert_eq!(due.to_iso(), "2026-05-04T00:00:00.000Z");
        let bare: DueDate = "2026-05-04".parse().unwrap();
        assert_eq!(bare, due);
        assert!("next tuesday".parse::<DueDate>().is_err());
    }

    #[test]
    fn days_between_counts_calendar_days() {
        let a = Utc.with_ymd_and_hms(2026, 1, 1, 23, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 4, 1, 0, 0).unwrap();
        assert_eq!(days_between(a, b), 3);
        assert_eq!(days_between(b, a), -3);
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 2, 27, 8, 0, 0).unwrap());
        clock.advance_days(2);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn shifts_past_the_calendar_range_are_refused() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(checked_add_days(today, i64::from(u32::MAX)), None);
        assert_eq!(checked_add_days(today, i64::MIN), None);
        assert_eq!(checked_add_days(LAST_DAY, 1), None);
        assert_eq!(checked_add_days(LAST_DAY, -1), NaiveDate::from_ymd_opt(9999, 12, 30));
        assert_eq!(add_days(today, i64::MAX), LAST_DAY);
        assert_eq!(add_days(today, i64::MIN), FIRST_DAY);
        assert_eq!(normalize_to_midnight(add_days(today, i64::MAX)), "9999-12-31T00:00:00.000Z");
    }

    #[test]
    fn five_digit_years_are_not_due_dates() {
        assert!("+10000-01-01".parse::<DueDate>().is_err());
        assert!("9999-12-31".parse::<DueDate>().is_ok());
    }

    proptest! {
        #[test]
        fn normalized_form_is_always_midnight(secs in 0i64..4_102_444_800) {
            let ts = Utc.timestamp_opt(secs, 0).unwrap();
            let iso = normalize_to_midnight(ts);
            prop_assert_eq!(iso.len(), 24);
            prop_assert!(iso.ends_with("T00:00:00.000Z"));
            prop_assert_eq!(parse_day(&iso), Some(ts.date_naive()));
        }
    }
}
