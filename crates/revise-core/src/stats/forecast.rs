//! Day-by-day review forecast.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::srs::{checked_add_days, DueDate, Review};

/// Length of the dashboard overview.
pub const OVERVIEW_DAYS: u32 = 7;
/// Length of the progress forecast.
pub const FORECAST_DAYS: u32 = 14;
/// Longest forecast handed out; longer requests are cut to this.
pub const MAX_FORECAST_DAYS: u32 = 366;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    /// Midnight-normalized day.
    pub date: DueDate,
    /// Reviews due exactly on this day.
    pub count: usize,
    /// Short weekday name, e.g. `Mon`.
    pub day_name: String,
}

/// Exact-date histogram of due reviews for `today` and the following
/// `days - 1` days, at most [`MAX_FORECAST_DAYS`] and never past the end
/// of the calendar. Not cumulative: overdue reviews are not folded into
/// today.
pub fn forecast<'a, I>(reviews: I, today: NaiveDate, days: u32) -> Vec<DayForecast>
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut buckets: Vec<DayForecast> = (0..days.min(MAX_FORECAST_DAYS))
        .map_while(|i| checked_add_days(today, i64::from(i)))
        .map(|date| DayForecast {
            date: DueDate::new(date),
            count: 0,
            day_name: date.format("%a").to_string(),
        })
        .collect();

    for review in reviews.into_iter().filter(|r| !r.is_completed) {
        let offset = (review.due_date.day() - today).num_days();
        let bucket = usize::try_from(offset)
            .ok()
            .and_then(|offset| buckets.get_mut(offset));
        if let Some(bucket) = bucket {
            bucket.count += 1;
        }
    }
    buckets
}

pub fn seven_day_overview<'a, I>(reviews: I, today: NaiveDate) -> Vec<DayForecast>
where
    I: IntoIterator<Item = &'a Review>,
{
    forecast(reviews, today, OVERVIEW_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::{add_days, create_review, Difficulty, NewReview, Subject, LAST_DAY};
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        // A Monday.
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn due_in(offset: i64) -> Review {
        let mut review = create_review(
            NewReview::new("t", Subject::Chemistry, "Thermo", "Entropy", Difficulty::Hard),
            Utc.with_ymd_and_hms(2026, 10, 10, 0, 0, 0).unwrap(),
        )
        .unwrap();
        review.due_date = DueDate::new(add_days(today(), offset));
        review
    }

    #[test]
    fn single_review_lands_on_its_day() {
        let reviews = vec![due_in(3)];
        let overview = seven_day_overview(&reviews, today());
        assert_eq!(overview.len(), 7);
        for (i, day) in overview.iter().enumerate() {
            assert_eq!(day.count, usize::from(i == 3), "index {i}");
        }
        assert_eq!(overview[3].date.to_iso(), "2026-10-22T00:00:00.000Z");
    }

    #[test]
    fn day_names_follow_the_calendar() {
        let overview = seven_day_overview(&[], today());
        let names: Vec<&str> = overview.iter().map(|d| d.day_name.as_str()).collect();
        assert_eq!(names, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    }

    #[test]
    fn overdue_and_out_of_range_are_not_counted() {
        let reviews = vec![due_in(-1), due_in(14), due_in(13), due_in(0)];
        let days = forecast(&reviews, today(), FORECAST_DAYS);
        assert_eq!(days.len(), 14);
        assert_eq!(days[0].count, 1);
        assert_eq!(days[13].count, 1);
        assert_eq!(days.iter().map(|d| d.count).sum::<usize>(), 2);
    }

    #[test]
    fn huge_horizons_are_cut_short() {
        let reviews = vec![due_in(400)];
        assert_eq!(forecast(&reviews, today(), u32::MAX).len(), MAX_FORECAST_DAYS as usize);

        let near_the_end = add_days(LAST_DAY, -2);
        let days = forecast(&[], near_the_end, FORECAST_DAYS);
        assert_eq!(days.len(), 3);
        assert_eq!(days[2].date.day(), LAST_DAY);
    }
}
