//! Statistics module for Revise
//!
//! Derived views over the review history: review health, bucket counts,
//! day-by-day forecasts, the study streak and a per-subject breakdown that
//! includes syllabus coverage.

mod forecast;
mod health;
mod streak;
mod subjects;

pub use forecast::{
    forecast, seven_day_overview, DayForecast, FORECAST_DAYS, MAX_FORECAST_DAYS, OVERVIEW_DAYS,
};
pub use health::{health_percent, review_stats, ReviewStats};
pub use streak::{
    activity_days, current_streak, longest_streak, StreakState, MAX_STREAK_RESTORES,
    STREAK_LOOKBACK_DAYS,
};
pub use subjects::{subject_breakdown, SubjectBreakdown};
