//! Reminder planning.
//!
//! Works out which notifications should fire next and what they say.
//! Delivering them (timers, OS notification APIs) is left to the front end;
//! plans are cheap to recompute whenever the review set or calendar changes.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{events_on, ManualEvent};
use crate::srs::{is_due_today, is_overdue, Review};
use crate::storage::NotificationsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Daily,
    Streak,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub at: DateTime<Utc>,
    pub kind: ReminderKind,
    pub title: String,
    pub body: String,
}

/// Next time the wall clock shows `time`: later today, or tomorrow if that
/// moment has already passed.
pub fn next_occurrence(now: DateTime<Utc>, time: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(time).and_utc();
    if today <= now {
        today + Duration::days(1)
    } else {
        today
    }
}

fn plural(count: usize, one: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {one}s")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn daily_reminder(reviews: &[Review], at: DateTime<Utc>, now: DateTime<Utc>) -> Reminder {
    let today = now.date_naive();
    let live = || reviews.iter().filter(|r| !r.is_completed);
    let overdue = live().filter(|r| is_overdue(r, today)).count();
    let due_today = live().filter(|r| is_due_today(r, today)).count();

    if overdue == 0 && due_today == 0 {
        return Reminder {
            at,
            kind: ReminderKind::Daily,
            title: "NEET Study Time!".into(),
            body: "Time for your daily study session. Keep your streak going!".into(),
        };
    }

    let mut parts = Vec::new();
    if overdue > 0 {
        parts.push(plural(overdue, "overdue review"));
    }
    if due_today > 0 {
        parts.push(format!("{} due today", plural(due_today, "review")));
    }
    Reminder {
        at,
        kind: ReminderKind::Daily,
        title: "Study Reviews Due!".into(),
        body: format!("You have {}. Don't break your streak!", parts.join(" and ")),
    }
}

/// `None` when something was already completed today.
pub fn streak_reminder(
    reviews: &[Review],
    at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<Reminder> {
    let today = now.date_naive();
    let studied_today = reviews
        .iter()
        .filter_map(|r| r.last_reviewed)
        .any(|at| at.date_naive() == today);
    if studied_today {
        return None;
    }

    let overdue = reviews
        .iter()
        .filter(|r| !r.is_completed && is_overdue(r, today))
        .count();
    let (title, body) = if overdue > 0 {
        (
            "Streak Alert!".to_string(),
            format!(
                "You have {} waiting. Don't let your streak break now!",
                plural(overdue, "overdue review")
            ),
        )
    } else {
        (
            "Don't Break Your Streak!".to_string(),
            "You haven't studied today. Even 5 minutes keeps your momentum going!".to_string(),
        )
    };
    Some(Reminder {
        at,
        kind: ReminderKind::Streak,
        title,
        body,
    })
}

pub fn event_reminder(event: &ManualEvent) -> Reminder {
    let mut body = format!(
        "{} scheduled for {}",
        capitalize(event.event_type.as_str()),
        event.time.format("%H:%M")
    );
    if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
        body.push_str(": ");
        body.push_str(description);
    }
    Reminder {
        at: event.starts_at(),
        kind: ReminderKind::Event,
        title: format!("Event Reminder: {}", event.title),
        body,
    }
}

/// Everything that should fire next, earliest first.
pub fn plan_reminders(
    reviews: &[Review],
    events: &[ManualEvent],
    config: &NotificationsConfig,
    now: DateTime<Utc>,
) -> Vec<Reminder> {
    if !config.enabled {
        return Vec::new();
    }

    let mut plan = vec![daily_reminder(
        reviews,
        next_occurrence(now, config.daily_reminder),
        now,
    )];
    plan.extend(streak_reminder(
        reviews,
        next_occurrence(now, config.streak_reminder),
        now,
    ));
    if config.event_notifications {
        plan.extend(
            events_on(events, now.date_naive())
                .into_iter()
                .filter(|e| e.starts_at() > now)
                .map(event_reminder),
        );
    }

    plan.sort_by_key(|r| r.at);
    tracing::debug!(count = plan.len(), "planned reminders");
    plan
}
