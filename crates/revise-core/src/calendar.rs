//! Manual calendar entries (exams, mock tests, holidays).
//!
//! These live beside the review ladder and never affect scheduling; the
//! reminder planner is their only consumer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Exam,
    Mock,
    Holiday,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Exam => "exam",
            EventType::Mock => "mock",
            EventType::Holiday => "holiday",
            EventType::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exam" => Ok(EventType::Exam),
            "mock" => Ok(EventType::Mock),
            "holiday" => Ok(EventType::Holiday),
            "other" => Ok(EventType::Other),
            _ => Err(ValidationError::InvalidValue {
                field: "type".into(),
                message: format!("expected exam, mock, holiday or other, got '{s}'"),
            }),
        }
    }
}

pub fn default_event_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm", default = "default_event_time")]
    pub time: NaiveTime,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for [`ManualEvent::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub event_type: EventType,
    pub description: Option<String>,
}

impl ManualEvent {
    pub fn create(new: NewEvent, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("event-{}", Uuid::new_v4().simple()),
            title: new.title,
            date: new.date,
            time: new.time.unwrap_or_else(default_event_time),
            event_type: new.event_type,
            description: new.description,
            created_at: now,
        }
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.date.and_time(self.time).and_utc()
    }
}

/// Events on `date`, earliest first.
pub fn events_on(events: &[ManualEvent], date: NaiveDate) -> Vec<&ManualEvent> {
    let mut found: Vec<&ManualEvent> = events.iter().filter(|e| e.date == date).collect();
    found.sort_by_key(|e| e.time);
    found
}

/// Parse `HH:MM`.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| ValidationError::InvalidValue {
        field: "time".into(),
        message: format!("expected HH:MM, got '{s}'"),
    })
}

/// Serde adapter storing a `NaiveTime` as `HH:MM`.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(title: &str, date: NaiveDate, time: Option<NaiveTime>) -> ManualEvent {
        ManualEvent::create(
            NewEvent {
                title: title.into(),
                date,
                time,
                event_type: EventType::Mock,
                description: None,
            },
            Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn time_defaults_to_nine() {
        let e = event("Mock 3", NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(), None);
        assert_eq!(e.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["time"], "09:00");
        assert_eq!(json["type"], "mock");
        assert_eq!(json["date"], "2026-11-01");
    }

    #[test]
    fn events_on_filters_and_sorts() {
        let day = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let events = vec![
            event("afternoon", day, NaiveTime::from_hms_opt(15, 0, 0)),
            event("other day", day.succ_opt().unwrap(), None),
            event("morning", day, NaiveTime::from_hms_opt(8, 30, 0)),
        ];
        let titles: Vec<&str> = events_on(&events, day).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["morning", "afternoon"]);
    }

    #[test]
    fn rejects_malformed_time() {
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("9am").is_err());
        assert_eq!(parse_hhmm("07:45").unwrap(), NaiveTime::from_hms_opt(7, 45, 0).unwrap());
    }

    #[test]
    fn type_parses_case_insensitively() {
        assert_eq!("EXAM".parse::<EventType>().unwrap(), EventType::Exam);
        assert!("party".parse::<EventType>().is_err());
    }
}
