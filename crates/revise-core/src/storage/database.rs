//! SQLite-based storage for reviews, manual events and small app state.
//!
//! Provides persistent storage for:
//! - The review collection (whole-collection replace plus single deletes)
//! - Manual calendar events
//! - Practice test sessions and syllabus coverage marks
//! - Key-value store for application state (streak restores)

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use super::{data_dir, migrations, ReviewStore};
use crate::calendar::{parse_hhmm, EventType, ManualEvent};
use crate::error::{DatabaseError, Result};
use crate::practice::TestSession;
use crate::srs::{Difficulty, DueDate, Review, Subject};
use crate::stats::StreakState;
use crate::syllabus::{CoverageState, TopicCoverage};

const STREAK_KEY: &str = "streak_state";

/// SQLite database backing a study profile.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/revise/revise.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("revise.db"))
    }

    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// A review row as stored, before the text columns are decoded.
struct ReviewRow {
    id: String,
    topic_id: String,
    subject: String,
    chapter: String,
    topic: String,
    difficulty: String,
    interval: i64,
    due_date: String,
    last_reviewed: Option<String>,
    times_reviewed: i64,
    is_completed: bool,
    notes: Option<String>,
    created_at: String,
}

fn corrupt(table: &'static str, message: impl Into<String>) -> DatabaseError {
    DatabaseError::CorruptRow {
        table,
        message: message.into(),
    }
}

fn parse_timestamp(table: &'static str, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| corrupt(table, format!("bad timestamp '{raw}': {e}")))
}

impl TryFrom<ReviewRow> for Review {
    type Error = DatabaseError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let bad = |field: &str, e: &dyn std::fmt::Display| {
            corrupt("reviews", format!("{} ({field}): {e}", row.id))
        };
        let review = Review {
            subject: row
                .subject
                .parse::<Subject>()
                .map_err(|e| bad("subject", &e))?,
            difficulty: row
                .difficulty
                .parse::<Difficulty>()
                .map_err(|e| bad("difficulty", &e))?,
            interval: usize::try_from(row.interval).map_err(|e| bad("interval", &e))?,
            due_date: row.due_date.parse::<DueDate>().map_err(|e| bad("due_date", &e))?,
            last_reviewed: row
                .last_reviewed
                .as_deref()
                .map(|raw| parse_timestamp("reviews", raw))
                .transpose()?,
            times_reviewed: u32::try_from(row.times_reviewed)
                .map_err(|e| bad("times_reviewed", &e))?,
            created_at: parse_timestamp("reviews", &row.created_at)?,
            is_completed: row.is_completed,
            notes: row.notes,
            chapter: row.chapter,
            topic: row.topic,
            topic_id: row.topic_id,
            id: row.id,
        };
        review
            .validate()
            .map_err(|e| corrupt("reviews", e.to_string()))?;
        Ok(review)
    }
}

fn parse_date(table: &'static str, id: &str, raw: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| corrupt(table, format!("{id} (date '{raw}'): {e}")))
}

fn to_u32(table: &'static str, id: &str, field: &str, raw: i64) -> Result<u32, DatabaseError> {
    u32::try_from(raw).map_err(|e| corrupt(table, format!("{id} ({field}): {e}")))
}

impl ReviewStore for Database {
    fn load_reviews(&self) -> Result<Vec<Review>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, topic_id, subject, chapter, topic, difficulty, interval, due_date,
                    last_reviewed, times_reviewed, is_completed, notes, created_at
             FROM reviews
             ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ReviewRow {
                id: row.get(0)?,
                topic_id: row.get(1)?,
                subject: row.get(2)?,
                chapter: row.get(3)?,
                topic: row.get(4)?,
                difficulty: row.get(5)?,
                interval: row.get(6)?,
                due_date: row.get(7)?,
                last_reviewed: row.get(8)?,
                times_reviewed: row.get(9)?,
                is_completed: row.get(10)?,
                notes: row.get(11)?,
                created_at: row.get(12)?,
            })
        })?;

        let mut reviews = Vec::new();
        for row in rows {
            reviews.push(Review::try_from(row?)?);
        }
        Ok(reviews)
    }

    fn save_reviews(&self, reviews: &[Review]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM reviews", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO reviews (id, topic_id, subject, chapter, topic, difficulty, interval,
                                      due_date, last_reviewed, times_reviewed, is_completed, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for review in reviews {
                stmt.execute(params![
                    review.id,
                    review.topic_id,
                    review.subject.as_str(),
                    review.chapter,
                    review.topic,
                    review.difficulty.as_str(),
                    i64::try_from(review.interval).map_err(|e| {
                        DatabaseError::QueryFailed(format!("{} (interval): {e}", review.id))
                    })?,
                    review.due_date.to_iso(),
                    review.last_reviewed.map(|ts| ts.to_rfc3339()),
                    i64::from(review.times_reviewed),
                    review.is_completed,
                    review.notes,
                    review.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_review(&self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM reviews WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn load_events(&self) -> Result<Vec<ManualEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, date, time, event_type, description, created_at
             FROM events
             ORDER BY date, time",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (id, title, date, time, event_type, description, created_at) = row?;
            let date = parse_date("events", &id, &date)?;
            let time = parse_hhmm(&time).map_err(|e| corrupt("events", format!("{id}: {e}")))?;
            let event_type = event_type
                .parse::<EventType>()
                .map_err(|e| corrupt("events", format!("{id}: {e}")))?;
            events.push(ManualEvent {
                created_at: parse_timestamp("events", &created_at)?,
                id,
                title,
                date,
                time,
                event_type,
                description,
            });
        }
        Ok(events)
    }

    fn save_events(&self, events: &[ManualEvent]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM events", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO events (id, title, date, time, event_type, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for event in events {
                stmt.execute(params![
                    event.id,
                    event.title,
                    event.date.format("%Y-%m-%d").to_string(),
                    event.time.format("%H:%M").to_string(),
                    event.event_type.as_str(),
                    event.description,
                    event.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_streak(&self) -> Result<StreakState> {
        match self.kv_get(STREAK_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(StreakState::default()),
        }
    }

    fn save_streak(&self, streak: &StreakState) -> Result<()> {
        self.kv_set(STREAK_KEY, &serde_json::to_string(streak)?)
    }

    fn load_tests(&self) -> Result<Vec<TestSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, duration, total_questions, correct_answers, subject, chapter,
                    topics, score, created_at
             FROM test_sessions
             ORDER BY date, created_at",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                [row.get::<_, i64>(2)?, row.get::<_, i64>(3)?, row.get::<_, i64>(4)?],
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, i64>(8)?,
                row.get::<_, String>(9)?,
            ))
        })?;

        let mut tests = Vec::new();
        for row in rows {
            let (id, date, [duration, total, correct], subject, chapter, topics, score, created_at) =
                row?;
            let test = TestSession {
                date: parse_date("test_sessions", &id, &date)?,
                duration_minutes: to_u32("test_sessions", &id, "duration", duration)?,
                total_questions: to_u32("test_sessions", &id, "total_questions", total)?,
                correct_answers: to_u32("test_sessions", &id, "correct_answers", correct)?,
                subject: subject
                    .map(|raw| raw.parse::<Subject>())
                    .transpose()
                    .map_err(|e| corrupt("test_sessions", format!("{id}: {e}")))?,
                chapter,
                topics: serde_json::from_str(&topics)
                    .map_err(|e| corrupt("test_sessions", format!("{id} (topics): {e}")))?,
                score: to_u32("test_sessions", &id, "score", score)?,
                created_at: parse_timestamp("test_sessions", &created_at)?,
                id,
            };
            test.validate()
                .map_err(|e| corrupt("test_sessions", e.to_string()))?;
            tests.push(test);
        }
        Ok(tests)
    }

    fn save_tests(&self, tests: &[TestSession]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM test_sessions", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO test_sessions (id, date, duration, total_questions, correct_answers,
                                            subject, chapter, topics, score, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for test in tests {
                stmt.execute(params![
                    test.id,
                    test.date.format("%Y-%m-%d").to_string(),
                    i64::from(test.duration_minutes),
                    i64::from(test.total_questions),
                    i64::from(test.correct_answers),
                    test.subject.map(|s| s.as_str()),
                    test.chapter,
                    serde_json::to_string(&test.topics)?,
                    i64::from(test.score),
                    test.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_coverage(&self) -> Result<Vec<TopicCoverage>> {
        let mut stmt = self.conn.prepare(
            "SELECT topic_id, subject, chapter, topic, state, updated_at
             FROM coverage
             ORDER BY updated_at, topic_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut coverage = Vec::new();
        for row in rows {
            let (topic_id, subject, chapter, topic, state, updated_at) = row?;
            coverage.push(TopicCoverage {
                subject: subject
                    .parse::<Subject>()
                    .map_err(|e| corrupt("coverage", format!("{topic_id}: {e}")))?,
                state: state
                    .parse::<CoverageState>()
                    .map_err(|e| corrupt("coverage", format!("{topic_id}: {e}")))?,
                updated_at: parse_timestamp("coverage", &updated_at)?,
                topic_id,
                chapter,
                topic,
            });
        }
        Ok(coverage)
    }

    fn save_coverage(&self, coverage: &[TopicCoverage]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM coverage", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO coverage (topic_id, subject, chapter, topic, state, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for mark in coverage {
                stmt.execute(params![
                    mark.topic_id,
                    mark.subject.as_str(),
                    mark.chapter,
                    mark.topic,
                    mark.state.as_str(),
                    mark.updated_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::NewEvent;
    use crate::practice::NewTestSession;
    use crate::srs::{create_review, mark_complete, NewReview};
    use crate::syllabus::{set_coverage, CoverageUpdate};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 11, 30, 0).unwrap()
    }

    fn sample_review(topic: &str) -> Review {
        create_review(
            NewReview::new(topic, Subject::Chemistry, "Equilibrium", topic, Difficulty::Hard),
            now(),
        )
        .unwrap()
    }

    #[test]
    fn reviews_survive_a_round_trip() {
        let db = Database::open_memory().unwrap();
        let mut completed = mark_complete(&sample_review("ph"), now());
        completed.notes = Some("buffer solutions".into());
        let reviews = vec![completed, sample_review("le-chatelier")];

        db.save_reviews(&reviews).unwrap();
        let loaded = db.load_reviews().unwrap();
        assert_eq!(loaded.len(), 2);
        for review in &reviews {
            assert!(loaded.contains(review), "missing {}", review.id);
        }
    }

    #[test]
    fn save_replaces_the_collection() {
        let db = Database::open_memory().unwrap();
        db.save_reviews(&[sample_review("a"), sample_review("b")]).unwrap();
        let only = sample_review("c");
        db.save_reviews(std::slice::from_ref(&only)).unwrap();
        assert_eq!(db.load_reviews().unwrap(), vec![only]);
    }

    #[test]
    fn delete_review_removes_one_row() {
        let db = Database::open_memory().unwrap();
        let keep = sample_review("keep");
        let drop = sample_review("drop");
        db.save_reviews(&[keep.clone(), drop.clone()]).unwrap();
        db.delete_review(&drop.id).unwrap();
        assert_eq!(db.load_reviews().unwrap(), vec![keep]);
    }

    #[test]
    fn events_round_trip() {
        let db = Database::open_memory().unwrap();
        let event = ManualEvent::create(
            NewEvent {
                title: "Full mock".into(),
                date: NaiveDate::from_ymd_opt(2026, 11, 8).unwrap(),
                time: None,
                event_type: EventType::Mock,
                description: Some("Hall B".into()),
            },
            now(),
        );
        db.save_events(std::slice::from_ref(&event)).unwrap();
        assert_eq!(db.load_events().unwrap(), vec![event]);
    }

    #[test]
    fn streak_state_defaults_then_persists() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.load_streak().unwrap(), StreakState::default());
        let mut streak = StreakState::default();
        streak.use_restore(now().date_naive());
        db.save_streak(&streak).unwrap();
        assert_eq!(db.load_streak().unwrap(), streak);
    }

    #[test]
    fn corrupt_rows_are_reported() {
        let db = Database::open_memory().unwrap();
        db.save_reviews(&[sample_review("x")]).unwrap();
        db.conn()
            .execute("UPDATE reviews SET difficulty = 'Impossible'", [])
            .unwrap();
        let err = db.load_reviews().unwrap_err();
        assert!(err.to_string().contains("Corrupt row in 'reviews'"));
    }

    #[test]
    fn interval_past_the_ladder_is_corrupt() {
        let db = Database::open_memory().unwrap();
        db.save_reviews(&[sample_review("x")]).unwrap();
        db.conn()
            .execute("UPDATE reviews SET interval = 9", [])
            .unwrap();
        let err = db.load_reviews().unwrap_err();
        assert!(err.to_string().contains("past the last rung"), "{err}");
    }

    #[test]
    fn test_sessions_round_trip() {
        let db = Database::open_memory().unwrap();
        let test = TestSession::create(
            NewTestSession {
                date: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
                duration_minutes: 180,
                total_questions: 180,
                correct_answers: 141,
                subject: Some(Subject::Biology),
                chapter: Some("Genetics".into()),
                topics: vec!["Mendel".into(), "Linkage".into()],
            },
            now(),
        )
        .unwrap();
        let untagged = TestSession {
            id: "test-untagged".into(),
            subject: None,
            chapter: None,
            topics: Vec::new(),
            ..test.clone()
        };
        db.save_tests(&[test.clone(), untagged.clone()]).unwrap();
        let loaded = db.load_tests().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains(&test));
        assert!(loaded.contains(&untagged));

        db.conn()
            .execute("UPDATE test_sessions SET correct_answers = 500", [])
            .unwrap();
        assert!(db.load_tests().is_err());
    }

    #[test]
    fn coverage_round_trip() {
        let db = Database::open_memory().unwrap();
        let mut coverage = Vec::new();
        set_coverage(
            &mut coverage,
            CoverageUpdate {
                topic_id: "chem-sol-1".into(),
                subject: Subject::Chemistry,
                chapter: "Solutions".into(),
                topic: "Raoult's law".into(),
                state: CoverageState::InProgress,
            },
            now(),
        );
        db.save_coverage(&coverage).unwrap();
        assert_eq!(db.load_coverage().unwrap(), coverage);
        assert_eq!(db.load_profile().unwrap().coverage, coverage);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }
}
