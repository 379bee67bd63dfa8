//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the local SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mindmate_core::domain::{
    JournalEntry, Mood, MoodObservation, MoodSignal, SignalSource, TIMESTAMP_FORMAT,
};
use mindmate_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a single-connection pool, so every write is serialized.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// A helper function to run database migrations at startup.
    /// Every statement is `CREATE TABLE IF NOT EXISTS`, so this is idempotent.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> PortResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|e| PortError::Malformed(format!("stored date '{}': {}", raw, e)))
}

fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct JournalEntryRecord {
    id: i64,
    date: String,
    content: String,
    mood: String,
    polarity: f64,
}
impl JournalEntryRecord {
    fn to_domain(self) -> PortResult<JournalEntry> {
        Ok(JournalEntry {
            id: self.id,
            recorded_at: parse_timestamp(&self.date)?,
            content: self.content,
            mood: Mood::from_label(&self.mood),
            polarity: self.polarity,
        })
    }
}

#[derive(FromRow)]
struct MoodSignalRecord {
    id: i64,
    date: String,
    source: String,
    content: String,
    mood: String,
    polarity: f64,
}
impl MoodSignalRecord {
    fn to_domain(self) -> PortResult<MoodSignal> {
        Ok(MoodSignal {
            id: self.id,
            recorded_at: parse_timestamp(&self.date)?,
            source: self.source.parse().map_err(PortError::Malformed)?,
            content: self.content,
            mood: Mood::from_label(&self.mood),
            polarity: self.polarity,
        })
    }
}

#[derive(FromRow)]
struct MoodRecord {
    date: String,
    mood: String,
}
impl MoodRecord {
    fn to_domain(self) -> PortResult<MoodObservation> {
        Ok(MoodObservation {
            recorded_at: parse_timestamp(&self.date)?,
            label: self.mood,
        })
    }
}

//=========================================================================================
// Insert Statements (shared by single writes and transactions)
//=========================================================================================

async fn insert_journal_entry(
    conn: &mut SqliteConnection,
    recorded_at: NaiveDateTime,
    content: &str,
    mood: Mood,
    polarity: f64,
) -> PortResult<JournalEntry> {
    let record = sqlx::query_as::<_, JournalEntryRecord>(
        "INSERT INTO journal_entries (date, content, mood, polarity) VALUES (?, ?, ?, ?) \
         RETURNING id, date, content, mood, polarity",
    )
    .bind(format_timestamp(recorded_at))
    .bind(content)
    .bind(mood.as_str())
    .bind(polarity)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_error)?;
    record.to_domain()
}

async fn insert_mood_signal(
    conn: &mut SqliteConnection,
    recorded_at: NaiveDateTime,
    source: SignalSource,
    content: &str,
    mood: Mood,
    polarity: f64,
) -> PortResult<MoodSignal> {
    let record = sqlx::query_as::<_, MoodSignalRecord>(
        "INSERT INTO mood_signals (date, source, content, mood, polarity) VALUES (?, ?, ?, ?, ?) \
         RETURNING id, date, source, content, mood, polarity",
    )
    .bind(format_timestamp(recorded_at))
    .bind(source.as_str())
    .bind(content)
    .bind(mood.as_str())
    .bind(polarity)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_error)?;
    record.to_domain()
}

fn db_error(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_journal_entry(
        &self,
        recorded_at: NaiveDateTime,
        content: &str,
        mood: Mood,
        polarity: f64,
    ) -> PortResult<JournalEntry> {
        let mut conn = self.pool.acquire().await.map_err(db_error)?;
        insert_journal_entry(&mut conn, recorded_at, content, mood, polarity).await
    }

    async fn record_journal_entry(
        &self,
        recorded_at: NaiveDateTime,
        content: &str,
        mood: Mood,
        polarity: f64,
    ) -> PortResult<JournalEntry> {
        // Dropping `tx` on an early return rolls back the journal row.
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let entry = insert_journal_entry(&mut tx, recorded_at, content, mood, polarity).await?;
        insert_mood_signal(&mut tx, recorded_at, SignalSource::Journal, content, mood, polarity)
            .await?;
        tx.commit().await.map_err(db_error)?;
        Ok(entry)
    }

    async fn get_recent_journal_entries(&self, limit: usize) -> PortResult<Vec<JournalEntry>> {
        let records = sqlx::query_as::<_, JournalEntryRecord>(
            "SELECT id, date, content, mood, polarity FROM journal_entries \
             ORDER BY date DESC, id DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_journal_moods(&self) -> PortResult<Vec<MoodObservation>> {
        let records = sqlx::query_as::<_, MoodRecord>(
            "SELECT date, mood FROM journal_entries ORDER BY date ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn create_mood_signal(
        &self,
        recorded_at: NaiveDateTime,
        source: SignalSource,
        content: &str,
        mood: Mood,
        polarity: f64,
    ) -> PortResult<MoodSignal> {
        let mut conn = self.pool.acquire().await.map_err(db_error)?;
        insert_mood_signal(&mut conn, recorded_at, source, content, mood, polarity).await
    }

    async fn get_mood_signals(&self, sources: &[SignalSource]) -> PortResult<Vec<MoodObservation>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT date, mood FROM mood_signals");
        if !sources.is_empty() {
            query.push(" WHERE source IN (");
            let mut separated = query.separated(", ");
            for source in sources {
                separated.push_bind(source.as_str());
            }
            separated.push_unseparated(")");
        }
        query.push(" ORDER BY date ASC, id ASC");

        let records = query
            .build_query_as::<MoodRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }
}
