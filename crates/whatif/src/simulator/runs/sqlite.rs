use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use super::repository::{NewRun, RepositoryError, RunId, RunRecord, RunRepository, RunSummary};

const CREATE_SIMULATION_RUNS_SQL: &str = "
CREATE TABLE simulation_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    title TEXT NOT NULL,
    decision_text TEXT NOT NULL,
    inputs_json TEXT NOT NULL,
    output_json TEXT NOT NULL
);
CREATE INDEX idx_simulation_runs_created_at ON simulation_runs (created_at DESC, id DESC);
";

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(CREATE_SIMULATION_RUNS_SQL)])
}

/// SQLite-backed run store. Inputs and outputs are kept as JSON text.
pub struct SqliteRunRepository {
    connection: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteRunRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRunRepository").finish_non_exhaustive()
    }
}

impl SqliteRunRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let connection = Connection::open(path).map_err(map_sqlite_error)?;
        Self::from_connection(connection)
    }

    pub fn in_memory() -> Result<Self, RepositoryError> {
        let connection = Connection::open_in_memory().map_err(map_sqlite_error)?;
        Self::from_connection(connection)
    }

    fn from_connection(mut connection: Connection) -> Result<Self, RepositoryError> {
        migrations()
            .to_latest(&mut connection)
            .map_err(|err| RepositoryError::Unavailable(format!("migration failed: {err}")))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.connection
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection mutex poisoned".to_string()))
    }
}

impl RunRepository for SqliteRunRepository {
    fn insert(&self, run: NewRun) -> Result<RunRecord, RepositoryError> {
        let created_at = Utc::now();
        let inputs_json = serde_json::to_string(&run.input)?;
        let output_json = serde_json::to_string(&run.output)?;

        let connection = self.lock()?;
        connection
            .execute(
                "INSERT INTO simulation_runs (created_at, title, decision_text, inputs_json, output_json)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    format_timestamp(created_at),
                    run.title,
                    run.decision_text,
                    inputs_json,
                    output_json
                ],
            )
            .map_err(map_sqlite_error)?;
        let id = RunId(connection.last_insert_rowid());

        Ok(RunRecord::from_new(id, created_at, run))
    }

    fn fetch(&self, id: RunId) -> Result<Option<RunRecord>, RepositoryError> {
        let connection = self.lock()?;
        let row = connection
            .query_row(
                "SELECT id, created_at, title, decision_text, inputs_json, output_json
                 FROM simulation_runs WHERE id = ?1",
                params![id.0],
                StoredRun::from_row,
            )
            .optional()
            .map_err(map_sqlite_error)?;

        row.map(StoredRun::into_record).transpose()
    }

    fn recent(&self, limit: usize) -> Result<Vec<RunSummary>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let connection = self.lock()?;
        let mut statement = connection
            .prepare(
                "SELECT id, created_at, title FROM simulation_runs
                 ORDER BY created_at DESC, id DESC LIMIT ?1",
            )
            .map_err(map_sqlite_error)?;

        let rows = statement
            .query_map(params![limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(map_sqlite_error)?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, created_at, title) = row.map_err(map_sqlite_error)?;
            summaries.push(RunSummary {
                id: RunId(id),
                created_at: parse_timestamp(&created_at)?,
                title,
            });
        }
        Ok(summaries)
    }
}

struct StoredRun {
    id: i64,
    created_at: String,
    title: String,
    decision_text: String,
    inputs_json: String,
    output_json: String,
}

impl StoredRun {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            created_at: row.get(1)?,
            title: row.get(2)?,
            decision_text: row.get(3)?,
            inputs_json: row.get(4)?,
            output_json: row.get(5)?,
        })
    }

    fn into_record(self) -> Result<RunRecord, RepositoryError> {
        Ok(RunRecord {
            id: RunId(self.id),
            created_at: parse_timestamp(&self.created_at)?,
            title: self.title,
            decision_text: self.decision_text,
            input: serde_json::from_str(&self.inputs_json)?,
            output: serde_json::from_str(&self.output_json)?,
        })
    }
}

// fixed-width UTC text so lexical order matches chronological order
fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| RepositoryError::Serialization(format!("bad created_at '{raw}': {err}")))
}

fn map_sqlite_error(err: rusqlite::Error) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::demo::demo_request;
    use crate::simulator::engine::ScenarioEngine;

    fn new_run(title: &str) -> NewRun {
        let request = demo_request();
        let input = request.input();
        NewRun {
            title: title.to_string(),
            decision_text: request.decision_text.clone(),
            input,
            output: ScenarioEngine::standard().compute(&input),
        }
    }

    #[test]
    fn migrations_are_valid() {
        assert!(migrations().validate().is_ok());
    }

    #[test]
    fn insert_then_fetch_round_trips_payloads() {
        let repository = SqliteRunRepository::in_memory().expect("in-memory db opens");
        let stored = repository.insert(new_run("first")).expect("insert succeeds");

        let fetched = repository
            .fetch(stored.id)
            .expect("fetch succeeds")
            .expect("record present");

        assert_eq!(fetched.title, "first");
        assert_eq!(fetched.input, stored.input);
        assert_eq!(fetched.output, stored.output);
        assert_eq!(
            fetched.created_at.timestamp_micros(),
            stored.created_at.timestamp_micros()
        );
    }

    #[test]
    fn fetch_missing_returns_none() {
        let repository = SqliteRunRepository::in_memory().expect("in-memory db opens");
        assert!(repository.fetch(RunId(42)).expect("query runs").is_none());
    }

    #[test]
    fn recent_lists_newest_first_and_honours_limit() {
        let repository = SqliteRunRepository::in_memory().expect("in-memory db opens");
        for title in ["one", "two", "three"] {
            repository.insert(new_run(title)).expect("insert succeeds");
        }

        let recent = repository.recent(2).expect("listing succeeds");
        let titles: Vec<&str> = recent.iter().map(|run| run.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "two"]);
    }
}
