//! Durable storage for simulation runs.

pub mod repository;
mod sqlite;

pub use repository::{
    NewRun, RepositoryError, RunId, RunRecord, RunRepository, RunSummary, RECENT_RUN_LIMIT,
};
pub use sqlite::SqliteRunRepository;
