use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::simulator::domain::SimulationInput;
use crate::simulator::report::SimulationOutput;

/// Cap applied when listing recent runs.
pub const RECENT_RUN_LIMIT: usize = 50;

/// Identifier assigned by the repository on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub i64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input/output pair awaiting storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRun {
    pub title: String,
    pub decision_text: String,
    pub input: SimulationInput,
    pub output: SimulationOutput,
}

/// Stored simulation, kept so the output can be reproduced and audited later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub decision_text: String,
    pub input: SimulationInput,
    pub output: SimulationOutput,
}

impl RunRecord {
    pub fn from_new(id: RunId, created_at: DateTime<Utc>, run: NewRun) -> Self {
        Self {
            id,
            created_at,
            title: run.title,
            decision_text: run.decision_text,
            input: run.input,
            output: run.output,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            id: self.id,
            created_at: self.created_at,
            title: self.title.clone(),
        }
    }
}

/// Listing entry returned by [`RunRepository::recent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: RunId,
    pub created_at: DateTime<Utc>,
    pub title: String,
}

/// Storage abstraction so the service can be exercised without a database.
pub trait RunRepository: Send + Sync {
    fn insert(&self, run: NewRun) -> Result<RunRecord, RepositoryError>;
    fn fetch(&self, id: RunId) -> Result<Option<RunRecord>, RepositoryError>;
    /// Newest first, at most `limit` entries.
    fn recent(&self, limit: usize) -> Result<Vec<RunSummary>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("run not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored run could not be encoded or decoded: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}
