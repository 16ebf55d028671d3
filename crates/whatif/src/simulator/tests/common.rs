use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::simulator::demo::demo_request;
use crate::simulator::domain::{SimulationInput, SimulationRequest};
use crate::simulator::narrative::{NarrativeError, Narrator};
use crate::simulator::report::SimulationOutput;
use crate::simulator::runs::{
    NewRun, RepositoryError, RunId, RunRecord, RunRepository, RunSummary,
};
use crate::simulator::{simulation_router, SimulationService};

pub(super) fn demo_input() -> SimulationInput {
    demo_request().input()
}

pub(super) fn narrated_request() -> SimulationRequest {
    SimulationRequest {
        use_narrative: true,
        ..demo_request()
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<Vec<RunRecord>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl RunRepository for MemoryRepository {
    fn insert(&self, run: NewRun) -> Result<RunRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let id = RunId(guard.len() as i64 + 1);
        let record = RunRecord::from_new(id, Utc::now(), run);
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: RunId) -> Result<Option<RunRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| record.id == id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<RunSummary>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .take(limit)
            .map(RunRecord::summary)
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl RunRepository for UnavailableRepository {
    fn insert(&self, _run: NewRun) -> Result<RunRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: RunId) -> Result<Option<RunRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<RunSummary>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Returns a fixed summary and records the outputs it was shown.
#[derive(Default)]
pub(super) struct CannedNarrator {
    seen: Mutex<Vec<SimulationOutput>>,
}

impl CannedNarrator {
    pub(super) const SUMMARY: &'static str = "If growth matters most, Act Now scores highest.";

    pub(super) fn seen(&self) -> Vec<SimulationOutput> {
        self.seen.lock().expect("narrator mutex poisoned").clone()
    }
}

impl Narrator for CannedNarrator {
    async fn summarize(&self, output: &SimulationOutput) -> Result<String, NarrativeError> {
        self.seen
            .lock()
            .expect("narrator mutex poisoned")
            .push(output.clone());
        Ok(Self::SUMMARY.to_string())
    }
}

pub(super) struct FailingNarrator;

impl Narrator for FailingNarrator {
    async fn summarize(&self, _output: &SimulationOutput) -> Result<String, NarrativeError> {
        Err(NarrativeError::Status(401))
    }
}

pub(super) struct SlowNarrator;

impl Narrator for SlowNarrator {
    async fn summarize(&self, _output: &SimulationOutput) -> Result<String, NarrativeError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

pub(super) fn build_service() -> (
    SimulationService<MemoryRepository, CannedNarrator>,
    Arc<MemoryRepository>,
    Arc<CannedNarrator>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let narrator = Arc::new(CannedNarrator::default());
    let service = SimulationService::new(repository.clone(), narrator.clone());
    (service, repository, narrator)
}

pub(super) fn router_with_service(
    service: SimulationService<MemoryRepository, CannedNarrator>,
) -> axum::Router {
    simulation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
