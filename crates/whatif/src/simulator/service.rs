use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::demo::demo_request;
use super::domain::{SimulationRequest, ValidationError};
use super::engine::ScenarioEngine;
use super::narrative::{NarrativeError, Narrator};
use super::report::{Comparison, Facts, Scenario, SimulationOutput};
use super::runs::{
    NewRun, RepositoryError, RunId, RunRecord, RunRepository, RunSummary, RECENT_RUN_LIMIT,
};

pub const DEFAULT_NARRATIVE_TIMEOUT: Duration = Duration::from_secs(25);

/// Service composing the scenario engine, run repository, and optional narrator.
pub struct SimulationService<R, N> {
    engine: Arc<ScenarioEngine>,
    repository: Arc<R>,
    narrator: Arc<N>,
    narrative_timeout: Duration,
}

/// Body returned for a completed simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResponse {
    pub run_id: RunId,
    pub facts: Facts,
    pub scenarios: Vec<Scenario>,
    pub comparison: Comparison,
    pub narrative_summary: Option<String>,
}

/// Result of storing the documented demo decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoSeed {
    pub run_id: RunId,
    pub input: SimulationRequest,
    pub output: SimulationOutput,
}

impl<R, N> SimulationService<R, N>
where
    R: RunRepository + 'static,
    N: Narrator + 'static,
{
    pub fn new(repository: Arc<R>, narrator: Arc<N>) -> Self {
        Self {
            engine: Arc::new(ScenarioEngine::standard()),
            repository,
            narrator,
            narrative_timeout: DEFAULT_NARRATIVE_TIMEOUT,
        }
    }

    pub fn with_narrative_timeout(mut self, timeout: Duration) -> Self {
        self.narrative_timeout = timeout;
        self
    }

    pub fn engine(&self) -> &ScenarioEngine {
        &self.engine
    }

    /// Validate, compute, persist, then optionally narrate a decision.
    pub async fn simulate(
        &self,
        request: SimulationRequest,
    ) -> Result<SimulationResponse, SimulationServiceError> {
        request.validate()?;

        let input = request.input();
        let output = self.engine.compute(&input);

        let record = self.repository.insert(NewRun {
            title: request.stored_title(),
            decision_text: request.decision_text.clone(),
            input,
            output: output.clone(),
        })?;
        info!(
            run_id = %record.id,
            top = output.top_ranked().map(|entry| entry.name.as_str()).unwrap_or("-"),
            "simulation run persisted"
        );

        let narrative_summary = if request.use_narrative {
            self.narrate(&output).await
        } else {
            None
        };

        let SimulationOutput {
            facts,
            scenarios,
            comparison,
        } = output;

        Ok(SimulationResponse {
            run_id: record.id,
            facts,
            scenarios,
            comparison,
            narrative_summary,
        })
    }

    /// Best effort: any narrator failure or timeout collapses to `None`.
    async fn narrate(&self, output: &SimulationOutput) -> Option<String> {
        let seconds = self.narrative_timeout.as_secs();
        let outcome =
            match tokio::time::timeout(self.narrative_timeout, self.narrator.summarize(output))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(NarrativeError::Timeout { seconds }),
            };

        match outcome {
            Ok(summary) => Some(summary),
            Err(NarrativeError::Disabled) => {
                debug!("narrative requested but no narrator is configured");
                None
            }
            Err(error) => {
                warn!(%error, "narrative generation failed; returning scenarios without summary");
                None
            }
        }
    }

    pub fn get_run(&self, id: RunId) -> Result<RunRecord, SimulationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn recent_runs(&self) -> Result<Vec<RunSummary>, SimulationServiceError> {
        Ok(self.repository.recent(RECENT_RUN_LIMIT)?)
    }

    /// Store the documented demo decision; the narrator is never consulted.
    pub fn seed_demo(&self) -> Result<DemoSeed, SimulationServiceError> {
        let request = demo_request();
        let input = request.input();
        let output = self.engine.compute(&input);

        let record = self.repository.insert(NewRun {
            title: request.stored_title(),
            decision_text: request.decision_text.clone(),
            input,
            output: output.clone(),
        })?;
        info!(run_id = %record.id, "demo run seeded");

        Ok(DemoSeed {
            run_id: record.id,
            input: request,
            output,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
