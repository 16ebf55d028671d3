//! Decision simulator: scenario engine plus the persistence and narrative seams around it.

pub mod demo;
pub mod domain;
pub mod engine;
pub mod narrative;
pub mod report;
pub mod router;
pub mod runs;
pub mod service;

#[cfg(test)]
mod tests;

pub use demo::demo_request;
pub use domain::{
    Assumptions, Constraints, Horizon, Priorities, RiskTolerance, SimulationInput,
    SimulationRequest, ValidationError,
};
pub use engine::{compute_signals, ScenarioEngine, ScenarioProfile};
pub use narrative::{
    ChatCompletionsNarrator, ConfiguredNarrator, DisabledNarrator, NarrativeError, Narrator,
};
pub use report::{
    Comparison, Facts, Governance, RankingEntry, Scenario, ScenarioSignals, SimulationOutput,
};
pub use router::simulation_router;
pub use runs::{
    NewRun, RepositoryError, RunId, RunRecord, RunRepository, RunSummary, SqliteRunRepository,
};
pub use service::{DemoSeed, SimulationResponse, SimulationService, SimulationServiceError};
