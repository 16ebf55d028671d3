use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::SimulationRequest;
use super::narrative::Narrator;
use super::runs::{RepositoryError, RunId, RunRepository};
use super::service::{SimulationService, SimulationServiceError};

/// Router builder exposing the simulation and run-history endpoints.
pub fn simulation_router<R, N>(service: Arc<SimulationService<R, N>>) -> Router
where
    R: RunRepository + 'static,
    N: Narrator + 'static,
{
    Router::new()
        .route("/api/v1/simulate", post(simulate_handler::<R, N>))
        .route("/api/v1/runs", get(list_runs_handler::<R, N>))
        .route("/api/v1/runs/:run_id", get(run_handler::<R, N>))
        .route("/api/v1/demo/seed", post(demo_seed_handler::<R, N>))
        .with_state(service)
}

pub(crate) async fn simulate_handler<R, N>(
    State(service): State<Arc<SimulationService<R, N>>>,
    axum::Json(request): axum::Json<SimulationRequest>,
) -> Response
where
    R: RunRepository + 'static,
    N: Narrator + 'static,
{
    match service.simulate(request).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_runs_handler<R, N>(
    State(service): State<Arc<SimulationService<R, N>>>,
) -> Response
where
    R: RunRepository + 'static,
    N: Narrator + 'static,
{
    match service.recent_runs() {
        Ok(runs) => (StatusCode::OK, axum::Json(runs)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn run_handler<R, N>(
    State(service): State<Arc<SimulationService<R, N>>>,
    Path(run_id): Path<i64>,
) -> Response
where
    R: RunRepository + 'static,
    N: Narrator + 'static,
{
    match service.get_run(RunId(run_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn demo_seed_handler<R, N>(
    State(service): State<Arc<SimulationService<R, N>>>,
) -> Response
where
    R: RunRepository + 'static,
    N: Narrator + 'static,
{
    match service.seed_demo() {
        Ok(seed) => (StatusCode::OK, axum::Json(seed)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: SimulationServiceError) -> Response {
    let status = match &error {
        SimulationServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SimulationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SimulationServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
