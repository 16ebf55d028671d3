use crate::config::ConfigError;
use crate::simulator::domain::ValidationError;
use crate::simulator::narrative::NarrativeError;
use crate::simulator::runs::RepositoryError;
use crate::simulator::service::SimulationServiceError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("narrative error: {0}")]
    Narrative(#[from] NarrativeError),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SimulationServiceError> for AppError {
    fn from(value: SimulationServiceError) -> Self {
        match value {
            SimulationServiceError::Validation(err) => Self::Validation(err),
            SimulationServiceError::Repository(err) => Self::Repository(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::Json(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Repository(_)
            | AppError::Narrative(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
