use axum::http::{request::Parts, HeaderValue};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use whatif::config::CorsConfig;
use whatif::simulator::{NewRun, RepositoryError, RunId, RunRecord, RunRepository, RunSummary};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps runs for the lifetime of the process; used by the CLI demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRunRepository {
    records: Arc<Mutex<Vec<RunRecord>>>,
}

impl RunRepository for InMemoryRunRepository {
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

/// Browser access for the configured origins plus netlify previews.
pub(crate) fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let config = config.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| config.allows(origin))
                    .unwrap_or(false)
            },
        ))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whatif::simulator::{demo_request, ScenarioEngine};

    fn new_run(title: &str) -> NewRun {
        let input = demo_request().input();
        NewRun {
            title: title.to_string(),
            decision_text: demo_request().decision_text,
            input,
            output: ScenarioEngine::standard().compute(&input),
        }
    }

    #[test]
    fn in_memory_repository_lists_newest_first() {
        let repository = InMemoryRunRepository::default();
        let first = repository.insert(new_run("first")).expect("insert succeeds");
        let second = repository.insert(new_run("second")).expect("insert succeeds");

        let recent = repository.recent(10).expect("listing succeeds");
        assert_eq!(
            recent.iter().map(|run| run.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert_eq!(
            repository
                .fetch(first.id)
                .expect("fetch succeeds")
                .map(|record| record.title),
            Some("first".to_string())
        );
        assert!(repository.fetch(RunId(9)).expect("fetch succeeds").is_none());
    }
}
