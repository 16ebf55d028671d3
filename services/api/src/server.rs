use crate::cli::ServeArgs;
use crate::infra::{cors_layer, AppState};
use crate::routes::with_simulation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use whatif::config::AppConfig;
use whatif::error::AppError;
use whatif::simulator::{ConfiguredNarrator, SimulationService, SqliteRunRepository};
use whatif::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = if config.storage.is_in_memory() {
        warn!("APP_DATABASE_PATH is :memory:; runs will not survive a restart");
        SqliteRunRepository::in_memory()?
    } else {
        SqliteRunRepository::open(&config.storage.database_path)?
    };
    let narrator = ConfiguredNarrator::from_config(&config.narrative)?;
    info!(
        narrative_enabled = narrator.is_enabled(),
        database = %config.storage.database_path,
        "collaborators initialised"
    );

    let simulation_service = Arc::new(
        SimulationService::new(Arc::new(repository), Arc::new(narrator))
            .with_narrative_timeout(config.narrative.timeout),
    );

    let app = with_simulation_routes(simulation_service)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.cors))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "whatif decision engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
