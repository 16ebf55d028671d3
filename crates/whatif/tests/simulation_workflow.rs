use std::sync::Arc;

use whatif::simulator::{
    compute_signals, demo_request, DisabledNarrator, Horizon, Priorities, RiskTolerance, RunId,
    RunRepository, ScenarioEngine, SimulationService, SqliteRunRepository,
};

fn temp_database(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("whatif-{name}-{}.db", std::process::id()))
}

#[test]
fn demo_decision_ranks_act_now_first() {
    let request = demo_request();
    let output = compute_signals(
        request.horizon,
        request.risk_tolerance,
        &request.priorities,
        &request.constraints,
        &request.assumptions,
    );

    let names: Vec<&str> = output
        .comparison
        .ranking
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(names, vec!["Act Now", "Hedge", "Delay"]);
    assert!(output.facts.governance.not_prediction);
    for scenario in &output.scenarios {
        assert!(scenario.assumptions.len() >= 3);
        assert!(!scenario.summary.is_empty());
    }
}

#[test]
fn stability_heavy_priorities_favour_delay() {
    let mut request = demo_request();
    request.risk_tolerance = RiskTolerance::Low;
    request.horizon = Horizon::TwentyFourMonths;
    request.priorities = Priorities {
        growth: 0,
        stability: 10,
        income: 0,
        learning: 0,
        stress: 10,
    };

    let output = ScenarioEngine::standard().compute(&request.input());
    assert_eq!(
        output.top_ranked().map(|entry| entry.name.as_str()),
        Some("Delay")
    );
}

#[tokio::test]
async fn sqlite_backed_service_round_trips_runs() {
    let path = temp_database("workflow");
    std::fs::remove_file(&path).ok();

    let repository = Arc::new(SqliteRunRepository::open(&path).expect("database opens"));
    let service = SimulationService::new(repository.clone(), Arc::new(DisabledNarrator));

    let mut request = demo_request();
    request.title = format!("  {}  ", "x".repeat(250));
    let response = service.simulate(request).await.expect("simulation succeeds");
    let seeded = service.seed_demo().expect("seed succeeds");

    let stored = service.get_run(response.run_id).expect("run stored");
    assert_eq!(stored.title.chars().count(), 200);
    assert_eq!(stored.output.scenarios, response.scenarios);
    assert_eq!(stored.output.comparison, response.comparison);

    let recent = service.recent_runs().expect("listing succeeds");
    assert_eq!(
        recent.iter().map(|run| run.id).collect::<Vec<_>>(),
        vec![seeded.run_id, response.run_id]
    );

    drop(service);
    drop(repository);
    let reopened = SqliteRunRepository::open(&path).expect("database reopens");
    let record = reopened
        .fetch(seeded.run_id)
        .expect("fetch succeeds")
        .expect("record survives reopen");
    assert_eq!(record.output, seeded.output);
    assert!(reopened.fetch(RunId(999)).expect("fetch succeeds").is_none());

    drop(reopened);
    std::fs::remove_file(&path).ok();
}
