use crate::infra::InMemoryRunRepository;
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use whatif::error::AppError;
use whatif::simulator::{
    demo_request, DisabledNarrator, ScenarioEngine, SimulationOutput, SimulationRequest,
    SimulationService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct SimulateArgs {
    /// JSON request file (same shape as POST /api/v1/simulate). Defaults to the demo decision.
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Print the raw engine output as JSON instead of the text report.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs { input, json } = args;

    let request = load_request(input)?;
    request.validate()?;
    let output = ScenarioEngine::standard().compute(&request.input());

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_report(&request.stored_title(), &output));
    }

    Ok(())
}

pub(crate) async fn run_demo() -> Result<(), AppError> {
    println!("WhatIf decision demo");
    let repository = Arc::new(InMemoryRunRepository::default());
    let service = SimulationService::new(repository, Arc::new(DisabledNarrator));

    let request = demo_request();
    println!("Decision: {}", request.decision_text);
    let response = match service.simulate(request).await {
        Ok(response) => response,
        Err(err) => {
            println!("  Simulation rejected: {}", err);
            return Ok(());
        }
    };

    let record = service.get_run(response.run_id)?;
    println!(
        "\nStored run #{} '{}' at {}",
        record.id,
        record.title,
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    print!("{}", render_report(&record.title, &record.output));

    match serde_json::to_string_pretty(&record.input) {
        Ok(json) => println!("\nStored input payload:\n{}", json),
        Err(err) => println!("\nStored input payload unavailable: {}", err),
    }

    Ok(())
}

fn load_request(path: Option<PathBuf>) -> Result<SimulationRequest, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(demo_request()),
    }
}

fn render_report(title: &str, output: &SimulationOutput) -> String {
    let mut out = String::new();
    let facts = &output.facts;

    let _ = writeln!(out, "\n{title}");
    let _ = writeln!(
        out,
        "Horizon {} months | risk tolerance {}",
        facts.horizon_months,
        facts.risk_tolerance.label()
    );

    let _ = writeln!(out, "\nRanking");
    for (position, entry) in output.comparison.ranking.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} (fit {:.4})",
            position + 1,
            entry.name,
            entry.fit_score
        );
    }
    let _ = writeln!(out, "  {}", output.comparison.note);

    for scenario in &output.scenarios {
        let signals = &scenario.signals;
        let _ = writeln!(out, "\n{}: {}", scenario.name, scenario.summary);
        let _ = writeln!(
            out,
            "  income/month {}..{} | time cost {}..{} h/week | one-time cost {}..{}",
            signals.income_monthly_range[0],
            signals.income_monthly_range[1],
            signals.time_cost_hours_per_week_range[0],
            signals.time_cost_hours_per_week_range[1],
            signals.one_time_cost_range[0],
            signals.one_time_cost_range[1]
        );
        let _ = writeln!(
            out,
            "  growth {:.2} | stability {:.2} | income {:.2} | learning {:.2} | stress {:.2}",
            signals.growth_score,
            signals.stability_score,
            signals.income_score,
            signals.learning_score,
            signals.stress_score
        );
        let _ = writeln!(
            out,
            "  risk {:.2} | optionality {:.2}",
            signals.risk_score, signals.optionality_score
        );
        for note in &scenario.assumptions {
            let _ = writeln!(out, "  - {note}");
        }
    }

    if facts.governance.not_prediction {
        let _ = writeln!(out, "\nNot a prediction. {}", facts.governance.rule);
    }

    out
}
