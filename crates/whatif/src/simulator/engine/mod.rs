mod profile;
mod scoring;

pub use profile::{AssumptionNote, ScenarioProfile, ACT_NOW, DELAY, HEDGE, STANDARD_PROFILES};
pub use scoring::{
    income_score, learning_score, score_optionality, score_risk, score_stress, weighted_fit,
    IngredientScores,
};

use super::domain::{
    Assumptions, Constraints, Horizon, Priorities, RiskTolerance, SimulationInput,
    MAX_HOURS_PER_WEEK,
};
use super::report::{
    Comparison, Facts, Governance, RankingEntry, Scenario, ScenarioSignals, SimulationOutput,
    RANKING_NOTE,
};
use scoring::{clamp_unit, round_to};

const FIT_SCORE_DECIMALS: i32 = 4;

/// Stateless evaluator applying a fixed table of scenario profiles to an input.
#[derive(Debug, Clone)]
pub struct ScenarioEngine {
    profiles: Vec<ScenarioProfile>,
}

impl Default for ScenarioEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Input-wide quantities shared by every profile.
#[derive(Debug, Clone, Copy)]
struct BaseSignals {
    horizon_months: f64,
    risk: f64,
    optionality: f64,
    income_gap: f64,
}

impl BaseSignals {
    fn derive(input: &SimulationInput) -> Self {
        let Constraints {
            monthly_expenses,
            savings_months,
            time_per_week_hours,
        } = input.constraints;
        let Assumptions {
            offer_probability,
            market_volatility,
            baseline_income_monthly,
            ..
        } = input.assumptions;
        let horizon_months = f64::from(input.horizon.months());

        Self {
            horizon_months,
            risk: score_risk(input.risk_tolerance, market_volatility, savings_months),
            optionality: score_optionality(
                f64::from(time_per_week_hours),
                horizon_months,
                offer_probability,
            ),
            income_gap: (monthly_expenses - baseline_income_monthly).max(0.0),
        }
    }
}

impl ScenarioEngine {
    /// Act Now, Delay and Hedge, in that order.
    pub fn standard() -> Self {
        Self::with_profiles(STANDARD_PROFILES.to_vec())
    }

    pub fn with_profiles(profiles: Vec<ScenarioProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[ScenarioProfile] {
        &self.profiles
    }

    pub fn compute(&self, input: &SimulationInput) -> SimulationOutput {
        let base = BaseSignals::derive(input);

        let evaluated: Vec<(Scenario, f64)> = self
            .profiles
            .iter()
            .map(|profile| evaluate_profile(profile, input, &base))
            .collect();

        // sort_by is stable: equal fits keep generation order
        let mut ranked: Vec<(&str, f64)> = evaluated
            .iter()
            .map(|(scenario, fit)| (scenario.name.as_str(), *fit))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let comparison = Comparison {
            ranking: ranked
                .into_iter()
                .map(|(name, fit)| RankingEntry {
                    name: name.to_string(),
                    fit_score: round_to(fit, FIT_SCORE_DECIMALS),
                })
                .collect(),
            note: RANKING_NOTE.to_string(),
        };

        SimulationOutput {
            facts: Facts {
                horizon_months: input.horizon.months(),
                risk_tolerance: input.risk_tolerance,
                priorities: input.priorities,
                constraints: input.constraints,
                assumptions: input.assumptions,
                governance: Governance::default(),
            },
            scenarios: evaluated.into_iter().map(|(scenario, _)| scenario).collect(),
            comparison,
        }
    }
}

/// Evaluates the standard scenario table for one decision.
pub fn compute_signals(
    horizon: Horizon,
    risk_tolerance: RiskTolerance,
    priorities: &Priorities,
    constraints: &Constraints,
    assumptions: &Assumptions,
) -> SimulationOutput {
    let input = SimulationInput {
        horizon,
        risk_tolerance,
        priorities: *priorities,
        constraints: *constraints,
        assumptions: *assumptions,
    };
    ScenarioEngine::standard().compute(&input)
}

fn evaluate_profile(
    profile: &ScenarioProfile,
    input: &SimulationInput,
    base: &BaseSignals,
) -> (Scenario, f64) {
    let Assumptions {
        offer_probability,
        market_volatility,
        baseline_income_monthly,
        target_income_monthly,
        switching_cost,
    } = input.assumptions;
    let expenses = input.constraints.monthly_expenses;
    let hours = i32::from(input.constraints.time_per_week_hours);

    let risk = clamp_unit(base.risk + profile.risk_offset);
    let optionality = clamp_unit(
        base.optionality
            + profile.optionality_offset
            + profile.optionality_per_horizon_year * (base.horizon_months / 12.0),
    );
    let stress = score_stress(
        market_volatility + profile.stress_volatility_shift,
        f64::from(hours + profile.stress_hours_shift),
        base.income_gap + profile.stress_income_gap_shift,
    );

    let blend = profile.income_blend_base + profile.income_blend_per_offer * offer_probability;
    let income_center =
        baseline_income_monthly + (target_income_monthly - baseline_income_monthly) * blend;
    let spread =
        profile.income_spread_base + profile.income_spread_per_volatility * market_volatility;

    let ingredients = IngredientScores {
        growth: optionality,
        stability: clamp_unit(1.0 - risk),
        income: income_score(income_center, expenses, target_income_monthly),
        learning: learning_score(f64::from(hours + profile.learning_hours_shift)),
        stress,
    };
    let fit = weighted_fit(&input.priorities, &ingredients);

    let [low_hours, high_hours] = profile.time_cost_offsets;
    let [low_cost, high_cost] = profile.one_time_cost_multipliers;

    let signals = ScenarioSignals {
        growth_score: ingredients.growth,
        stability_score: ingredients.stability,
        income_score: ingredients.income,
        learning_score: ingredients.learning,
        stress_score: ingredients.stress,
        risk_score: risk,
        optionality_score: optionality,
        income_monthly_range: ordered([
            whole(income_center * (1.0 - spread)),
            whole(income_center * (1.0 + spread)),
        ]),
        time_cost_hours_per_week_range: ordered([
            weekly_hours(hours + low_hours),
            weekly_hours(hours + high_hours),
        ]),
        one_time_cost_range: ordered([
            whole(switching_cost * low_cost),
            whole(switching_cost * high_cost),
        ]),
        fit_score: round_to(fit, FIT_SCORE_DECIMALS),
    };

    let scenario = Scenario {
        name: profile.name.to_string(),
        summary: profile.summary.to_string(),
        assumptions: profile
            .notes
            .iter()
            .map(|note| note.render(input))
            .collect(),
        signals,
    };

    (scenario, fit)
}

fn whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}

fn weekly_hours(hours: i32) -> u8 {
    hours.clamp(0, i32::from(MAX_HOURS_PER_WEEK)) as u8
}

fn ordered<T: PartialOrd>(pair: [T; 2]) -> [T; 2] {
    let [first, second] = pair;
    if second < first {
        [second, first]
    } else {
        [first, second]
    }
}
