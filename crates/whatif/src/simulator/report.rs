use serde::{Deserialize, Serialize};

use super::domain::{Assumptions, Constraints, Priorities, RiskTolerance};

pub const GOVERNANCE_RULE: &str =
    "Any explanation must only use the facts + scenario outputs below.";
pub const RANKING_NOTE: &str =
    "Ranking is based on your priorities only. It is NOT a prediction.";

/// Complete engine output, handed verbatim to persistence and narrative collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub facts: Facts,
    /// Generation order (Act Now, Delay, Hedge), not rank order.
    pub scenarios: Vec<Scenario>,
    pub comparison: Comparison,
}

impl SimulationOutput {
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.name == name)
    }

    pub fn top_ranked(&self) -> Option<&RankingEntry> {
        self.comparison.ranking.first()
    }
}

/// Echo of the inputs the scenarios were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facts {
    pub horizon_months: u8,
    pub risk_tolerance: RiskTolerance,
    pub priorities: Priorities,
    pub constraints: Constraints,
    pub assumptions: Assumptions,
    pub governance: Governance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Governance {
    pub not_prediction: bool,
    pub rule: String,
}

impl Default for Governance {
    fn default() -> Self {
        Self {
            not_prediction: true,
            rule: GOVERNANCE_RULE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub summary: String,
    pub assumptions: Vec<String>,
    pub signals: ScenarioSignals,
}

/// Per-scenario scores and ranges. Every `*_score` field lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSignals {
    pub growth_score: f64,
    pub stability_score: f64,
    pub income_score: f64,
    pub learning_score: f64,
    /// Higher means more stress.
    pub stress_score: f64,
    pub risk_score: f64,
    pub optionality_score: f64,
    pub income_monthly_range: [i64; 2],
    pub time_cost_hours_per_week_range: [u8; 2],
    pub one_time_cost_range: [i64; 2],
    pub fit_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub ranking: Vec<RankingEntry>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub fit_score: f64,
}
