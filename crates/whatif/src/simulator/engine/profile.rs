use crate::simulator::domain::SimulationInput;

/// Human-readable line attached to a scenario. Variants other than `Fixed` quote the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssumptionNote {
    OfferProbability,
    MarketVolatility,
    CashBuffer,
    Fixed(&'static str),
}

impl AssumptionNote {
    pub fn render(self, input: &SimulationInput) -> String {
        match self {
            AssumptionNote::OfferProbability => format!(
                "Offer probability ≈ {}%",
                percent(input.assumptions.offer_probability)
            ),
            AssumptionNote::MarketVolatility => format!(
                "Market volatility ≈ {}%",
                percent(input.assumptions.market_volatility)
            ),
            AssumptionNote::CashBuffer => format!(
                "Cash buffer ≈ {:.1} months",
                input.constraints.savings_months
            ),
            AssumptionNote::Fixed(text) => text.to_string(),
        }
    }
}

fn percent(probability: f64) -> i64 {
    (probability * 100.0).round() as i64
}

/// Perturbation constants that give a scenario its identity.
///
/// All offsets apply to the shared base scores computed once per input; see
/// [`super::ScenarioEngine::compute`] for the evaluation order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioProfile {
    pub name: &'static str,
    pub summary: &'static str,
    pub notes: &'static [AssumptionNote],
    pub risk_offset: f64,
    pub optionality_offset: f64,
    /// Extra optionality per year of horizon.
    pub optionality_per_horizon_year: f64,
    pub stress_volatility_shift: f64,
    pub stress_hours_shift: i32,
    pub stress_income_gap_shift: f64,
    /// Share of the baseline-to-target income gap closed: `base + per_offer * offer_probability`.
    pub income_blend_base: f64,
    pub income_blend_per_offer: f64,
    /// Relative half-width of the income range: `base + per_volatility * volatility`.
    pub income_spread_base: f64,
    pub income_spread_per_volatility: f64,
    /// Offsets applied to `time_per_week_hours` for the displayed time-cost range.
    pub time_cost_offsets: [i32; 2],
    /// Offset applied to `time_per_week_hours` when scoring learning. Independent of
    /// `time_cost_offsets`.
    pub learning_hours_shift: i32,
    pub one_time_cost_multipliers: [f64; 2],
}

pub const ACT_NOW: ScenarioProfile = ScenarioProfile {
    name: "Act Now",
    summary: "Commit early. Higher upside potential, higher short-term disruption.",
    notes: &[
        AssumptionNote::OfferProbability,
        AssumptionNote::MarketVolatility,
        AssumptionNote::Fixed("You accept short-term instability to increase optionality."),
    ],
    risk_offset: 0.12,
    optionality_offset: 0.08,
    optionality_per_horizon_year: 0.0,
    stress_volatility_shift: 0.05,
    stress_hours_shift: 4,
    stress_income_gap_shift: 300.0,
    income_blend_base: 0.45,
    income_blend_per_offer: 0.45,
    income_spread_base: 0.18,
    income_spread_per_volatility: 0.25,
    time_cost_offsets: [2, 10],
    learning_hours_shift: 4,
    one_time_cost_multipliers: [0.8, 1.3],
};

pub const DELAY: ScenarioProfile = ScenarioProfile {
    name: "Delay",
    summary: "Stabilize first. Lower downside, slower optionality gains.",
    notes: &[
        AssumptionNote::CashBuffer,
        AssumptionNote::Fixed("You prioritize stability and controlled effort."),
        AssumptionNote::Fixed("Upside depends on sustained effort over time."),
    ],
    risk_offset: -0.10,
    optionality_offset: -0.05,
    optionality_per_horizon_year: 0.03,
    stress_volatility_shift: -0.03,
    stress_hours_shift: -1,
    stress_income_gap_shift: 0.0,
    income_blend_base: 0.25,
    income_blend_per_offer: 0.35,
    income_spread_base: 0.12,
    income_spread_per_volatility: 0.18,
    time_cost_offsets: [-2, 3],
    learning_hours_shift: 0,
    one_time_cost_multipliers: [0.3, 0.7],
};

pub const HEDGE: ScenarioProfile = ScenarioProfile {
    name: "Hedge",
    summary: "Split the difference. Keep stability while building optionality.",
    notes: &[
        AssumptionNote::Fixed("You invest steady effort while limiting downside."),
        AssumptionNote::Fixed("You accept moderate stress for better optionality."),
        AssumptionNote::Fixed("You keep more exit routes open."),
    ],
    risk_offset: -0.02,
    optionality_offset: 0.06,
    optionality_per_horizon_year: 0.0,
    stress_volatility_shift: 0.0,
    stress_hours_shift: 2,
    stress_income_gap_shift: 120.0,
    income_blend_base: 0.35,
    income_blend_per_offer: 0.40,
    income_spread_base: 0.14,
    income_spread_per_volatility: 0.20,
    time_cost_offsets: [0, 6],
    learning_hours_shift: 2,
    one_time_cost_multipliers: [0.5, 1.0],
};

/// Generation order of the standard scenarios.
pub const STANDARD_PROFILES: [ScenarioProfile; 3] = [ACT_NOW, DELAY, HEDGE];
