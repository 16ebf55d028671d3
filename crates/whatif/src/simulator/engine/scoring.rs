use crate::simulator::domain::{Priorities, RiskTolerance};

pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

pub(crate) fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

/// Rounds half-to-even at the given number of decimals.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Higher volatility raises risk; a larger cash buffer and higher declared tolerance lower it.
pub fn score_risk(tolerance: RiskTolerance, volatility: f64, cash_buffer_months: f64) -> f64 {
    let raw = (volatility - 0.35) * 1.1
        - (cash_buffer_months - 2.5) * 0.22
        - (tolerance.baseline() - 0.55) * 0.35;
    clamp_unit(sigmoid(raw))
}

/// More free time, a longer horizon and a likelier offer all widen optionality.
pub fn score_optionality(time_per_week: f64, horizon_months: f64, offer_probability: f64) -> f64 {
    let raw = (time_per_week - 8.0) * 0.08
        + (horizon_months - 6.0) * 0.03
        + (offer_probability - 0.5) * 0.8;
    clamp_unit(sigmoid(raw))
}

pub fn score_stress(volatility: f64, time_per_week: f64, income_gap: f64) -> f64 {
    let raw = (volatility - 0.4) * 1.2 + (time_per_week - 10.0) * 0.06 + (income_gap / 5000.0) * 0.9;
    clamp_unit(sigmoid(raw))
}

/// Where the income midpoint sits between current expenses and the target income.
pub fn income_score(income_center: f64, expenses: f64, target_income: f64) -> f64 {
    clamp_unit((income_center - expenses) / (target_income - expenses).max(1.0))
}

pub fn learning_score(time_per_week: f64) -> f64 {
    clamp_unit((time_per_week - 2.0) / 18.0)
}

/// The five ingredients a fit score is blended from, keyed like [`Priorities`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientScores {
    pub growth: f64,
    pub stability: f64,
    pub income: f64,
    pub learning: f64,
    pub stress: f64,
}

/// Priority-weighted mean of the ingredients. Stress counts as `1 - stress`; an all-zero
/// weight set divides by one instead of zero.
pub fn weighted_fit(priorities: &Priorities, scores: &IngredientScores) -> f64 {
    let weights = priorities.clamped();
    let pairs = [
        (weights.growth, scores.growth),
        (weights.stability, scores.stability),
        (weights.income, scores.income),
        (weights.learning, scores.learning),
        (weights.stress, 1.0 - scores.stress),
    ];

    let total: u32 = pairs.iter().map(|(weight, _)| u32::from(*weight)).sum();
    let denominator = if total == 0 { 1.0 } else { f64::from(total) };
    let weighted: f64 = pairs
        .iter()
        .map(|(weight, value)| f64::from(*weight) * value)
        .sum();

    weighted / denominator
}
