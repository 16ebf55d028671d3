use super::domain::{
    Assumptions, Constraints, Horizon, Priorities, RiskTolerance, SimulationRequest,
};

/// Documented sample decision used by the seed endpoint and the CLI demo.
pub fn demo_request() -> SimulationRequest {
    SimulationRequest {
        title: "Job Offer vs Wait".to_string(),
        decision_text: "Should I accept Job A now (stable but lower growth) or wait 6 months \
                        for a potentially better role while improving my skills?"
            .to_string(),
        horizon: Horizon::SixMonths,
        risk_tolerance: RiskTolerance::Medium,
        priorities: Priorities {
            growth: 8,
            stability: 5,
            income: 6,
            learning: 7,
            stress: 4,
        },
        constraints: Constraints {
            monthly_expenses: 2600.0,
            savings_months: 3.5,
            time_per_week_hours: 12,
        },
        assumptions: Assumptions {
            offer_probability: 0.58,
            market_volatility: 0.45,
            baseline_income_monthly: 4800.0,
            target_income_monthly: 6500.0,
            switching_cost: 1400.0,
        },
        use_narrative: false,
    }
}
