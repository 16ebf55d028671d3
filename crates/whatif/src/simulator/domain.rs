use serde::{Deserialize, Serialize};

/// Planning timeframe declared by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "12m")]
    TwelveMonths,
    #[serde(rename = "24m")]
    TwentyFourMonths,
}

impl Horizon {
    pub const fn months(self) -> u8 {
        match self {
            Horizon::OneMonth => 1,
            Horizon::ThreeMonths => 3,
            Horizon::SixMonths => 6,
            Horizon::TwelveMonths => 12,
            Horizon::TwentyFourMonths => 24,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Horizon::OneMonth => "1m",
            Horizon::ThreeMonths => "3m",
            Horizon::SixMonths => "6m",
            Horizon::TwelveMonths => "12m",
            Horizon::TwentyFourMonths => "24m",
        }
    }
}

/// Declared appetite for uncertainty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTolerance {
    /// Numeric tolerance baseline fed into the risk score.
    pub const fn baseline(self) -> f64 {
        match self {
            RiskTolerance::Low => 0.35,
            RiskTolerance::Medium => 0.55,
            RiskTolerance::High => 0.75,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
        }
    }
}

pub const MAX_PRIORITY_WEIGHT: u8 = 10;
pub const MAX_HOURS_PER_WEEK: u8 = 80;
pub const MIN_DECISION_TEXT_CHARS: usize = 10;
pub const MAX_TITLE_CHARS: usize = 200;

/// Integer weights (0..=10) for the five scored dimensions.
///
/// `stress` expresses how much the user cares about keeping stress *low*; the engine inverts
/// the stress ingredient when weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Priorities {
    pub growth: u8,
    pub stability: u8,
    pub income: u8,
    pub learning: u8,
    pub stress: u8,
}

impl Default for Priorities {
    fn default() -> Self {
        Self {
            growth: 7,
            stability: 6,
            income: 6,
            learning: 7,
            stress: 5,
        }
    }
}

impl Priorities {
    pub fn entries(&self) -> [(&'static str, u8); 5] {
        [
            ("growth", self.growth),
            ("stability", self.stability),
            ("income", self.income),
            ("learning", self.learning),
            ("stress", self.stress),
        ]
    }

    /// Copy with every weight capped at [`MAX_PRIORITY_WEIGHT`].
    pub fn clamped(&self) -> Self {
        Self {
            growth: self.growth.min(MAX_PRIORITY_WEIGHT),
            stability: self.stability.min(MAX_PRIORITY_WEIGHT),
            income: self.income.min(MAX_PRIORITY_WEIGHT),
            learning: self.learning.min(MAX_PRIORITY_WEIGHT),
            stress: self.stress.min(MAX_PRIORITY_WEIGHT),
        }
    }
}

/// Hard limits on the user's situation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub monthly_expenses: f64,
    /// Cash buffer, in months of expenses.
    pub savings_months: f64,
    pub time_per_week_hours: u8,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            monthly_expenses: 2500.0,
            savings_months: 3.0,
            time_per_week_hours: 10,
        }
    }
}

/// User-supplied beliefs about the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub offer_probability: f64,
    pub market_volatility: f64,
    pub baseline_income_monthly: f64,
    pub target_income_monthly: f64,
    pub switching_cost: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            offer_probability: 0.55,
            market_volatility: 0.45,
            baseline_income_monthly: 4500.0,
            target_income_monthly: 6000.0,
            switching_cost: 1200.0,
        }
    }
}

/// Everything the scenario engine reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub horizon: Horizon,
    pub risk_tolerance: RiskTolerance,
    pub priorities: Priorities,
    pub constraints: Constraints,
    pub assumptions: Assumptions,
}

impl SimulationInput {
    /// Boundary checks; the engine itself never rejects input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (dimension, value) in self.priorities.entries() {
            if value > MAX_PRIORITY_WEIGHT {
                return Err(ValidationError::PriorityOutOfRange { dimension, value });
            }
        }

        let Constraints {
            monthly_expenses,
            savings_months,
            time_per_week_hours,
        } = self.constraints;
        ensure_non_negative("monthly_expenses", monthly_expenses)?;
        ensure_non_negative("savings_months", savings_months)?;
        if time_per_week_hours > MAX_HOURS_PER_WEEK {
            return Err(ValidationError::TimeBudgetOutOfRange(time_per_week_hours));
        }

        let assumptions = &self.assumptions;
        ensure_probability("offer_probability", assumptions.offer_probability)?;
        ensure_probability("market_volatility", assumptions.market_volatility)?;
        ensure_non_negative(
            "baseline_income_monthly",
            assumptions.baseline_income_monthly,
        )?;
        ensure_non_negative("target_income_monthly", assumptions.target_income_monthly)?;
        ensure_non_negative("switching_cost", assumptions.switching_cost)?;

        Ok(())
    }
}

fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeAmount { field })
    }
}

fn ensure_probability(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ProbabilityOutOfRange { field })
    }
}

fn default_title() -> String {
    "My decision".to_string()
}

/// Raw request accepted at the HTTP/CLI boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(default = "default_title")]
    pub title: String,
    pub decision_text: String,
    #[serde(default)]
    pub horizon: Horizon,
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub priorities: Priorities,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub assumptions: Assumptions,
    #[serde(default)]
    pub use_narrative: bool,
}

impl SimulationRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.decision_text.chars().count() < MIN_DECISION_TEXT_CHARS {
            return Err(ValidationError::DecisionTextTooShort {
                min: MIN_DECISION_TEXT_CHARS,
            });
        }
        self.input().validate()
    }

    pub fn input(&self) -> SimulationInput {
        SimulationInput {
            horizon: self.horizon,
            risk_tolerance: self.risk_tolerance,
            priorities: self.priorities,
            constraints: self.constraints,
            assumptions: self.assumptions,
        }
    }

    /// Title as persisted: trimmed and capped at [`MAX_TITLE_CHARS`] characters.
    pub fn stored_title(&self) -> String {
        self.title.trim().chars().take(MAX_TITLE_CHARS).collect()
    }
}

/// Reasons a request is rejected before reaching the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("priority weight for {dimension} must be between 0 and 10 (got {value})")]
    PriorityOutOfRange { dimension: &'static str, value: u8 },
    #[error("{field} must be a finite number greater than or equal to 0")]
    NegativeAmount { field: &'static str },
    #[error("{field} must be a probability between 0 and 1")]
    ProbabilityOutOfRange { field: &'static str },
    #[error("time_per_week_hours must be between 0 and 80 (got {0})")]
    TimeBudgetOutOfRange(u8),
    #[error("decision_text must contain at least {min} characters")]
    DecisionTextTooShort { min: usize },
}
