//! Risk scoring models and formulas

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::weather::WeatherProfile;
use crate::types::WeatherParameter;

/// Ordinal risk severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// Deviation risk for a single parameter, in [0, 1].
///
/// Deviation is measured relative to the ideal magnitude and penalizes
/// overshoot and undershoot equally. A zero ideal treats any nonzero
/// forecast as total deviation.
pub fn deviation_risk(ideal: Decimal, forecasted: Decimal) -> Decimal {
    if ideal.is_zero() {
        if forecasted.is_zero() {
            Decimal::ZERO
        } else {
            Decimal::ONE
        }
    } else {
        ((ideal - forecasted).abs() / ideal.abs()).min(Decimal::ONE)
    }
}

/// Weighted deviation risk across the five consulted parameters, in
/// [0, 1]. Each parameter contributes with weight 0.2.
///
/// Every consulted parameter must be present in both profiles; the
/// first missing one is returned as the error.
pub fn stage_parameter_risk(
    ideal: &WeatherProfile,
    forecasted: &WeatherProfile,
) -> Result<Decimal, WeatherParameter> {
    let mut risk = Decimal::ZERO;
    for parameter in WeatherParameter::RISK_PARAMETERS {
        let ideal_value = ideal.value(parameter).ok_or(parameter)?;
        let forecasted_value = forecasted.value(parameter).ok_or(parameter)?;
        risk += deviation_risk(ideal_value, forecasted_value) * Decimal::new(2, 1);
    }
    Ok(risk)
}

/// Classify one stage's importance-scaled risk score
pub fn classify_stage_risk(score: Decimal) -> RiskLevel {
    if score < Decimal::new(15, 2) {
        RiskLevel::Low
    } else if score < Decimal::new(30, 2) {
        RiskLevel::Moderate
    } else if score < Decimal::new(50, 2) {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    }
}

/// Classify the overall score summed across stages.
///
/// The overall score is an unbounded sum, so this scale is coarser than
/// the per-stage one.
pub fn classify_overall_risk(score: Decimal) -> RiskLevel {
    if score < Decimal::new(15, 1) {
        RiskLevel::Low
    } else if score < Decimal::new(30, 1) {
        RiskLevel::Moderate
    } else if score < Decimal::new(50, 1) {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    }
}

/// Scored risk entry for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRisk {
    pub name: String,
    pub score: Decimal,
    pub level: RiskLevel,
}

/// Risk summed across all stages of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRisk {
    pub score: Decimal,
    pub level: RiskLevel,
}

/// Stage-wise and overall risk for one crop plan.
///
/// `description` is filled by an external collaborator, never by this
/// core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub crop: String,
    pub district: String,
    pub stage_wise_risk: Vec<StageRisk>,
    pub overall_risk: OverallRisk,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
