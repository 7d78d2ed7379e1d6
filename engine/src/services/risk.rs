//! Risk assessment service scoring forecast deviation against ideals

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use shared::{
    classify_overall_risk, classify_stage_risk, stage_parameter_risk, validate_importance_weight,
    CropPlan, OverallRisk, RiskReport, StageRisk, WeatherProfile,
};

/// One stage of a risk assessment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRiskInput {
    pub name: String,
    pub ideal: WeatherProfile,
    pub forecasted: WeatherProfile,
    pub importance_weight: Decimal,
}

/// Risk assessment request document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub stages: Vec<StageRiskInput>,
}

/// Risk assessment service.
///
/// Scoring is a pure function of the request: per-parameter relative
/// deviation, equally weighted into a stage score, scaled by stage
/// importance, then summed into the overall score. Levels are
/// classified on unrounded scores; the report carries scores rounded
/// to 2 decimal places.
#[derive(Debug, Clone, Default)]
pub struct RiskService;

impl RiskService {
    /// Create a new RiskService instance
    pub fn new() -> Self {
        Self
    }

    /// Score every stage and assemble the report
    pub fn assess(&self, request: &RiskRequest) -> AppResult<RiskReport> {
        let mut stage_wise_risk = Vec::with_capacity(request.stages.len());
        let mut total = Decimal::ZERO;

        for stage in &request.stages {
            validate_importance_weight(stage.importance_weight).map_err(|message| {
                AppError::Validation {
                    field: "importance_weight".to_string(),
                    message: format!("Stage '{}': {}", stage.name, message),
                }
            })?;

            let parameter_risk = stage_parameter_risk(&stage.ideal, &stage.forecasted)
                .map_err(|parameter| AppError::MissingParameter {
                    stage: stage.name.clone(),
                    parameter,
                })?;
            let score = parameter_risk * stage.importance_weight;
            total += score;

            stage_wise_risk.push(StageRisk {
                name: stage.name.clone(),
                score: score.round_dp(2),
                level: classify_stage_risk(score),
            });
        }

        let overall_risk = OverallRisk {
            score: total.round_dp(2),
            level: classify_overall_risk(total),
        };
        tracing::info!(
            "Assessed {} stages, overall risk {} ({})",
            stage_wise_risk.len(),
            overall_risk.score,
            overall_risk.level
        );

        Ok(RiskReport {
            crop: request.crop.clone().unwrap_or_else(|| "N/A".to_string()),
            district: request.district.clone().unwrap_or_else(|| "N/A".to_string()),
            stage_wise_risk,
            overall_risk,
            description: None,
        })
    }

    /// Assess an enriched crop plan directly.
    ///
    /// Every stage must carry a name, ideal targets, forecasted values
    /// and an importance weight by this point; anything absent is a
    /// client-input error naming the offending field.
    pub fn assess_plan(&self, plan: &CropPlan) -> AppResult<RiskReport> {
        let mut stages = Vec::with_capacity(plan.stages.len());
        for (index, stage) in plan.stages.iter().enumerate() {
            let name = stage
                .name
                .clone()
                .ok_or_else(|| AppError::MissingInput(format!("stages[{}].name", index)))?;
            let ideal = stage
                .ideal
                .clone()
                .ok_or_else(|| AppError::MissingInput(format!("stages[{}].ideal", index)))?;
            let forecasted = stage
                .forecasted
                .clone()
                .ok_or_else(|| AppError::MissingInput(format!("stages[{}].forecasted", index)))?;
            let importance_weight = stage.importance_weight.ok_or_else(|| {
                AppError::MissingInput(format!("stages[{}].importance_weight", index))
            })?;

            stages.push(StageRiskInput {
                name,
                ideal,
                forecasted,
                importance_weight,
            });
        }

        let request = RiskRequest {
            crop: plan.crop.clone(),
            district: plan.district.clone(),
            stages,
        };
        self.assess(&request)
    }
}
