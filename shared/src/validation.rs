//! Validation utilities for the Crop Risk Advisory Platform

use rust_decimal::Decimal;

/// Validate a stage importance weight (non-negative multiplier)
pub fn validate_importance_weight(weight: Decimal) -> Result<(), &'static str> {
    if weight < Decimal::ZERO {
        return Err("Importance weight cannot be negative");
    }
    Ok(())
}
