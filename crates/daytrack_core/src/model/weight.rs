//! Weight series model and input parsing.
//!
//! # Responsibility
//! - Define the (day, weight) point consumed by the progress chart.
//! - Turn raw weight text from input fields into a validated value.
//!
//! # Invariants
//! - Weights are kilograms throughout the crate.

use crate::model::InputError;
use chrono::NaiveDate;

/// One point of the weight progress series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightPoint {
    pub date: NaiveDate,
    /// Weight in kilograms.
    pub weight: f64,
}

/// Parses raw weight text from an input field.
///
/// # Errors
/// - `InputError::WeightNotNumeric` for empty or non-numeric text.
/// - `InputError::WeightNotPositive` for zero, negative, or non-finite values.
pub fn parse_weight_input(raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| InputError::WeightNotNumeric(trimmed.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(InputError::WeightNotPositive(value));
    }
    Ok(value)
}
