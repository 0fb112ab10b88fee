//! Prediction result types.
//!
//! Represents the output of the heart disease classifier.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{ClinicalInputs, FeatureVector};

/// Label reported by each named model (web variant).
pub type LabelsByModel = BTreeMap<String, u8>;

/// Result of a single-model prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Binary prediction (0 = no disease, 1 = disease present)
    pub prediction: u8,

    /// Positive-class probability as a percentage (0.0 to 100.0)
    pub probability: f64,
}

impl PredictionResult {
    /// Build a result from a model label and a positive-class probability in [0, 1].
    #[must_use]
    pub fn new(prediction: u8, positive_probability: f64) -> Self {
        Self {
            prediction: u8::from(prediction == 1),
            probability: (positive_probability * 100.0).clamp(0.0, 100.0),
        }
    }

    #[must_use]
    pub fn has_disease(&self) -> bool {
        self.prediction == 1
    }
}

/// A row drawn from the held-out table together with its prediction.
#[derive(Debug, Clone)]
pub struct SampledCase {
    /// The raw row, possibly with missing (NaN) cells.
    pub features: FeatureVector,
    pub result: PredictionResult,
}

impl SampledCase {
    /// The row decoded back into clinical answers for display.
    #[must_use]
    pub fn inputs(&self) -> ClinicalInputs {
        ClinicalInputs::decode(&self.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_is_percentage() {
        let result = PredictionResult::new(1, 0.7321);
        assert!(result.has_disease());
        assert!((result.probability - 73.21).abs() < 1e-9);
    }

    #[test]
    fn test_probability_clamped() {
        assert!((PredictionResult::new(0, -0.2).probability - 0.0).abs() < f64::EPSILON);
        assert!((PredictionResult::new(1, 1.5).probability - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_label_normalised_to_binary() {
        assert_eq!(PredictionResult::new(0, 0.1).prediction, 0);
        assert_eq!(PredictionResult::new(1, 0.9).prediction, 1);
        assert!(!PredictionResult::new(0, 0.9).has_disease());
    }
}
