//! Fitted linear classifiers.

use serde::{Deserialize, Serialize};

use super::ArtifactError;
use crate::ports::Classifier;
use crate::CardioError;

/// Family of a fitted linear model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearKind {
    /// Label and calibrated probability.
    LogisticRegression,
    /// Label only.
    LinearSvc,
}

/// Linear decision function `intercept + coefficients . x`.
///
/// The label is 1 iff the decision value is strictly positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub kind: LinearKind,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub(crate) fn validate(&self, n_features: usize) -> Result<(), ArtifactError> {
        if self.coefficients.is_empty() {
            return Err(ArtifactError::Unfitted("model has no coefficients".into()));
        }
        if self.coefficients.len() != n_features {
            return Err(ArtifactError::Shape(format!(
                "model fitted on {} features, expected {n_features}",
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Unfitted(
                "model parameters must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Signed distance to the decision boundary.
    ///
    /// # Errors
    /// Returns `CardioError::Inference` on a width mismatch or a non-finite result.
    pub fn decision_function(&self, x: &[f64]) -> Result<f64, CardioError> {
        if x.len() != self.coefficients.len() {
            return Err(CardioError::Inference(format!(
                "model expects {} features, got {}",
                self.coefficients.len(),
                x.len()
            )));
        }

        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(w, v)| w * v)
                .sum::<f64>();

        if !z.is_finite() {
            return Err(CardioError::Inference(
                "decision value is not finite".into(),
            ));
        }
        Ok(z)
    }
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, x: &[f64]) -> Result<u8, CardioError> {
        Ok(u8::from(self.decision_function(x)? > 0.0))
    }

    fn predict_proba(&self, x: &[f64]) -> Result<Option<f64>, CardioError> {
        match self.kind {
            LinearKind::LogisticRegression => Ok(Some(sigmoid(self.decision_function(x)?))),
            LinearKind::LinearSvc => {
                // Still validate the width so callers see the same errors.
                self.decision_function(x)?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(kind: LinearKind) -> LinearModel {
        LinearModel {
            kind,
            coefficients: vec![1.0, -2.0],
            intercept: 0.5,
        }
    }

    #[test]
    fn test_logistic_label_and_probability() {
        let m = model(LinearKind::LogisticRegression);

        // z = 0.5 + 1 - 0 = 1.5
        assert_eq!(m.predict(&[1.0, 0.0]).expect("Should predict"), 1);
        let p = m.predict_proba(&[1.0, 0.0]).expect("Should predict").expect("Has proba");
        assert!((p - 0.817_574_476_193_643_7).abs() < 1e-12);

        // z = 0.5 - 2 = -1.5
        assert_eq!(m.predict(&[0.0, 1.0]).expect("Should predict"), 0);
    }

    #[test]
    fn test_boundary_is_negative_class() {
        let m = LinearModel {
            kind: LinearKind::LogisticRegression,
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        assert_eq!(m.predict(&[0.0]).expect("Should predict"), 0);
        let p = m.predict_proba(&[0.0]).expect("Should predict").expect("Has proba");
        assert!((p - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_svc_is_label_only() {
        let m = model(LinearKind::LinearSvc);
        assert_eq!(m.predict(&[1.0, 0.0]).expect("Should predict"), 1);
        assert!(m.predict_proba(&[1.0, 0.0]).expect("Should predict").is_none());
    }

    #[test]
    fn test_width_mismatch_is_inference_error() {
        let m = model(LinearKind::LogisticRegression);
        assert!(matches!(m.predict(&[1.0]), Err(CardioError::Inference(_))));
        assert!(matches!(
            model(LinearKind::LinearSvc).predict_proba(&[1.0, 2.0, 3.0]),
            Err(CardioError::Inference(_))
        ));
    }

    #[test]
    fn test_sigmoid_extremes_stay_in_range() {
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!((sigmoid(0.0) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate() {
        assert!(model(LinearKind::LogisticRegression).validate(2).is_ok());
        assert!(matches!(
            model(LinearKind::LogisticRegression).validate(10),
            Err(ArtifactError::Shape(_))
        ));
        let bad = LinearModel {
            kind: LinearKind::LogisticRegression,
            coefficients: vec![f64::NAN, 1.0],
            intercept: 0.0,
        };
        assert!(matches!(bad.validate(2), Err(ArtifactError::Unfitted(_))));
    }

    #[test]
    fn test_parses_exported_json() {
        let json = r#"{"kind":"linear_svc","coefficients":[0.1,0.2],"intercept":-1.0}"#;
        let m: LinearModel = serde_json::from_str(json).expect("Should parse");
        assert_eq!(m.kind, LinearKind::LinearSvc);
        assert_eq!(m.n_features(), 2);
    }
}
