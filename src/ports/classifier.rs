//! Classifier port: Trait for a fitted binary classification model.

use crate::CardioError;

/// Trait for fitted binary classifiers.
///
/// Implementations provide:
/// - A discrete label (0 = no disease, 1 = disease)
/// - Optionally, the positive-class probability
pub trait Classifier: Send + Sync {
    /// Number of features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Predict the class label for a preprocessed vector.
    ///
    /// # Errors
    /// Returns `CardioError::Inference` if the vector width does not match
    /// the model.
    fn predict(&self, x: &[f64]) -> Result<u8, CardioError>;

    /// Positive-class probability in [0, 1], or `None` for label-only models.
    ///
    /// # Errors
    /// Returns `CardioError::Inference` if the vector width does not match
    /// the model.
    fn predict_proba(&self, x: &[f64]) -> Result<Option<f64>, CardioError>;
}
