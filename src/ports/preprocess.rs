//! Preprocessor port: Trait for the fitted imputer/scaler chain.
//!
//! This trait abstracts the fitted preprocessing artifacts from the pipeline.

use crate::domain::FeatureVector;
use crate::CardioError;

/// Trait for fitted preprocessing.
///
/// Implementations apply previously fitted transforms (missing-value
/// imputation, then scaling) and must be pure functions of their parameters.
pub trait Preprocessor: Send + Sync {
    /// Width of the vector handed to the classifier.
    fn output_width(&self) -> usize;

    /// Impute and scale an encoded feature vector.
    ///
    /// # Errors
    /// Returns `CardioError::Preprocessing` if the fitted artifacts reject the
    /// input shape or a missing value cannot be imputed.
    fn prepare(&self, features: &FeatureVector) -> Result<Vec<f64>, CardioError>;
}
