//! Fitted imputer and scaler, and the preprocessor built from them.

use serde::{Deserialize, Serialize};

use super::ArtifactError;
use crate::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::Preprocessor;
use crate::CardioError;

/// Missing-value imputer: replaces NaN with a per-column training statistic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleImputer {
    /// Statistic used at fit time (`mean`, `median`, ...). Informational.
    pub strategy: String,
    pub statistics: Vec<f64>,
}

impl SimpleImputer {
    fn validate(&self, width: usize) -> Result<(), ArtifactError> {
        if self.statistics.is_empty() {
            return Err(ArtifactError::Unfitted("imputer has no statistics".into()));
        }
        if self.statistics.len() != width {
            return Err(ArtifactError::Shape(format!(
                "imputer fitted on {} columns, expected {width}",
                self.statistics.len()
            )));
        }
        if let Some(i) = self.statistics.iter().position(|v| !v.is_finite()) {
            return Err(ArtifactError::Unfitted(format!(
                "imputer statistic for column {i} is not finite"
            )));
        }
        Ok(())
    }

    /// Fill NaN entries in place.
    ///
    /// # Errors
    /// Returns `CardioError::Preprocessing` on a column-count mismatch.
    pub fn impute(&self, row: &mut [f64]) -> Result<(), CardioError> {
        if row.len() != self.statistics.len() {
            return Err(CardioError::Preprocessing(format!(
                "imputer expects {} columns, got {}",
                self.statistics.len(),
                row.len()
            )));
        }
        for (value, fill) in row.iter_mut().zip(&self.statistics) {
            if value.is_nan() {
                *value = *fill;
            }
        }
        Ok(())
    }
}

/// Per-column affine scaler.
///
/// Zero scales and zero ranges are treated as 1, matching how the
/// artifacts were fitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `(x - data_min) / (data_max - data_min)`
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
    },
}

impl Scaler {
    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            Self::Standard { mean, .. } => mean.len(),
            Self::MinMax { data_min, .. } => data_min.len(),
        }
    }

    fn validate(&self, width: usize) -> Result<(), ArtifactError> {
        let (a, b) = match self {
            Self::Standard { mean, scale } => (mean, scale),
            Self::MinMax { data_min, data_max } => (data_min, data_max),
        };
        if a.is_empty() {
            return Err(ArtifactError::Unfitted("scaler has no parameters".into()));
        }
        if a.len() != b.len() {
            return Err(ArtifactError::Shape(format!(
                "scaler parameter lengths differ ({} vs {})",
                a.len(),
                b.len()
            )));
        }
        if a.len() != width {
            return Err(ArtifactError::Shape(format!(
                "scaler fitted on {} columns, expected {width}",
                a.len()
            )));
        }
        if a.iter().chain(b).any(|v| !v.is_finite()) {
            return Err(ArtifactError::Unfitted(
                "scaler parameters must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Scale one row.
    ///
    /// # Errors
    /// Returns `CardioError::Preprocessing` on a column-count mismatch.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, CardioError> {
        if row.len() != self.width() {
            return Err(CardioError::Preprocessing(format!(
                "scaler expects {} columns, got {}",
                self.width(),
                row.len()
            )));
        }

        let non_zero = |v: f64| if v == 0.0 { 1.0 } else { v };

        let out = match self {
            Self::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / non_zero(*s))
                .collect(),
            Self::MinMax { data_min, data_max } => row
                .iter()
                .zip(data_min.iter().zip(data_max))
                .map(|(x, (lo, hi))| (x - lo) / non_zero(hi - lo))
                .collect(),
        };
        Ok(out)
    }
}

/// Impute-then-scale chain over the column order the artifacts were fitted on.
#[derive(Debug, Clone)]
pub struct FittedPreprocessor {
    /// Fitted column names, in fitted order.
    columns: Vec<String>,
    /// For each fitted column, its index in the canonical feature vector.
    order: Vec<usize>,
    /// Trailing scaler columns that are not features (e.g. the label column).
    placeholders: usize,
    imputer: Option<SimpleImputer>,
    scaler: Scaler,
}

impl FittedPreprocessor {
    /// Assemble and validate a preprocessor.
    ///
    /// `columns` must name each of the ten feature columns exactly once.
    /// The scaler must be fitted on `columns` plus `placeholders` trailing columns.
    ///
    /// # Errors
    /// Returns `ArtifactError` if the columns or parameter shapes are inconsistent.
    pub fn new(
        columns: Vec<String>,
        placeholders: usize,
        imputer: Option<SimpleImputer>,
        scaler: Scaler,
    ) -> Result<Self, ArtifactError> {
        if columns.len() != FEATURE_COUNT {
            return Err(ArtifactError::Shape(format!(
                "artifacts fitted on {} feature columns, expected {FEATURE_COUNT}",
                columns.len()
            )));
        }

        let mut order = Vec::with_capacity(FEATURE_COUNT);
        for column in &columns {
            let idx = FEATURE_NAMES
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| ArtifactError::Shape(format!("unknown feature column '{column}'")))?;
            if order.contains(&idx) {
                return Err(ArtifactError::Shape(format!(
                    "feature column '{column}' listed twice"
                )));
            }
            order.push(idx);
        }

        if let Some(imputer) = &imputer {
            imputer.validate(columns.len())?;
        }
        scaler.validate(columns.len() + placeholders)?;

        Ok(Self {
            columns,
            order,
            placeholders,
            imputer,
            scaler,
        })
    }

    /// Fitted column names, in fitted order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_imputer(&self) -> bool {
        self.imputer.is_some()
    }
}

impl Preprocessor for FittedPreprocessor {
    fn output_width(&self) -> usize {
        self.columns.len()
    }

    fn prepare(&self, features: &FeatureVector) -> Result<Vec<f64>, CardioError> {
        let values = features.as_slice();
        let mut row: Vec<f64> = self.order.iter().map(|&i| values[i]).collect();

        if let Some(imputer) = &self.imputer {
            imputer.impute(&mut row)?;
        }
        if let Some(pos) = row.iter().position(|v| v.is_nan()) {
            return Err(CardioError::Preprocessing(format!(
                "missing value in column '{}' and no imputer is fitted",
                self.columns[pos]
            )));
        }

        // The scaler was fitted with extra trailing columns; feed zeros and drop them.
        row.resize(row.len() + self.placeholders, 0.0);
        let mut scaled = self.scaler.transform(&row)?;
        scaled.truncate(self.columns.len());

        Ok(scaled)
    }
}
