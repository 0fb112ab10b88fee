//! Held-out evaluation table for test-sampling mode.
//!
//! The table is a JSON array of records keyed by feature column name.
//! `null` cells are kept as NaN so the fitted imputer can fill them.

use std::collections::BTreeMap;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use super::ArtifactError;
use crate::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Rows held out from training, in canonical feature order.
#[derive(Debug, Clone)]
pub struct HoldoutTable {
    rows: Vec<FeatureVector>,
}

impl HoldoutTable {
    /// Load the table from a JSON records file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is malformed, is empty,
    /// or a record lacks a feature column.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<BTreeMap<String, Option<f64>>> = serde_json::from_slice(&content)
            .map_err(|source| ArtifactError::Format {
                path: path.to_path_buf(),
                source,
            })?;

        let table = Self::from_records(&records)?;
        tracing::debug!("Loaded {} held-out rows from {:?}", table.len(), path);
        Ok(table)
    }

    fn from_records(records: &[BTreeMap<String, Option<f64>>]) -> Result<Self, ArtifactError> {
        if records.is_empty() {
            return Err(ArtifactError::Shape("held-out table has no rows".into()));
        }

        let mut rows = Vec::with_capacity(records.len());
        for (n, record) in records.iter().enumerate() {
            let mut values = [f64::NAN; FEATURE_COUNT];
            for (slot, column) in values.iter_mut().zip(FEATURE_NAMES) {
                let cell = record.get(column).ok_or_else(|| {
                    ArtifactError::Shape(format!("held-out row {n} lacks column '{column}'"))
                })?;
                *slot = cell.unwrap_or(f64::NAN);
            }
            rows.push(FeatureVector::new(values));
        }

        Ok(Self { rows })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    /// Draw one row uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&FeatureVector> {
        self.rows.choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_loads_fixture_with_missing_cells() {
        let table = HoldoutTable::load(Path::new("models/desktop/x_test.json"))
            .expect("Fixture should load");
        assert_eq!(table.len(), 12);
        assert!(table.rows().iter().any(FeatureVector::has_missing));
    }

    #[test]
    fn test_sample_draws_existing_row() {
        let table = HoldoutTable::load(Path::new("models/desktop/x_test.json"))
            .expect("Fixture should load");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let row = table.sample(&mut rng).expect("Non-empty");
            assert!(table
                .rows()
                .iter()
                .any(|r| std::ptr::eq(r, row)));
        }
    }

    #[test]
    fn test_rejects_missing_column_and_empty_table() {
        let mut record: BTreeMap<String, Option<f64>> = FEATURE_NAMES
            .iter()
            .map(|c| (c.to_string(), Some(0.0)))
            .collect();
        assert!(HoldoutTable::from_records(&[record.clone()]).is_ok());

        record.remove("BPMeds");
        assert!(matches!(
            HoldoutTable::from_records(&[record]),
            Err(ArtifactError::Shape(_))
        ));
        assert!(HoldoutTable::from_records(&[]).is_err());
    }
}
