//! Prediction service: Orchestrates the prediction request pipeline.
//!
//! This service coordinates:
//! - Encoding clinical inputs into the fixed-order feature vector
//! - Imputation and scaling with the fitted preprocessor
//! - Classification with one or more fitted models
//! - Drawing random cases from the held-out table

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;

use crate::adapters::artifacts::{ArtifactBundle, ArtifactError, FittedPreprocessor, LinearModel};
use crate::adapters::HoldoutTable;
use crate::domain::{ClinicalInputs, FeatureVector, LabelsByModel, PredictionResult, SampledCase};
use crate::ports::{Classifier, Preprocessor};
use crate::CardioError;

/// Service running the encode, preprocess, classify pipeline.
///
/// Everything it holds is fitted once at startup and only read afterwards,
/// so one instance is shared by every request.
pub struct PredictionService<P, C>
where
    P: Preprocessor,
    C: Classifier,
{
    preprocessor: Arc<P>,
    /// Named models in deployment order; the first is the primary model.
    models: Vec<(String, C)>,
    holdout: Option<HoldoutTable>,
    fingerprints: BTreeMap<String, String>,
}

impl PredictionService<FittedPreprocessor, LinearModel> {
    /// Build the service from a loaded artifact bundle.
    ///
    /// # Errors
    /// Returns error if the bundle's models disagree with its preprocessor.
    pub fn from_bundle(bundle: ArtifactBundle) -> Result<Self, CardioError> {
        let ArtifactBundle {
            preprocessor,
            models,
            holdout,
            fingerprints,
        } = bundle;
        let mut service = Self::new(Arc::new(preprocessor), models, holdout)?;
        service.fingerprints = fingerprints;
        Ok(service)
    }
}

impl<P, C> PredictionService<P, C>
where
    P: Preprocessor,
    C: Classifier,
{
    /// Create a new prediction service.
    ///
    /// # Errors
    /// Returns error if no model is given or a model's width differs from
    /// the preprocessor's output.
    pub fn new(
        preprocessor: Arc<P>,
        models: Vec<(String, C)>,
        holdout: Option<HoldoutTable>,
    ) -> Result<Self, CardioError> {
        if models.is_empty() {
            return Err(ArtifactError::Unfitted("no model deployed".into()).into());
        }
        let width = preprocessor.output_width();
        if let Some((name, model)) = models.iter().find(|(_, m)| m.n_features() != width) {
            return Err(ArtifactError::Shape(format!(
                "model {name} expects {} features, preprocessor yields {width}",
                model.n_features()
            ))
            .into());
        }

        Ok(Self {
            preprocessor,
            models,
            holdout,
            fingerprints: BTreeMap::new(),
        })
    }

    /// Names of the deployed models, primary first.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|(name, _)| name.as_str())
    }

    /// SHA-256 of each loaded artifact file, keyed by file name.
    #[must_use]
    pub fn fingerprints(&self) -> &BTreeMap<String, String> {
        &self.fingerprints
    }

    #[must_use]
    pub fn has_holdout(&self) -> bool {
        self.holdout.is_some()
    }

    fn primary(&self) -> (&str, &C) {
        let (name, model) = &self.models[0];
        (name.as_str(), model)
    }

    /// Run the pipeline on validated clinical inputs with the primary model.
    ///
    /// # Errors
    /// Returns error if preprocessing or inference fails, or the primary
    /// model does not report probabilities.
    pub fn predict(&self, inputs: &ClinicalInputs) -> Result<PredictionResult, CardioError> {
        self.predict_features(&inputs.encode())
    }

    /// Run the pipeline on an already encoded vector with the primary model.
    ///
    /// # Errors
    /// Returns error if preprocessing or inference fails, or the primary
    /// model does not report probabilities.
    pub fn predict_features(
        &self,
        features: &FeatureVector,
    ) -> Result<PredictionResult, CardioError> {
        let (name, model) = self.primary();

        tracing::debug!("Step 1: Imputing and scaling features...");
        let x = self.preprocessor.prepare(features)?;

        tracing::debug!("Step 2: Classifying with {}...", name);
        let label = model.predict(&x)?;
        let proba = model.predict_proba(&x)?.ok_or_else(|| {
            CardioError::Inference(format!("model {name} does not report probabilities"))
        })?;

        let result = PredictionResult::new(label, proba);
        tracing::info!(
            "Prediction complete: label={}, probability={:.2}%",
            result.prediction,
            result.probability
        );
        Ok(result)
    }

    /// Label from every deployed model, keyed by model name.
    ///
    /// # Errors
    /// Returns error if preprocessing or any model fails.
    pub fn predict_all(&self, inputs: &ClinicalInputs) -> Result<LabelsByModel, CardioError> {
        let x = self.preprocessor.prepare(&inputs.encode())?;

        let mut labels = LabelsByModel::new();
        for (name, model) in &self.models {
            labels.insert(name.clone(), model.predict(&x)?);
        }
        tracing::info!("Predicted labels from {} model(s)", labels.len());
        Ok(labels)
    }

    /// Draw one held-out row at random and predict it.
    ///
    /// # Errors
    /// Returns error if no held-out table is deployed or prediction fails.
    pub fn sample_case<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SampledCase, CardioError> {
        let holdout = self
            .holdout
            .as_ref()
            .ok_or_else(|| ArtifactError::Unfitted("no held-out table deployed".into()))?;
        let features = *holdout
            .sample(rng)
            .ok_or_else(|| ArtifactError::Shape("held-out table has no rows".into()))?;

        tracing::debug!("Sampled held-out row (missing cells: {})", features.has_missing());
        let result = self.predict_features(&features)?;
        Ok(SampledCase { features, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::example_answers;
    use crate::domain::Field;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::Path;

    fn desktop_service() -> PredictionService<FittedPreprocessor, LinearModel> {
        let bundle = ArtifactBundle::load(Path::new("models/desktop"), true)
            .expect("Desktop artifacts should load for tests");
        PredictionService::from_bundle(bundle).expect("Should build service")
    }

    fn web_service() -> PredictionService<FittedPreprocessor, LinearModel> {
        let bundle = ArtifactBundle::load(Path::new("models/web"), true)
            .expect("Web artifacts should load for tests");
        PredictionService::from_bundle(bundle).expect("Should build service")
    }

    fn example_inputs() -> ClinicalInputs {
        ClinicalInputs::from_answers(&example_answers()).expect("Example should parse")
    }

    #[test]
    fn test_worked_example() {
        let service = desktop_service();
        let result = service.predict(&example_inputs()).expect("Should predict");

        assert_eq!(result.prediction, 0);
        assert!((result.probability - 27.4868).abs() < 0.01);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let service = desktop_service();
        let inputs = example_inputs();
        let first = service.predict(&inputs).expect("Should predict");
        let second = service.predict(&inputs).expect("Should predict");
        assert_eq!(first, second);
    }

    #[test]
    fn test_high_risk_profile_is_positive() {
        let service = desktop_service();
        let features =
            FeatureVector::new([67.0, 170.0, 225.0, 300.0, 0.0, 95.0, 1.0, 1.0, 1.0, 0.0]);
        let result = service.predict_features(&features).expect("Should predict");

        assert_eq!(result.prediction, 1);
        assert!(result.probability > 50.0 && result.probability <= 100.0);
    }

    #[test]
    fn test_web_labels_keyed_by_model() {
        let service = web_service();
        let labels = service.predict_all(&example_inputs()).expect("Should predict");

        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get("HeartDiseaseModelLogisticRegression"), Some(&0));
    }

    #[test]
    fn test_sampled_cases_are_in_range() {
        let service = desktop_service();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let case = service.sample_case(&mut rng).expect("Should sample");
            assert!(case.result.prediction <= 1);
            assert!((0.0..=100.0).contains(&case.result.probability));
        }
    }

    #[test]
    fn test_sampled_case_redisplays_consistently() {
        let service = desktop_service();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let case = service.sample_case(&mut rng).expect("Should sample");
            let shown = case.inputs();
            let raw = |field: Field| case.features.get(field);

            assert_eq!(shown.prevalent_hyp.as_flag() == 1.0, raw(Field::PrevalentHyp) == 1.0);
            assert_eq!(shown.bp_meds.as_flag() == 1.0, raw(Field::BpMeds) == 1.0);
            assert_eq!(shown.sex.as_flag() == 1.0, raw(Field::Sex) == 1.0);
            // Re-encoding the displayed case reproduces the categorical flags.
            let again = ClinicalInputs::decode(&shown.encode());
            assert_eq!(again.diabetes, shown.diabetes);
            assert_eq!(again.sex, shown.sex);
        }
    }

    #[test]
    fn test_sampling_without_holdout_fails() {
        let service = web_service();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            service.sample_case(&mut rng),
            Err(CardioError::Artifact(ArtifactError::Unfitted(_)))
        ));
    }

    struct LabelOnly;

    impl Classifier for LabelOnly {
        fn n_features(&self) -> usize {
            10
        }
        fn predict(&self, _x: &[f64]) -> Result<u8, CardioError> {
            Ok(1)
        }
        fn predict_proba(&self, _x: &[f64]) -> Result<Option<f64>, CardioError> {
            Ok(None)
        }
    }

    #[test]
    fn test_label_only_model_cannot_report_probability() {
        let bundle = ArtifactBundle::load(Path::new("models/desktop"), true)
            .expect("Desktop artifacts should load for tests");
        let service = PredictionService::new(
            Arc::new(bundle.preprocessor),
            vec![("svc".to_string(), LabelOnly)],
            None,
        )
        .expect("Should build service");

        assert!(matches!(
            service.predict(&example_inputs()),
            Err(CardioError::Inference(_))
        ));
        assert_eq!(
            service.predict_all(&example_inputs()).expect("Labels").get("svc"),
            Some(&1)
        );
    }

    #[test]
    fn test_rejects_width_mismatch_and_empty_models() {
        let bundle = ArtifactBundle::load(Path::new("models/desktop"), true)
            .expect("Desktop artifacts should load for tests");
        let pre = Arc::new(bundle.preprocessor);

        let narrow = LinearModel {
            kind: crate::adapters::artifacts::LinearKind::LogisticRegression,
            coefficients: vec![1.0; 3],
            intercept: 0.0,
        };
        assert!(PredictionService::new(Arc::clone(&pre), vec![("m".into(), narrow)], None).is_err());
        assert!(PredictionService::<_, LinearModel>::new(pre, Vec::new(), None).is_err());
    }
}
