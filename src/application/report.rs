//! Result formatter: human-readable outcome plus advisory text.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::adapters::artifacts::short_fingerprint;
use crate::domain::{ClinicalInputs, Field, PredictionResult, SampledCase};

/// Dialog title for a form prediction.
pub const PREDICTION_TITLE: &str = "Prediction";
/// Dialog title for a held-out sample.
pub const RANDOM_CASE_TITLE: &str = "Random Test Case";
/// Dialog title for any failure.
pub const ERROR_TITLE: &str = "Error";

const POSITIVE_ADVICE: &str = "It is recommended to consult a healthcare professional for further \
evaluation and potential treatment. Additionally, consider the following lifestyle changes:\n\n\
- Maintain a healthy diet\n\
- Exercise regularly\n\
- Quit smoking\n\
- Limit alcohol consumption\n\
- Monitor blood pressure and blood sugar levels\n\
- Manage stress effectively";

const NEGATIVE_ADVICE: &str = "Continue maintaining a healthy lifestyle to keep your heart in good \
condition. Regular check-ups are still recommended.";

fn outcome(result: &PredictionResult) -> String {
    let verdict = if result.has_disease() { "Yes" } else { "No" };
    format!(
        "Heart Disease: {verdict}\n\nProbability: {:.2}%",
        result.probability
    )
}

/// Message shown after a form prediction.
#[must_use]
pub fn format_prediction(result: &PredictionResult) -> String {
    let advice = if result.has_disease() {
        POSITIVE_ADVICE
    } else {
        NEGATIVE_ADVICE
    };
    format!("{}\n\n{advice}", outcome(result))
}

fn display_number(value: f64) -> String {
    if value.is_nan() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

/// One `Label: value` line per input, in display order.
#[must_use]
pub fn format_inputs(inputs: &ClinicalInputs) -> String {
    let rows: [(Field, String); 10] = [
        (Field::Age, display_number(inputs.age)),
        (Field::SysBp, display_number(inputs.sys_bp)),
        (Field::DiaBp, display_number(inputs.dia_bp)),
        (Field::Glucose, display_number(inputs.glucose)),
        (Field::TotChol, display_number(inputs.tot_chol)),
        (Field::CigsPerDay, display_number(inputs.cigs_per_day)),
        (Field::PrevalentHyp, inputs.prevalent_hyp.to_string()),
        (Field::Diabetes, inputs.diabetes.to_string()),
        (Field::BpMeds, inputs.bp_meds.to_string()),
        (Field::Sex, inputs.sex.to_string()),
    ];

    let mut out = String::new();
    for (field, value) in rows {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}: {value}", field.label());
    }
    out
}

/// Message shown for a held-out sample: decoded inputs, then the outcome.
#[must_use]
pub fn format_random_case(case: &SampledCase) -> String {
    format!(
        "Random Test Case:\n\n{}\n{}",
        format_inputs(&case.inputs()),
        outcome(&case.result)
    )
}

/// One-line summary of the loaded artifacts, e.g.
/// `Artifacts: model.json sha256:0123456789ab  scaler.json sha256:...`.
#[must_use]
pub fn format_fingerprints(fingerprints: &BTreeMap<String, String>) -> String {
    if fingerprints.is_empty() {
        return "Artifacts: not fingerprinted".to_string();
    }
    let listed: Vec<String> = fingerprints
        .iter()
        .map(|(file, digest)| format!("{file} sha256:{}", short_fingerprint(digest)))
        .collect();
    format!("Artifacts: {}", listed.join("  "))
}
