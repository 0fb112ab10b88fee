//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! Inputs are validated at construction and encoded in a fixed order.

mod features;
mod prediction;
mod user;

#[cfg(test)]
pub(crate) mod fixtures;

pub use features::{
    ChoiceError, ClinicalInputs, FeatureVector, Field, RawAnswers, Sex, YesNo, FEATURE_COUNT,
    FEATURE_NAMES,
};
pub use prediction::{LabelsByModel, PredictionResult, SampledCase};
pub use user::UserRecord;
