//! Clinical inputs and the fixed-order feature vector.
//!
//! The fitted artifacts were trained on the column order in [`FEATURE_NAMES`].
//! Permuting it silently produces wrong predictions, so every vector in the
//! crate is built through [`ClinicalInputs::encode`] or checked by length.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::CardioError;

/// Number of clinical features consumed by the classifier.
pub const FEATURE_COUNT: usize = 10;

/// Canonical column names, in feature order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "sysBP",
    "glucose",
    "totChol",
    "cigsPerDay",
    "diaBP",
    "prevalentHyp",
    "diabetes",
    "BPMeds",
    "male",
];

/// Question key -> raw answer text, as collected from a form.
pub type RawAnswers = HashMap<String, String>;

/// One of the ten clinical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Age,
    SysBp,
    Glucose,
    TotChol,
    CigsPerDay,
    DiaBp,
    PrevalentHyp,
    Diabetes,
    BpMeds,
    Sex,
}

impl Field {
    /// All fields in feature order.
    pub const ALL: [Field; FEATURE_COUNT] = [
        Field::Age,
        Field::SysBp,
        Field::Glucose,
        Field::TotChol,
        Field::CigsPerDay,
        Field::DiaBp,
        Field::PrevalentHyp,
        Field::Diabetes,
        Field::BpMeds,
        Field::Sex,
    ];

    /// Position in the feature vector.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name the artifacts were fitted with.
    #[must_use]
    pub fn column(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    /// Question key used by the forms. Sex is asked as `gender`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Sex => "gender",
            other => other.column(),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::SysBp => "Systolic Blood Pressure",
            Self::Glucose => "Glucose level",
            Self::TotChol => "Total Cholesterol level",
            Self::CigsPerDay => "Cigarettes per day",
            Self::DiaBp => "Diastolic Blood Pressure",
            Self::PrevalentHyp => "Hypertension",
            Self::Diabetes => "Diabetes",
            Self::BpMeds => "Blood Pressure Medication",
            Self::Sex => "Gender",
        }
    }

    /// Accepted answers for categorical fields, `None` for numeric ones.
    #[must_use]
    pub fn choices(self) -> Option<[&'static str; 2]> {
        match self {
            Self::PrevalentHyp | Self::Diabetes | Self::BpMeds => {
                Some([YesNo::Yes.as_str(), YesNo::No.as_str()])
            }
            Self::Sex => Some([Sex::Male.as_str(), Sex::Female.as_str()]),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_categorical(self) -> bool {
        self.choices().is_some()
    }

    /// Look a field up by question key or column name.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key || f.column() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A categorical answer outside the accepted pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, got '{got}'")]
pub struct ChoiceError {
    expected: &'static str,
    got: String,
}

/// Yes/No answer, encoded Yes=1, No=0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    #[must_use]
    pub fn as_flag(self) -> f64 {
        match self {
            Self::Yes => 1.0,
            Self::No => 0.0,
        }
    }

    /// Decode a stored flag. Only exactly 1 reads as `Yes`.
    #[must_use]
    pub fn from_flag(flag: f64) -> Self {
        if flag == 1.0 {
            Self::Yes
        } else {
            Self::No
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl FromStr for YesNo {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Yes" => Ok(Self::Yes),
            "No" => Ok(Self::No),
            other => Err(ChoiceError {
                expected: "'Yes' or 'No'",
                got: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sex answer, encoded Male=1, Female=0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    #[must_use]
    pub fn as_flag(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }

    /// Decode a stored flag. Only exactly 1 reads as `Male`.
    #[must_use]
    pub fn from_flag(flag: f64) -> Self {
        if flag == 1.0 {
            Self::Male
        } else {
            Self::Female
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl FromStr for Sex {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            other => Err(ChoiceError {
                expected: "'Male' or 'Female'",
                got: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ten clinical inputs, validated and typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalInputs {
    /// Age in years
    pub age: f64,
    /// Systolic blood pressure in mmHg
    pub sys_bp: f64,
    /// Glucose level in mg/dL
    pub glucose: f64,
    /// Total cholesterol in mg/dL
    pub tot_chol: f64,
    pub cigs_per_day: f64,
    /// Diastolic blood pressure in mmHg
    pub dia_bp: f64,
    pub prevalent_hyp: YesNo,
    pub diabetes: YesNo,
    pub bp_meds: YesNo,
    pub sex: Sex,
}

impl ClinicalInputs {
    /// Validate raw answers into typed inputs.
    ///
    /// # Errors
    /// Returns `CardioError::InvalidInput` if any of the ten answers is
    /// missing, not a finite number, or not one of the accepted choices.
    pub fn from_answers(answers: &RawAnswers) -> Result<Self, CardioError> {
        let numeric = |field: Field| lookup(answers, field).and_then(|raw| parse_numeric(field, raw));

        Ok(Self {
            age: numeric(Field::Age)?,
            sys_bp: numeric(Field::SysBp)?,
            glucose: numeric(Field::Glucose)?,
            tot_chol: numeric(Field::TotChol)?,
            cigs_per_day: numeric(Field::CigsPerDay)?,
            dia_bp: numeric(Field::DiaBp)?,
            prevalent_hyp: parse_choice(answers, Field::PrevalentHyp)?,
            diabetes: parse_choice(answers, Field::Diabetes)?,
            bp_meds: parse_choice(answers, Field::BpMeds)?,
            sex: parse_choice(answers, Field::Sex)?,
        })
    }

    /// Encode into the fixed-order feature vector.
    #[must_use]
    pub fn encode(&self) -> FeatureVector {
        FeatureVector([
            self.age,
            self.sys_bp,
            self.glucose,
            self.tot_chol,
            self.cigs_per_day,
            self.dia_bp,
            self.prevalent_hyp.as_flag(),
            self.diabetes.as_flag(),
            self.bp_meds.as_flag(),
            self.sex.as_flag(),
        ])
    }

    /// Decode a feature vector for display. Numeric entries are kept as-is
    /// (including NaN for missing cells).
    #[must_use]
    pub fn decode(features: &FeatureVector) -> Self {
        Self {
            age: features.get(Field::Age),
            sys_bp: features.get(Field::SysBp),
            glucose: features.get(Field::Glucose),
            tot_chol: features.get(Field::TotChol),
            cigs_per_day: features.get(Field::CigsPerDay),
            dia_bp: features.get(Field::DiaBp),
            prevalent_hyp: YesNo::from_flag(features.get(Field::PrevalentHyp)),
            diabetes: YesNo::from_flag(features.get(Field::Diabetes)),
            bp_meds: YesNo::from_flag(features.get(Field::BpMeds)),
            sex: Sex::from_flag(features.get(Field::Sex)),
        }
    }

    /// Answers in form shape, keyed by question key.
    #[must_use]
    pub fn to_answers(&self) -> RawAnswers {
        let features = self.encode();
        Field::ALL
            .into_iter()
            .map(|field| {
                let text = match field {
                    Field::PrevalentHyp => self.prevalent_hyp.to_string(),
                    Field::Diabetes => self.diabetes.to_string(),
                    Field::BpMeds => self.bp_meds.to_string(),
                    Field::Sex => self.sex.to_string(),
                    numeric => features.get(numeric).to_string(),
                };
                (field.key().to_string(), text)
            })
            .collect()
    }
}

fn lookup<'a>(answers: &'a RawAnswers, field: Field) -> Result<&'a str, CardioError> {
    answers
        .get(field.key())
        .map(String::as_str)
        .ok_or_else(|| CardioError::InvalidInput(format!("missing answer for '{}'", field.key())))
}

fn parse_numeric(field: Field, raw: &str) -> Result<f64, CardioError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            CardioError::InvalidInput(format!("{}: '{}' is not a valid number", field.key(), raw))
        })
}

fn parse_choice<T>(answers: &RawAnswers, field: Field) -> Result<T, CardioError>
where
    T: FromStr<Err = ChoiceError>,
{
    lookup(answers, field)?
        .parse()
        .map_err(|e: ChoiceError| CardioError::InvalidInput(format!("{}: {e}", field.key())))
}

/// Fixed-order numeric encoding of the ten clinical inputs.
///
/// Entries may be NaN only when the vector comes from the held-out table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Create a vector from a slice.
    ///
    /// # Errors
    /// Returns error if the slice length is not 10.
    pub fn from_slice(values: &[f64]) -> Result<Self, CardioError> {
        let values: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
            CardioError::InvalidInput(format!(
                "Expected {FEATURE_COUNT} features, got {}",
                values.len()
            ))
        })?;
        Ok(Self(values))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, field: Field) -> f64 {
        self.0[field.index()]
    }

    /// Value of a named column, if the name is a feature column.
    #[must_use]
    pub fn by_column(&self, column: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|name| *name == column)
            .map(|i| self.0[i])
    }

    #[must_use]
    pub fn has_missing(&self) -> bool {
        self.0.iter().any(|v| v.is_nan())
    }
}
