//! Shared test inputs.

use super::RawAnswers;

/// The worked example: a 55-year-old hypertensive male smoker.
pub(crate) fn example_answers() -> RawAnswers {
    [
        ("age", "55"),
        ("sysBP", "140"),
        ("glucose", "90"),
        ("totChol", "220"),
        ("cigsPerDay", "10"),
        ("diaBP", "85"),
        ("prevalentHyp", "Yes"),
        ("diabetes", "No"),
        ("BPMeds", "No"),
        ("gender", "Male"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
