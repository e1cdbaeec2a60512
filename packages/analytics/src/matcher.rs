//! Outcome prediction by exact attribute lookup.
//!
//! A candidate stop is matched against historical stops on gender, age,
//! search flag, duration label and drug flag. The prediction is the most
//! frequent outcome and the most frequent violation among the matches,
//! each computed on its own. There is no scoring or fuzzy matching.

use std::collections::BTreeMap;

use securecheck_analytics_models::{PredictionBasis, PredictionRequest, PredictionResult};
use securecheck_stop_models::{DEFAULT_OUTCOME, DEFAULT_VIOLATION, DriverGender, StopRecord};

/// Returns `true` if `record` agrees with `candidate` on every matching
/// attribute.
#[must_use]
pub fn matches(record: &StopRecord, candidate: &PredictionRequest) -> bool {
    record.driver_gender == Some(candidate.driver_gender)
        && record.driver_age == Some(candidate.driver_age)
        && record.search_conducted == candidate.search_conducted
        && record.stop_duration.as_deref() == Some(candidate.stop_duration.as_str())
        && record.drugs_related_stop == candidate.drugs_related_stop
}

/// Predicts the violation and outcome of `candidate` from `records`.
#[must_use]
pub fn predict(records: &[StopRecord], candidate: &PredictionRequest) -> PredictionResult {
    let matched: Vec<&StopRecord> = records.iter().filter(|r| matches(r, candidate)).collect();

    if matched.is_empty() {
        log::debug!("No historical stop matches the candidate; using defaults");
        return PredictionResult {
            violation: DEFAULT_VIOLATION.to_string(),
            stop_outcome: DEFAULT_OUTCOME.to_string(),
            basis: PredictionBasis::Fallback,
        };
    }

    log::debug!("{} historical stop(s) match the candidate", matched.len());

    PredictionResult {
        violation: mode(matched.iter().map(|r| r.violation.as_deref()))
            .unwrap_or(DEFAULT_VIOLATION)
            .to_string(),
        stop_outcome: mode(matched.iter().map(|r| r.stop_outcome.as_deref()))
            .unwrap_or(DEFAULT_OUTCOME)
            .to_string(),
        basis: PredictionBasis::Matched {
            records: matched.len(),
        },
    }
}

/// Most frequent present value. Ties go to the smallest value.
fn mode<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Option<&'a str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    // `max_by_key` keeps the last maximum, so walk from the largest key down.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| value)
}

/// Human-readable summary of a prediction for `candidate`.
#[must_use]
pub fn narrative(candidate: &PredictionRequest, prediction: &PredictionResult) -> String {
    let gender = match candidate.driver_gender {
        DriverGender::Male => "male",
        DriverGender::Female => "female",
    };
    let search = if candidate.search_conducted {
        "A search was conducted"
    } else {
        "No search was conducted"
    };
    let drugs = if candidate.drugs_related_stop {
        "was drug-related"
    } else {
        "was not drug-related"
    };

    format!(
        "A {age}-year-old {gender} driver was stopped for {violation} at {time}. \
         {search}, and {pronoun} received a {outcome}. \
         The stop lasted {duration} and {drugs}.",
        age = candidate.driver_age,
        violation = capitalize(&prediction.violation),
        time = candidate.stop_time,
        pronoun = candidate.driver_gender.pronoun(),
        outcome = prediction.stop_outcome,
        duration = candidate.stop_duration,
    )
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}
