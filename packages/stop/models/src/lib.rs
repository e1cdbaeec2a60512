#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Traffic-stop record types and the fixed taxonomies used to bucket them.
//!
//! Every package in the workspace speaks in terms of [`StopRecord`]. The
//! bucket enums ([`StopDuration`], [`TimeOfDay`], [`ArrestAgeGroup`],
//! [`DemographicAgeGroup`]) carry the labels the analytical queries group
//! by, and [`OutcomeMarker`] makes the substring-based outcome counting
//! explicit.

use chrono::{Datelike as _, NaiveDateTime, Timelike as _};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Name of the relation holding the stop log.
pub const STOP_LOG_TABLE: &str = "Policelog";

/// Outcome predicted when no historical stop matches a candidate.
pub const DEFAULT_OUTCOME: &str = "warning";

/// Violation predicted when no historical stop matches a candidate.
pub const DEFAULT_VIOLATION: &str = "speeding";

/// Largest driver age accepted by the log.
pub const MAX_DRIVER_AGE: u8 = 100;

/// Gender of the stopped driver as recorded in the log.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DriverGender {
    /// Male driver
    #[serde(rename = "M")]
    #[strum(serialize = "M")]
    Male,
    /// Female driver
    #[serde(rename = "F")]
    #[strum(serialize = "F")]
    Female,
}

impl DriverGender {
    /// Third-person pronoun used in prediction narratives.
    #[must_use]
    pub const fn pronoun(self) -> &'static str {
        match self {
            Self::Male => "he",
            Self::Female => "she",
        }
    }
}

/// Known stop-duration buckets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum StopDuration {
    /// Up to a quarter hour
    #[serde(rename = "0-15 Min")]
    #[strum(serialize = "0-15 Min")]
    UpTo15,
    /// Between a quarter and half an hour
    #[serde(rename = "16-30 Min")]
    #[strum(serialize = "16-30 Min")]
    From16To30,
    /// Longer than half an hour
    #[serde(rename = "30+ Min")]
    #[strum(serialize = "30+ Min")]
    Over30,
}

impl StopDuration {
    /// Representative length of the bucket in minutes.
    #[must_use]
    pub const fn minutes(self) -> f64 {
        match self {
            Self::UpTo15 => 7.5,
            Self::From16To30 => 23.0,
            Self::Over30 => 35.0,
        }
    }

    /// [`Self::minutes`] in half-minute units, which keeps every bucket an
    /// integer.
    #[must_use]
    pub const fn half_minutes(self) -> u64 {
        match self {
            Self::UpTo15 => 15,
            Self::From16To30 => 46,
            Self::Over30 => 70,
        }
    }

    /// Parses a bucket label exactly as stored in the log.
    ///
    /// Returns `None` for labels outside the known set.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::UpTo15, Self::From16To30, Self::Over30]
    }
}

/// Coarse day/night classification of the hour a stop happened.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimeOfDay {
    /// 06:00 through 17:59
    Day,
    /// Everything else
    Night,
}

impl TimeOfDay {
    /// First hour counted as day time.
    pub const DAY_START_HOUR: u32 = 6;
    /// Last hour counted as day time (inclusive).
    pub const DAY_END_HOUR: u32 = 17;

    /// Classifies an hour of the day (0-23).
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        if hour >= Self::DAY_START_HOUR && hour <= Self::DAY_END_HOUR {
            Self::Day
        } else {
            Self::Night
        }
    }
}

/// Age bands used by the arrest-rate-by-age analysis.
///
/// Ages above 80 fall into [`ArrestAgeGroup::Unknown`], which mirrors the
/// band layout of the dashboard this log was built for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ArrestAgeGroup {
    /// Younger than 18
    #[serde(rename = "under 18")]
    #[strum(serialize = "under 18")]
    Under18,
    /// 18 through 25
    #[serde(rename = "18-25")]
    #[strum(serialize = "18-25")]
    From18To25,
    /// 26 through 40
    #[serde(rename = "26-40")]
    #[strum(serialize = "26-40")]
    From26To40,
    /// 41 through 60
    #[serde(rename = "41-60")]
    #[strum(serialize = "41-60")]
    From41To60,
    /// 61 through 80
    #[serde(rename = "61-80")]
    #[strum(serialize = "61-80")]
    From61To80,
    /// Anything else
    #[serde(rename = "unknown")]
    #[strum(serialize = "unknown")]
    Unknown,
}

impl ArrestAgeGroup {
    /// Buckets a known driver age.
    #[must_use]
    pub const fn from_age(age: u8) -> Self {
        match age {
            0..=17 => Self::Under18,
            18..=25 => Self::From18To25,
            26..=40 => Self::From26To40,
            41..=60 => Self::From41To60,
            61..=80 => Self::From61To80,
            _ => Self::Unknown,
        }
    }
}

/// Age bands used by the demographic and violation-trend analyses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DemographicAgeGroup {
    /// Age not recorded
    Unknown,
    /// Younger than 18
    #[serde(rename = "Under 18")]
    #[strum(serialize = "Under 18")]
    Under18,
    /// 18 through 25
    #[serde(rename = "18-25")]
    #[strum(serialize = "18-25")]
    From18To25,
    /// 26 through 40
    #[serde(rename = "26-40")]
    #[strum(serialize = "26-40")]
    From26To40,
    /// 41 through 60
    #[serde(rename = "41-60")]
    #[strum(serialize = "41-60")]
    From41To60,
    /// Older than 60
    #[serde(rename = "60+")]
    #[strum(serialize = "60+")]
    Over60,
}

impl DemographicAgeGroup {
    /// Buckets an optional driver age. A missing age is [`Self::Unknown`].
    #[must_use]
    pub const fn from_age(age: Option<u8>) -> Self {
        match age {
            None => Self::Unknown,
            Some(0..=17) => Self::Under18,
            Some(18..=25) => Self::From18To25,
            Some(26..=40) => Self::From26To40,
            Some(41..=60) => Self::From41To60,
            Some(_) => Self::Over60,
        }
    }
}

/// Substring markers used to count outcomes on the dashboard.
///
/// Matching is a case-insensitive `contains`, not an exclusive
/// classification: an outcome such as `"arrest after warning"` carries both
/// markers and is counted once under each.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeMarker {
    /// Outcome mentions an arrest
    Arrest,
    /// Outcome mentions a warning
    Warning,
}

impl OutcomeMarker {
    /// The lowercase needle searched for in the outcome text.
    #[must_use]
    pub const fn needle(self) -> &'static str {
        match self {
            Self::Arrest => "arrest",
            Self::Warning => "warning",
        }
    }

    /// Returns `true` if `outcome` mentions this marker, ignoring case.
    #[must_use]
    pub fn matches(self, outcome: &str) -> bool {
        outcome.to_lowercase().contains(self.needle())
    }

    /// Returns every marker mentioned by `outcome`.
    #[must_use]
    pub fn classify(outcome: &str) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|marker| marker.matches(outcome))
            .collect()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Arrest, Self::Warning]
    }
}

/// One recorded traffic stop as loaded from the log.
///
/// Records are read-only once loaded. Boolean flags that are `NULL` in the
/// store are read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecord {
    /// Date and time of the stop.
    pub timestamp: Option<NaiveDateTime>,
    /// Country the stop was recorded in.
    pub country_name: Option<String>,
    /// Driver gender.
    pub driver_gender: Option<DriverGender>,
    /// Driver age in years, within `0..=MAX_DRIVER_AGE`.
    pub driver_age: Option<u8>,
    /// Driver race.
    pub driver_race: Option<String>,
    /// Violation the driver was stopped for.
    pub violation: Option<String>,
    /// Whether the vehicle or driver was searched.
    pub search_conducted: bool,
    /// Kind of search performed.
    pub search_type: Option<String>,
    /// Free-text outcome of the stop (e.g. "Warning", "Citation").
    pub stop_outcome: Option<String>,
    /// Whether the driver was arrested.
    pub is_arrested: bool,
    /// Duration bucket label, kept verbatim.
    pub stop_duration: Option<String>,
    /// Whether the stop was drug related.
    pub drugs_related_stop: bool,
    /// Vehicle registration number.
    pub vehicle_number: Option<String>,
}

impl StopRecord {
    /// Hour of day of the stop.
    #[must_use]
    pub fn hour(&self) -> Option<u32> {
        self.timestamp.map(|ts| ts.hour())
    }

    /// Calendar year of the stop.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.timestamp.map(|ts| ts.year())
    }

    /// Calendar month (1-12) of the stop.
    #[must_use]
    pub fn month(&self) -> Option<u32> {
        self.timestamp.map(|ts| ts.month())
    }

    /// Day/night classification of the stop.
    #[must_use]
    pub fn time_of_day(&self) -> Option<TimeOfDay> {
        self.hour().map(TimeOfDay::from_hour)
    }

    /// Parsed duration bucket, if the label is one of the known buckets.
    #[must_use]
    pub fn duration_bucket(&self) -> Option<StopDuration> {
        self.stop_duration.as_deref().and_then(StopDuration::from_label)
    }

    /// Returns `true` if the outcome text mentions `marker`.
    #[must_use]
    pub fn outcome_has(&self, marker: OutcomeMarker) -> bool {
        self.stop_outcome
            .as_deref()
            .is_some_and(|outcome| marker.matches(outcome))
    }
}

/// Record attributes that can be tallied for dashboard charts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StopAttribute {
    /// `country_name`
    CountryName,
    /// `driver_gender`
    DriverGender,
    /// `driver_age`
    DriverAge,
    /// `driver_race`
    DriverRace,
    /// `violation`
    Violation,
    /// `search_conducted`
    SearchConducted,
    /// `search_type`
    SearchType,
    /// `stop_outcome`
    StopOutcome,
    /// `is_arrested`
    IsArrested,
    /// `stop_duration`
    StopDuration,
    /// `drugs_related_stop`
    DrugsRelatedStop,
    /// `vehicle_number`
    VehicleNumber,
}

impl StopAttribute {
    /// Display form of this attribute's value on `record`, or `None` when
    /// the value is missing.
    #[must_use]
    pub fn value_of(self, record: &StopRecord) -> Option<String> {
        match self {
            Self::CountryName => record.country_name.clone(),
            Self::DriverGender => record.driver_gender.map(|g| g.to_string()),
            Self::DriverAge => record.driver_age.map(|a| a.to_string()),
            Self::DriverRace => record.driver_race.clone(),
            Self::Violation => record.violation.clone(),
            Self::SearchConducted => Some(record.search_conducted.to_string()),
            Self::SearchType => record.search_type.clone(),
            Self::StopOutcome => record.stop_outcome.clone(),
            Self::IsArrested => Some(record.is_arrested.to_string()),
            Self::StopDuration => record.stop_duration.clone(),
            Self::DrugsRelatedStop => Some(record.drugs_related_stop.to_string()),
            Self::VehicleNumber => record.vehicle_number.clone(),
        }
    }
}

/// Error returned when a stored driver age is outside `0..=MAX_DRIVER_AGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAgeError {
    /// The rejected age.
    pub value: i64,
}

impl std::fmt::Display for InvalidAgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid driver age {}: expected 0-{MAX_DRIVER_AGE}",
            self.value
        )
    }
}

impl std::error::Error for InvalidAgeError {}

/// Validates a raw stored age.
///
/// # Errors
///
/// Returns [`InvalidAgeError`] if the value is negative or above
/// [`MAX_DRIVER_AGE`].
pub fn validate_age(value: i64) -> Result<u8, InvalidAgeError> {
    u8::try_from(value)
        .ok()
        .filter(|age| *age <= MAX_DRIVER_AGE)
        .ok_or(InvalidAgeError { value })
}
