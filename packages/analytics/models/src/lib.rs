#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query catalog keys, dashboard summary types and prediction types.
//!
//! [`CatalogQuery`] enumerates the fixed menu of analyses. Each entry is
//! addressed by its display name and carries the store-side SQL that the
//! in-memory evaluators in `securecheck_analytics` reproduce.

use chrono::{NaiveDate, NaiveTime};
use securecheck_stop_models::DriverGender;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The fixed menu of analytical queries.
///
/// Parsing is an exact match on the display name.
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
pub enum CatalogQuery {
    /// Vehicles most often involved in drug-related stops.
    #[strum(serialize = "Top 10 vehicle_Number involved in drug-related stops")]
    DrugStopVehicles,
    /// Vehicles most often searched.
    #[strum(serialize = "Most frequently searched vehicles")]
    SearchedVehicles,
    /// Age band with the highest arrest rate.
    #[strum(serialize = "Highest arrest rate according to driver age group")]
    ArrestRateByAgeGroup,
    /// Male/female counts per country.
    #[strum(serialize = "Gender distribution of drivers stopped in each country")]
    GenderByCountry,
    /// Race and gender pair with the highest search rate.
    #[strum(serialize = "Race and gender combination having the highest search rate")]
    RaceGenderSearchRate,
    /// Busiest hour of the day.
    #[strum(serialize = "Time of day sees the most traffic stops")]
    BusiestHour,
    /// Mean stop length per violation.
    #[strum(serialize = "Average stop duration for different violations")]
    AverageDurationByViolation,
    /// Arrest rate for day and night stops.
    #[strum(serialize = "Are stops during the night more likely to lead to arrests")]
    NightArrestRate,
    /// Search and arrest counts per violation.
    #[strum(serialize = "Violations that are most associated with searches or arrests")]
    ViolationSearchArrest,
    /// Violations of drivers under 25.
    #[strum(serialize = "Violations are most common among younger drivers (<25)")]
    YoungDriverViolations,
    /// Violation least likely to end in a search or arrest.
    #[strum(serialize = "Violation that rarely results in search or arrest")]
    RarelySearchedViolation,
    /// Country with the highest share of drug-related stops.
    #[strum(serialize = "Countries report the highest rate of drug-related stop")]
    DrugRateByCountry,
    /// Arrest rate per country and violation.
    #[strum(serialize = "Arrest rate by country and violation")]
    ArrestRateByCountryViolation,
    /// Country with the most searches.
    #[strum(serialize = "Country having the most stops with search conducted")]
    MostSearchedCountry,
    /// Per-year country ranking by arrests.
    #[strum(serialize = "Yearly Breakdown of Stops and Arrests by Country")]
    YearlyCountryArrests,
    /// Top violation per race and age band.
    #[strum(serialize = "Driver Violation Trends Based on Age and Race")]
    AgeRaceViolationTrends,
    /// Stop counts by year, month and hour.
    #[strum(
        serialize = "Time Period Analysis of Stops, Number of Stops by Year,Month, Hour of the Day"
    )]
    TimePeriodBreakdown,
    /// Violations in the top five by search rate or by arrest rate.
    #[strum(serialize = "Violations with High Search and Arrest Rates")]
    HighSearchArrestViolations,
    /// Stop counts by country, age band, gender and race.
    #[strum(serialize = "Driver Demographics by Country")]
    DemographicsByCountry,
    /// Five violations with the highest arrest rate.
    #[strum(serialize = "Top 5 Violations with Highest Arrest Rates")]
    TopArrestRateViolations,
}

impl CatalogQuery {
    /// Returns all catalog entries in menu order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::DrugStopVehicles,
            Self::SearchedVehicles,
            Self::ArrestRateByAgeGroup,
            Self::GenderByCountry,
            Self::RaceGenderSearchRate,
            Self::BusiestHour,
            Self::AverageDurationByViolation,
            Self::NightArrestRate,
            Self::ViolationSearchArrest,
            Self::YoungDriverViolations,
            Self::RarelySearchedViolation,
            Self::DrugRateByCountry,
            Self::ArrestRateByCountryViolation,
            Self::MostSearchedCountry,
            Self::YearlyCountryArrests,
            Self::AgeRaceViolationTrends,
            Self::TimePeriodBreakdown,
            Self::HighSearchArrestViolations,
            Self::DemographicsByCountry,
            Self::TopArrestRateViolations,
        ]
    }

    /// Output columns, in order.
    #[must_use]
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::DrugStopVehicles => &["vehicle_number", "drug_stop_count"],
            Self::SearchedVehicles => &["vehicle_number", "search_count"],
            Self::ArrestRateByAgeGroup => {
                &["age_group", "total_stops", "total_arrests", "arrest_rate"]
            }
            Self::GenderByCountry => &["country_name", "male_count", "female_count"],
            Self::RaceGenderSearchRate => &[
                "driver_race",
                "driver_gender",
                "total_stops",
                "total_searches",
                "search_rate_percent",
            ],
            Self::BusiestHour => &["stop_hour", "total_stops"],
            Self::AverageDurationByViolation => &["violation", "avg_stop_duration_minutes"],
            Self::NightArrestRate => &[
                "time_of_day",
                "total_stops",
                "total_arrests",
                "arrest_rate_percent",
            ],
            Self::ViolationSearchArrest => &[
                "violation",
                "total_stops",
                "total_searches",
                "search_rate_percent",
                "total_arrests",
                "arrest_rate_percent",
            ],
            Self::YoungDriverViolations => &["violation", "stop_count"],
            Self::RarelySearchedViolation => &[
                "violation",
                "total_stops",
                "stops_with_search_or_arrest",
                "search_or_arrest_percentage",
            ],
            Self::DrugRateByCountry => &[
                "country_name",
                "total_stops",
                "drug_related_stops",
                "drug_related_percentage",
            ],
            Self::ArrestRateByCountryViolation => &[
                "country_name",
                "violation",
                "total_stops",
                "total_arrests",
                "arrest_rate_percent",
            ],
            Self::MostSearchedCountry => &["country_name", "total_stops_with_search"],
            Self::YearlyCountryArrests => &[
                "year",
                "country_name",
                "total_stops",
                "total_arrests",
                "arrest_rate_percent",
                "country_rank_by_arrests",
            ],
            Self::AgeRaceViolationTrends => &[
                "driver_race",
                "age_group",
                "violation",
                "violation_count",
                "total_stops",
            ],
            Self::TimePeriodBreakdown => &["stop_year", "stop_month", "stop_hour", "total_stops"],
            Self::HighSearchArrestViolations => &[
                "violation",
                "total_stops",
                "search_count",
                "search_rate_percent",
                "search_rank",
                "arrest_count",
                "arrest_rate_percent",
                "arrest_rank",
            ],
            Self::DemographicsByCountry => &[
                "country_name",
                "age_group",
                "driver_gender",
                "driver_race",
                "total_stops",
            ],
            Self::TopArrestRateViolations => &[
                "violation",
                "total_stops",
                "total_arrests",
                "arrest_rate_percent",
            ],
        }
    }

    /// One-line summary for menus.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::DrugStopVehicles => "Ten vehicles with the most drug-related stops",
            Self::SearchedVehicles => "Ten vehicles searched most often",
            Self::ArrestRateByAgeGroup => "Driver age band with the highest arrest rate",
            Self::GenderByCountry => "Male and female driver counts per country",
            Self::RaceGenderSearchRate => "Race and gender pair searched most often",
            Self::BusiestHour => "Hour of the day with the most stops",
            Self::AverageDurationByViolation => "Average stop length in minutes per violation",
            Self::NightArrestRate => "Arrest rate for day stops versus night stops",
            Self::ViolationSearchArrest => "Search and arrest counts and rates per violation",
            Self::YoungDriverViolations => "Violation counts for drivers under 25",
            Self::RarelySearchedViolation => "Violation least likely to end in a search or arrest",
            Self::DrugRateByCountry => "Country with the highest share of drug-related stops",
            Self::ArrestRateByCountryViolation => "Arrest rate per country and violation",
            Self::MostSearchedCountry => "Country with the most searches",
            Self::YearlyCountryArrests => "Stops and arrests per country, ranked within each year",
            Self::AgeRaceViolationTrends => "Most common violation per race and age band",
            Self::TimePeriodBreakdown => "Stop counts by year, month and hour",
            Self::HighSearchArrestViolations => {
                "Violations in the top five by search rate or arrest rate"
            }
            Self::DemographicsByCountry => "Stops by country, age band, gender and race",
            Self::TopArrestRateViolations => "Five violations with the highest arrest rates",
        }
    }

    /// Store-side rendition of the query against the `"Policelog"` relation.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::DrugStopVehicles => {
                r#"SELECT vehicle_number, COUNT(*) AS drug_stop_count
FROM "Policelog"
WHERE drugs_related_stop = TRUE AND vehicle_number IS NOT NULL
GROUP BY vehicle_number
ORDER BY drug_stop_count DESC
LIMIT 10"#
            }
            Self::SearchedVehicles => {
                r#"SELECT vehicle_number, COUNT(*) AS search_count
FROM "Policelog"
WHERE search_conducted = TRUE AND vehicle_number IS NOT NULL
GROUP BY vehicle_number
ORDER BY search_count DESC
LIMIT 10"#
            }
            Self::ArrestRateByAgeGroup => {
                r#"SELECT age_group, COUNT(*) AS total_stops,
    SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) AS total_arrests,
    ROUND(100.0 * SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) / COUNT(*), 2) AS arrest_rate
FROM (
    SELECT *, CASE
        WHEN driver_age < 18 THEN 'under 18'
        WHEN driver_age BETWEEN 18 AND 25 THEN '18-25'
        WHEN driver_age BETWEEN 26 AND 40 THEN '26-40'
        WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
        WHEN driver_age BETWEEN 61 AND 80 THEN '61-80'
        ELSE 'unknown' END AS age_group
    FROM "Policelog"
    WHERE driver_age IS NOT NULL
) AS grouped_data
GROUP BY age_group
ORDER BY arrest_rate DESC
LIMIT 1"#
            }
            Self::GenderByCountry => {
                r#"SELECT country_name,
    SUM(CASE WHEN driver_gender = 'M' THEN 1 ELSE 0 END) AS male_count,
    SUM(CASE WHEN driver_gender = 'F' THEN 1 ELSE 0 END) AS female_count
FROM "Policelog"
WHERE driver_gender IS NOT NULL
GROUP BY country_name
ORDER BY country_name"#
            }
            Self::RaceGenderSearchRate => {
                r#"SELECT driver_race, driver_gender, COUNT(*) AS total_stops,
    SUM(CASE WHEN search_conducted = TRUE THEN 1 ELSE 0 END) AS total_searches,
    ROUND(100.0 * SUM(CASE WHEN search_conducted = TRUE THEN 1 ELSE 0 END) / COUNT(*), 2) AS search_rate_percent
FROM "Policelog"
WHERE driver_race IS NOT NULL AND driver_gender IS NOT NULL
GROUP BY driver_race, driver_gender
ORDER BY search_rate_percent DESC
LIMIT 1"#
            }
            Self::BusiestHour => {
                r#"SELECT EXTRACT(HOUR FROM timestamp) AS stop_hour, COUNT(*) AS total_stops
FROM "Policelog"
WHERE timestamp IS NOT NULL
GROUP BY stop_hour
ORDER BY total_stops DESC
LIMIT 1"#
            }
            Self::AverageDurationByViolation => {
                r#"SELECT violation, ROUND(AVG(CASE
        WHEN stop_duration = '0-15 Min' THEN 7.5
        WHEN stop_duration = '16-30 Min' THEN 23
        WHEN stop_duration = '30+ Min' THEN 35
        ELSE NULL END), 2) AS avg_stop_duration_minutes
FROM "Policelog"
WHERE stop_duration IS NOT NULL AND violation IS NOT NULL
GROUP BY violation
ORDER BY avg_stop_duration_minutes DESC"#
            }
            Self::NightArrestRate => {
                r#"WITH time_classified AS (
    SELECT *, CASE WHEN EXTRACT(HOUR FROM timestamp) BETWEEN 6 AND 17 THEN 'Day'
        ELSE 'Night' END AS time_of_day
    FROM "Policelog"
    WHERE timestamp IS NOT NULL
)
SELECT time_of_day, COUNT(*) AS total_stops,
    SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) AS total_arrests,
    ROUND(100.0 * SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) / COUNT(*), 2) AS arrest_rate_percent
FROM time_classified
GROUP BY time_of_day
ORDER BY time_of_day"#
            }
            Self::ViolationSearchArrest => {
                r#"SELECT violation, COUNT(*) AS total_stops,
    SUM(CASE WHEN search_conducted = TRUE THEN 1 ELSE 0 END) AS total_searches,
    ROUND(100.0 * SUM(CASE WHEN search_conducted = TRUE THEN 1 ELSE 0 END) / COUNT(*), 2) AS search_rate_percent,
    SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) AS total_arrests,
    ROUND(100.0 * SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) / COUNT(*), 2) AS arrest_rate_percent
FROM "Policelog"
WHERE violation IS NOT NULL
GROUP BY violation
ORDER BY total_searches DESC, total_arrests DESC"#
            }
            Self::YoungDriverViolations => {
                r#"SELECT violation, COUNT(*) AS stop_count
FROM "Policelog"
WHERE driver_age < 25 AND violation IS NOT NULL
GROUP BY violation
ORDER BY stop_count DESC"#
            }
            Self::RarelySearchedViolation => {
                r#"SELECT violation, COUNT(*) AS total_stops,
    COUNT(CASE WHEN search_conducted = TRUE OR is_arrested = TRUE THEN 1 END) AS stops_with_search_or_arrest,
    CAST(COUNT(CASE WHEN search_conducted = TRUE OR is_arrested = TRUE THEN 1 END) AS NUMERIC) * 100.0 / COUNT(*) AS search_or_arrest_percentage
FROM "Policelog"
GROUP BY violation
HAVING COUNT(*) > 0
ORDER BY search_or_arrest_percentage ASC, total_stops DESC
LIMIT 1"#
            }
            Self::DrugRateByCountry => {
                r#"SELECT country_name, COUNT(*) AS total_stops,
    COUNT(CASE WHEN drugs_related_stop = TRUE THEN 1 END) AS drug_related_stops,
    CAST(COUNT(CASE WHEN drugs_related_stop = TRUE THEN 1 END) AS NUMERIC) * 100.0 / COUNT(*) AS drug_related_percentage
FROM "Policelog"
WHERE country_name IS NOT NULL
GROUP BY country_name
HAVING COUNT(*) > 0
ORDER BY drug_related_percentage DESC
LIMIT 1"#
            }
            Self::ArrestRateByCountryViolation => {
                r#"SELECT country_name, violation, COUNT(*) AS total_stops,
    SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) AS total_arrests,
    ROUND(100.0 * SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) / COUNT(*), 2) AS arrest_rate_percent
FROM "Policelog"
WHERE country_name IS NOT NULL AND violation IS NOT NULL
GROUP BY country_name, violation
ORDER BY arrest_rate_percent DESC"#
            }
            Self::MostSearchedCountry => {
                r#"SELECT country_name, COUNT(*) AS total_stops_with_search
FROM "Policelog"
WHERE search_conducted = TRUE AND country_name IS NOT NULL
GROUP BY country_name
ORDER BY total_stops_with_search DESC
LIMIT 1"#
            }
            Self::YearlyCountryArrests => {
                r#"SELECT year, country_name, total_stops, total_arrests,
    ROUND(100.0 * total_arrests / total_stops, 2) AS arrest_rate_percent,
    RANK() OVER (PARTITION BY year ORDER BY total_arrests DESC) AS country_rank_by_arrests
FROM (
    SELECT EXTRACT(YEAR FROM timestamp) AS year, country_name,
        COUNT(*) AS total_stops,
        SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) AS total_arrests
    FROM "Policelog"
    WHERE timestamp IS NOT NULL AND country_name IS NOT NULL
    GROUP BY EXTRACT(YEAR FROM timestamp), country_name
) AS yearly_stats
ORDER BY year, country_rank_by_arrests"#
            }
            Self::AgeRaceViolationTrends => {
                r#"WITH banded AS (
    SELECT driver_race, violation, CASE
        WHEN driver_age IS NULL THEN 'Unknown'
        WHEN driver_age < 18 THEN 'Under 18'
        WHEN driver_age BETWEEN 18 AND 25 THEN '18-25'
        WHEN driver_age BETWEEN 26 AND 40 THEN '26-40'
        WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
        WHEN driver_age > 60 THEN '60+'
        ELSE 'Unknown' END AS age_group
    FROM "Policelog"
    WHERE driver_race IS NOT NULL
),
age_grouped AS (
    SELECT driver_race, age_group, violation, COUNT(*) AS violation_count
    FROM banded
    WHERE violation IS NOT NULL
    GROUP BY driver_race, age_group, violation
),
top_violations AS (
    SELECT *, RANK() OVER (PARTITION BY driver_race, age_group ORDER BY violation_count DESC) AS rank
    FROM age_grouped
),
totals AS (
    SELECT driver_race, age_group, COUNT(*) AS total_stops
    FROM banded
    GROUP BY driver_race, age_group
)
SELECT t.driver_race, t.age_group, t.violation, t.violation_count, totals.total_stops
FROM top_violations t
JOIN totals ON t.driver_race = totals.driver_race AND t.age_group = totals.age_group
WHERE t.rank = 1
ORDER BY t.driver_race, t.age_group"#
            }
            Self::TimePeriodBreakdown => {
                r#"SELECT EXTRACT(YEAR FROM timestamp) AS stop_year,
    EXTRACT(MONTH FROM timestamp) AS stop_month,
    EXTRACT(HOUR FROM timestamp) AS stop_hour,
    COUNT(*) AS total_stops
FROM "Policelog"
WHERE timestamp IS NOT NULL
GROUP BY stop_year, stop_month, stop_hour
ORDER BY stop_year, stop_month, stop_hour"#
            }
            Self::HighSearchArrestViolations => {
                r#"WITH violation_stats AS (
    SELECT violation, COUNT(*) AS total_stops,
        SUM(CASE WHEN search_conducted = TRUE THEN 1 ELSE 0 END) AS search_count,
        SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) AS arrest_count,
        ROUND(100.0 * SUM(CASE WHEN search_conducted = TRUE THEN 1 ELSE 0 END) / COUNT(*), 2) AS search_rate_percent,
        ROUND(100.0 * SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) / COUNT(*), 2) AS arrest_rate_percent
    FROM "Policelog"
    WHERE violation IS NOT NULL
    GROUP BY violation
),
ranked_violations AS (
    SELECT *,
        RANK() OVER (ORDER BY search_rate_percent DESC) AS search_rank,
        RANK() OVER (ORDER BY arrest_rate_percent DESC) AS arrest_rank
    FROM violation_stats
)
SELECT violation, total_stops, search_count, search_rate_percent, search_rank,
    arrest_count, arrest_rate_percent, arrest_rank
FROM ranked_violations
WHERE search_rank <= 5 OR arrest_rank <= 5
ORDER BY search_rank, arrest_rank"#
            }
            Self::DemographicsByCountry => {
                r#"WITH driver_data AS (
    SELECT country_name, driver_gender, driver_race, CASE
        WHEN driver_age < 18 THEN 'Under 18'
        WHEN driver_age BETWEEN 18 AND 25 THEN '18-25'
        WHEN driver_age BETWEEN 26 AND 40 THEN '26-40'
        WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
        ELSE '60+' END AS age_group
    FROM "Policelog"
    WHERE country_name IS NOT NULL
        AND driver_gender IS NOT NULL
        AND driver_race IS NOT NULL
        AND driver_age IS NOT NULL
)
SELECT country_name, age_group, driver_gender, driver_race, COUNT(*) AS total_stops
FROM driver_data
GROUP BY country_name, age_group, driver_gender, driver_race
ORDER BY country_name, age_group, driver_gender, driver_race"#
            }
            Self::TopArrestRateViolations => {
                r#"WITH violation_stats AS (
    SELECT violation, COUNT(*) AS total_stops,
        SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) AS total_arrests,
        ROUND(100.0 * SUM(CASE WHEN is_arrested = TRUE THEN 1 ELSE 0 END) / COUNT(*), 2) AS arrest_rate_percent
    FROM "Policelog"
    WHERE violation IS NOT NULL
    GROUP BY violation
)
SELECT violation, total_stops, total_arrests, arrest_rate_percent
FROM violation_stats
ORDER BY arrest_rate_percent DESC
LIMIT 5"#
            }
        }
    }
}

/// Count of stops sharing one attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueCount {
    /// Attribute value in display form.
    pub value: String,
    /// Number of stops with that value.
    pub count: u64,
}

/// Scalar metrics shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Every stop in the log.
    pub total_stops: u64,
    /// Stops whose outcome mentions an arrest.
    pub total_arrests: u64,
    /// Stops whose outcome mentions a warning.
    pub total_warnings: u64,
    /// Stops flagged as drug related.
    pub drug_related_stops: u64,
}

/// One bar chart of the overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Chart title.
    pub title: String,
    /// Axis label for the category values.
    pub label: String,
    /// Bars in descending count order.
    pub counts: Vec<ValueCount>,
}

/// Metrics and charts derived from the loaded snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    /// Headline metrics.
    pub metrics: DashboardMetrics,
    /// Bar charts, one per dashboard tab.
    pub charts: Vec<ChartSeries>,
}

/// A candidate stop entered by the user for outcome prediction.
///
/// Only gender, age, search flag, duration and drug flag take part in the
/// lookup; the remaining fields feed the narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    /// Date of the stop.
    pub stop_date: NaiveDate,
    /// Time of the stop.
    pub stop_time: NaiveTime,
    /// Country of the stop.
    pub country_name: Option<String>,
    /// Driver gender.
    pub driver_gender: DriverGender,
    /// Driver age in years.
    pub driver_age: u8,
    /// Driver race.
    pub driver_race: Option<String>,
    /// Whether a search was conducted.
    pub search_conducted: bool,
    /// Kind of search.
    pub search_type: Option<String>,
    /// Whether the stop was drug related.
    pub drugs_related_stop: bool,
    /// Duration bucket label.
    pub stop_duration: String,
    /// Vehicle registration number.
    pub vehicle_number: Option<String>,
}

/// How a prediction was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum PredictionBasis {
    /// Derived from historical stops with identical matching attributes.
    Matched {
        /// Number of matching stops.
        records: usize,
    },
    /// No stop matched; the fixed defaults were used.
    Fallback,
}

/// Predicted violation and outcome for a candidate stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Most frequent violation among matching stops.
    pub violation: String,
    /// Most frequent outcome among matching stops.
    pub stop_outcome: String,
    /// How the prediction was reached.
    pub basis: PredictionBasis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_twenty_unique_keys() {
        let mut names: Vec<String> = CatalogQuery::all().iter().map(ToString::to_string).collect();
        assert_eq!(names.len(), 20);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 20);
    }

    #[test]
    fn keys_parse_exactly() {
        for query in CatalogQuery::all() {
            let parsed: CatalogQuery = query.to_string().parse().unwrap();
            assert_eq!(parsed, *query);
        }
        assert!("top 5 violations with highest arrest rates"
            .parse::<CatalogQuery>()
            .is_err());
        assert!("Not a query".parse::<CatalogQuery>().is_err());
    }

    #[test]
    fn sql_targets_quoted_stop_log() {
        for query in CatalogQuery::all() {
            assert!(
                query.sql().contains("\"Policelog\""),
                "{query:?} does not read the stop log"
            );
        }
    }

    #[test]
    fn sql_limits_match_ranking() {
        assert!(CatalogQuery::DrugStopVehicles.sql().ends_with("LIMIT 10"));
        assert!(CatalogQuery::TopArrestRateViolations.sql().ends_with("LIMIT 5"));
        assert!(CatalogQuery::BusiestHour.sql().ends_with("LIMIT 1"));
    }
}
