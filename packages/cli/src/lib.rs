#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session state and text rendering for the `securecheck` command line.
//!
//! A [`Session`] loads the stop log once and answers every later request
//! from that snapshot, except catalog queries sent to the store.

pub mod interactive;
pub mod render;

use securecheck_analytics::{AnalyticsError, catalog, lookup, matcher, summary};
use securecheck_analytics_models::{DashboardOverview, PredictionRequest, PredictionResult};
use securecheck_database::db;
use securecheck_database::stops::{LoadedStops, load_stop_log, stops_to_table};
use securecheck_database_models::{ConnectionConfig, QueryOutcome, TabularResult};
use securecheck_stop_models::StopRecord;
use serde::Serialize;

/// Where a catalog query is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySource {
    /// Send the query's SQL to the store.
    Store,
    /// Evaluate against the loaded snapshot.
    Snapshot,
}

/// A prediction together with its narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    /// Predicted violation and outcome.
    pub prediction: PredictionResult,
    /// Human-readable summary.
    pub narrative: String,
}

/// One interactive session over a snapshot of the stop log.
#[derive(Debug, Clone)]
pub struct Session {
    config: ConnectionConfig,
    stops: LoadedStops,
}

impl Session {
    /// Connects to the store and takes the snapshot.
    ///
    /// A store failure leaves the snapshot empty; the reason is available
    /// from [`Self::diagnostic`].
    pub async fn load(config: ConnectionConfig) -> Self {
        let stops = load_stop_log(&config).await;
        Self { config, stops }
    }

    /// Builds a session over records that are already in memory.
    #[must_use]
    pub fn from_records(config: ConnectionConfig, records: Vec<StopRecord>) -> Self {
        Self {
            config,
            stops: LoadedStops {
                records,
                ..LoadedStops::default()
            },
        }
    }

    /// The snapshot.
    #[must_use]
    pub fn records(&self) -> &[StopRecord] {
        &self.stops.records
    }

    /// Rows skipped while loading.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.stops.skipped
    }

    /// Why the snapshot is empty, if loading failed.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        self.stops.diagnostic.as_deref()
    }

    /// The snapshot laid out as the stop-log table, at most `limit` rows.
    #[must_use]
    pub fn log_table(&self, limit: Option<usize>) -> TabularResult {
        stops_to_table(self.records(), limit)
    }

    /// Metrics and charts over the snapshot.
    #[must_use]
    pub fn overview(&self) -> DashboardOverview {
        summary::overview(self.records())
    }

    /// Runs the catalog query named `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::UnknownQuery`] if `key` is not in the
    /// catalog. Store failures are reported in the outcome's diagnostic.
    pub async fn run_query(
        &self,
        key: &str,
        source: QuerySource,
    ) -> Result<QueryOutcome, AnalyticsError> {
        let query = lookup(key)?;

        Ok(match source {
            QuerySource::Store => db::execute(&self.config, query.sql()).await,
            QuerySource::Snapshot => QueryOutcome::success(catalog::run(self.records(), query)),
        })
    }

    /// Predicts the violation and outcome of `request` from the snapshot.
    #[must_use]
    pub fn predict(&self, request: &PredictionRequest) -> PredictionReport {
        let prediction = matcher::predict(self.records(), request);
        let narrative = matcher::narrative(request, &prediction);
        PredictionReport {
            prediction,
            narrative,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use securecheck_analytics_models::PredictionBasis;
    use securecheck_database_models::CellValue;
    use securecheck_stop_models::DriverGender;

    use super::*;

    fn stop(violation: &str, arrested: bool) -> StopRecord {
        StopRecord {
            violation: Some(violation.to_string()),
            is_arrested: arrested,
            stop_outcome: Some(if arrested { "Arrest Driver" } else { "Warning" }.to_string()),
            driver_gender: Some(DriverGender::Female),
            driver_age: Some(40),
            stop_duration: Some("16-30 Min".to_string()),
            ..StopRecord::default()
        }
    }

    fn session() -> Session {
        Session::from_records(
            ConnectionConfig::default(),
            vec![stop("DUI", true), stop("DUI", false), stop("Speeding", false)],
        )
    }

    #[tokio::test]
    async fn snapshot_queries_run_in_memory() {
        let outcome = session()
            .run_query(
                "Top 5 Violations with Highest Arrest Rates",
                QuerySource::Snapshot,
            )
            .await
            .unwrap();

        assert!(!outcome.is_failure());
        assert_eq!(outcome.result.row_count(), 2);
    }

    #[test]
    fn log_table_shows_the_snapshot() {
        let session = session();
        let table = session.log_table(None);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns.first().map(String::as_str), Some("timestamp"));

        let head = session.log_table(Some(1));
        assert_eq!(head.row_count(), 1);
        assert_eq!(
            head.value(0, "violation").and_then(CellValue::as_str),
            Some("DUI")
        );
    }

    #[tokio::test]
    async fn unknown_query_is_rejected_before_the_store() {
        let err = session()
            .run_query("Nope", QuerySource::Store)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownQuery { .. }));
    }

    #[test]
    fn overview_and_prediction_use_the_snapshot() {
        let session = session();
        assert_eq!(session.overview().metrics.total_stops, 3);
        assert!(session.diagnostic().is_none());

        let report = session.predict(&PredictionRequest {
            stop_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            stop_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            country_name: None,
            driver_gender: DriverGender::Female,
            driver_age: 40,
            driver_race: None,
            search_conducted: false,
            search_type: None,
            drugs_related_stop: false,
            stop_duration: "16-30 Min".to_string(),
            vehicle_number: None,
        });
        assert_eq!(report.prediction.violation, "DUI");
        assert_eq!(report.prediction.stop_outcome, "Warning");
        assert_eq!(report.prediction.basis, PredictionBasis::Matched { records: 3 });
        assert!(report.narrative.starts_with("A 40-year-old female driver"));
    }
}
