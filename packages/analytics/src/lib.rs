#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analytics over an in-memory snapshot of the stop log.
//!
//! Three pieces live here:
//!
//! * [`catalog`] evaluates each [`CatalogQuery`] as a pure function of the
//!   records, mirroring the store-side SQL in `securecheck_analytics_models`.
//! * [`summary`] computes the frequency breakdowns and headline metrics of
//!   the dashboard overview.
//! * [`matcher`] predicts a violation and outcome for a candidate stop from
//!   historical stops with identical attributes.

pub mod aggregate;
pub mod catalog;
pub mod matcher;
pub mod summary;

use securecheck_analytics_models::CatalogQuery;
use securecheck_database_models::TabularResult;
use securecheck_stop_models::StopRecord;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The caller asked for a query that is not in the catalog.
    #[error("Unknown catalog query: '{key}'")]
    UnknownQuery {
        /// The key that failed to match.
        key: String,
    },
}

/// Looks up a catalog entry by its exact display name.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownQuery`] if no entry has that name.
pub fn lookup(key: &str) -> Result<CatalogQuery, AnalyticsError> {
    key.parse().map_err(|_| AnalyticsError::UnknownQuery {
        key: key.to_string(),
    })
}

/// Evaluates the catalog entry named `key` against `records`.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownQuery`] if no entry has that name.
pub fn run_named(records: &[StopRecord], key: &str) -> Result<TabularResult, AnalyticsError> {
    Ok(catalog::run(records, lookup(key)?))
}
