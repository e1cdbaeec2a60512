//! Frequency breakdowns and headline metrics for the dashboard overview.

use securecheck_analytics_models::{ChartSeries, DashboardMetrics, DashboardOverview, ValueCount};
use securecheck_stop_models::{OutcomeMarker, StopAttribute, StopRecord};

use crate::aggregate::{by_count_desc, count_by};

/// Bars shown on the top-N charts of the overview.
pub const OVERVIEW_TOP_N: usize = 5;

/// Counts every distinct value of `attribute`, most frequent first.
///
/// Missing values are dropped. Equal counts are ordered by value.
#[must_use]
pub fn value_counts(records: &[StopRecord], attribute: StopAttribute) -> Vec<ValueCount> {
    by_count_desc(count_by(records, |r| attribute.value_of(r)))
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect()
}

/// The `n` most frequent values of `attribute`.
#[must_use]
pub fn top_n(records: &[StopRecord], attribute: StopAttribute, n: usize) -> Vec<ValueCount> {
    let mut counts = value_counts(records, attribute);
    counts.truncate(n);
    counts
}

/// Headline metrics over the full record set.
#[must_use]
pub fn metrics(records: &[StopRecord]) -> DashboardMetrics {
    let mut metrics = DashboardMetrics {
        total_stops: records.len() as u64,
        ..DashboardMetrics::default()
    };

    for record in records {
        if record.outcome_has(OutcomeMarker::Arrest) {
            metrics.total_arrests += 1;
        }
        if record.outcome_has(OutcomeMarker::Warning) {
            metrics.total_warnings += 1;
        }
        if record.drugs_related_stop {
            metrics.drug_related_stops += 1;
        }
    }

    metrics
}

/// Metrics plus the five overview charts.
#[must_use]
pub fn overview(records: &[StopRecord]) -> DashboardOverview {
    let chart = |title: &str, label: &str, attribute, limit: Option<usize>| {
        let mut counts = value_counts(records, attribute);
        if let Some(limit) = limit {
            counts.truncate(limit);
        }
        ChartSeries {
            title: title.to_string(),
            label: label.to_string(),
            counts,
        }
    };

    let charts = vec![
        chart(
            "Top Countries",
            "Country Name",
            StopAttribute::CountryName,
            Some(OVERVIEW_TOP_N),
        ),
        chart(
            "Top Violations",
            "Violation",
            StopAttribute::Violation,
            Some(OVERVIEW_TOP_N),
        ),
        chart(
            "Stop Outcome",
            "Stop outcome",
            StopAttribute::StopOutcome,
            Some(OVERVIEW_TOP_N),
        ),
        chart("Arrested", "Arrested", StopAttribute::IsArrested, None),
        chart(
            "Drugs Related Stops",
            "Is Drug Related",
            StopAttribute::DrugsRelatedStop,
            None,
        ),
    ];

    log::debug!("Built overview over {} stop(s)", records.len());

    DashboardOverview {
        metrics: metrics(records),
        charts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_outcome(outcome: Option<&str>) -> StopRecord {
        StopRecord {
            stop_outcome: outcome.map(ToString::to_string),
            ..StopRecord::default()
        }
    }

    fn with_country(country: &str) -> StopRecord {
        StopRecord {
            country_name: Some(country.to_string()),
            ..StopRecord::default()
        }
    }

    #[test]
    fn top_n_keeps_the_largest_counts() {
        let mut records = Vec::new();
        for (country, n) in [("USA", 5), ("Canada", 3), ("India", 3), ("Peru", 1), ("Chad", 2)] {
            records.extend(std::iter::repeat_with(|| with_country(country)).take(n));
        }
        records.push(StopRecord::default());

        let top = top_n(&records, StopAttribute::CountryName, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(
            top.iter().map(|c| c.value.as_str()).collect::<Vec<_>>(),
            vec!["USA", "Canada", "India"]
        );

        let all = value_counts(&records, StopAttribute::CountryName);
        assert_eq!(all.len(), 5);
        let smallest_kept = top.iter().map(|c| c.count).min().unwrap();
        assert!(all[3..].iter().all(|c| c.count <= smallest_kept));
    }

    #[test]
    fn top_n_on_short_input() {
        let records = vec![with_country("USA")];
        assert_eq!(top_n(&records, StopAttribute::CountryName, 5).len(), 1);
        assert!(top_n(&[], StopAttribute::CountryName, 5).is_empty());
    }

    #[test]
    fn metrics_use_substring_markers() {
        let mut records = vec![
            with_outcome(Some("Arrest Driver")),
            with_outcome(Some("Warning")),
            with_outcome(Some("arrest after warning")),
            with_outcome(Some("Citation")),
            with_outcome(None),
        ];
        records[3].drugs_related_stop = true;

        let metrics = metrics(&records);
        assert_eq!(metrics.total_stops, 5);
        assert_eq!(metrics.total_arrests, 2);
        assert_eq!(metrics.total_warnings, 2);
        assert_eq!(metrics.drug_related_stops, 1);
    }

    #[test]
    fn overview_charts() {
        let records = vec![
            StopRecord {
                is_arrested: true,
                violation: Some("DUI".to_string()),
                ..StopRecord::default()
            },
            StopRecord {
                violation: Some("DUI".to_string()),
                ..StopRecord::default()
            },
            StopRecord::default(),
        ];

        let overview = overview(&records);
        assert_eq!(overview.metrics.total_stops, 3);
        assert_eq!(overview.charts.len(), 5);

        let violations = &overview.charts[1];
        assert_eq!(violations.title, "Top Violations");
        assert_eq!(
            violations.counts,
            vec![ValueCount {
                value: "DUI".to_string(),
                count: 2
            }]
        );

        let arrested = &overview.charts[3];
        assert_eq!(arrested.label, "Arrested");
        assert_eq!(
            arrested.counts,
            vec![
                ValueCount {
                    value: "false".to_string(),
                    count: 2
                },
                ValueCount {
                    value: "true".to_string(),
                    count: 1
                },
            ]
        );
        assert!(overview.charts[0].counts.is_empty());
    }
}
