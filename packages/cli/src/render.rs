//! Plain-text rendering of tables, charts and the catalog menu.

use std::fmt::Write as _;

use securecheck_analytics_models::{CatalogQuery, ChartSeries, DashboardOverview};
use securecheck_database_models::{CellValue, QueryOutcome, TabularResult};

/// Width of the longest bar in a rendered chart.
const BAR_WIDTH: u64 = 40;

/// Renders a result as an aligned text table.
///
/// A result without columns renders as `(no data)`.
#[must_use]
pub fn table(result: &TabularResult) -> String {
    if result.columns.is_empty() {
        return "(no data)\n".to_string();
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(cell).collect())
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(i).map(String::len))
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, result.columns.iter().map(String::as_str), &widths);
    let _ = writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    let _ = writeln!(out, "({} row{})", cells.len(), if cells.len() == 1 { "" } else { "s" });
    out
}

fn push_line<'a>(out: &mut String, values: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = values
        .zip(widths)
        .map(|(value, width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}

fn cell(value: &CellValue) -> String {
    match value {
        CellValue::Real(v) => format!("{v:.2}"),
        other => other.to_string(),
    }
}

/// Renders a query outcome, surfacing the diagnostic of a failed query.
#[must_use]
pub fn outcome(outcome: &QueryOutcome) -> String {
    let mut out = String::new();
    if let Some(diagnostic) = &outcome.diagnostic {
        let _ = writeln!(out, "Query failed: {diagnostic}");
    }
    out.push_str(&table(&outcome.result));
    out
}

/// Renders one chart as horizontal bars scaled to the largest count.
#[must_use]
pub fn chart(series: &ChartSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", series.title, series.label);

    if series.counts.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let max = series.counts.iter().map(|c| c.count).max().unwrap_or(0).max(1);
    let label_width = series
        .counts
        .iter()
        .map(|c| c.value.len())
        .max()
        .unwrap_or(0);

    for entry in &series.counts {
        let len = usize::try_from(entry.count * BAR_WIDTH / max).unwrap_or(0);
        let _ = writeln!(
            out,
            "  {:<label_width$} {} {}",
            entry.value,
            "#".repeat(len.max(1)),
            entry.count
        );
    }
    out
}

/// Renders the metrics block followed by every chart.
#[must_use]
pub fn overview(overview: &DashboardOverview) -> String {
    let metrics = &overview.metrics;
    let mut out = String::new();
    let _ = writeln!(out, "Total Police Stops  {}", metrics.total_stops);
    let _ = writeln!(out, "Total Arrests       {}", metrics.total_arrests);
    let _ = writeln!(out, "Total Warnings      {}", metrics.total_warnings);
    let _ = writeln!(out, "Drug Related Stops  {}", metrics.drug_related_stops);

    for series in &overview.charts {
        out.push('\n');
        out.push_str(&chart(series));
    }
    out
}

/// Lists every catalog entry with its description.
#[must_use]
pub fn catalog() -> String {
    let mut out = String::new();
    for (i, query) in CatalogQuery::all().iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {query}", i + 1);
        let _ = writeln!(out, "    {}", query.description());
    }
    out
}

#[cfg(test)]
mod tests {
    use securecheck_analytics_models::{DashboardMetrics, ValueCount};

    use super::*;

    #[test]
    fn table_aligns_columns() {
        let mut result = TabularResult::new(["violation", "arrest_rate_percent"]);
        result.push_row(vec!["Speeding".into(), 12.5.into()]);
        result.push_row(vec![CellValue::Null, 100.0.into()]);

        let text = table(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "violation | arrest_rate_percent");
        assert_eq!(lines[1], "----------+--------------------");
        assert_eq!(lines[2], "Speeding  | 12.50");
        assert_eq!(lines[3], "NULL      | 100.00");
        assert_eq!(lines[4], "(2 rows)");
    }

    #[test]
    fn empty_shapes() {
        assert_eq!(table(&TabularResult::empty()), "(no data)\n");

        let failed = QueryOutcome::failure("connection refused".to_string());
        assert_eq!(
            outcome(&failed),
            "Query failed: connection refused\n(no data)\n"
        );

        let text = table(&TabularResult::new(["a"]));
        assert!(text.ends_with("(0 rows)\n"));
    }

    #[test]
    fn chart_scales_bars() {
        let series = ChartSeries {
            title: "Top Violations".to_string(),
            label: "Violation".to_string(),
            counts: vec![
                ValueCount {
                    value: "DUI".to_string(),
                    count: 4,
                },
                ValueCount {
                    value: "Seatbelt".to_string(),
                    count: 2,
                },
            ],
        };

        let text = chart(&series);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Top Violations (Violation)");
        assert_eq!(lines[1], format!("  DUI      {} 4", "#".repeat(40)));
        assert_eq!(lines[2], format!("  Seatbelt {} 2", "#".repeat(20)));
    }

    #[test]
    fn overview_lists_metrics_first() {
        let text = overview(&DashboardOverview {
            metrics: DashboardMetrics {
                total_stops: 9,
                ..DashboardMetrics::default()
            },
            charts: Vec::new(),
        });
        assert!(text.starts_with("Total Police Stops  9\n"));
    }

    #[test]
    fn catalog_lists_every_entry() {
        let text = catalog();
        assert!(text.contains(" 1. Top 10 vehicle_Number involved in drug-related stops"));
        assert!(text.contains("20. Top 5 Violations with Highest Arrest Rates"));
    }
}
