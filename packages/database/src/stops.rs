//! Loading the stop log into typed [`StopRecord`]s.

use chrono::NaiveDateTime;
use securecheck_database_models::{CellValue, ConnectionConfig, TabularResult};
use securecheck_stop_models::{DriverGender, STOP_LOG_TABLE, StopRecord, validate_age};

use crate::DbError;
use crate::db::execute;

/// The snapshot of the stop log taken at the start of a session.
#[derive(Debug, Clone, Default)]
pub struct LoadedStops {
    /// Records that converted cleanly.
    pub records: Vec<StopRecord>,
    /// Rows that were skipped because they could not be converted.
    pub skipped: usize,
    /// Store diagnostic if the load query failed.
    pub diagnostic: Option<String>,
}

/// Columns of the stop log, in table order.
pub const STOP_LOG_COLUMNS: [&str; 13] = [
    "timestamp",
    "country_name",
    "driver_gender",
    "driver_age",
    "driver_race",
    "violation",
    "search_conducted",
    "search_type",
    "stop_outcome",
    "is_arrested",
    "stop_duration",
    "drugs_related_stop",
    "vehicle_number",
];

/// Query that reads the whole stop log.
#[must_use]
pub fn select_all_sql() -> String {
    format!("SELECT * FROM \"{STOP_LOG_TABLE}\"")
}

/// Loads every stop from the store.
///
/// A store failure produces an empty snapshot with the diagnostic set.
pub async fn load_stop_log(config: &ConnectionConfig) -> LoadedStops {
    log::info!("Loading stop log from {}", config.redacted_url());

    let outcome = execute(config, &select_all_sql()).await;
    let (records, skipped) = stops_from_table(&outcome.result);

    if skipped > 0 {
        log::warn!("Skipped {skipped} stop row(s) that could not be converted");
    }
    log::info!("Loaded {} stop record(s)", records.len());

    LoadedStops {
        records,
        skipped,
        diagnostic: outcome.diagnostic,
    }
}

/// Converts a table shaped like the stop log into records.
///
/// Returns the converted records and the number of rows skipped.
#[must_use]
pub fn stops_from_table(table: &TabularResult) -> (Vec<StopRecord>, usize) {
    let mut records = Vec::with_capacity(table.row_count());
    let mut skipped = 0;

    for idx in 0..table.row_count() {
        match stop_from_row(table, idx) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Skipping stop row {idx}: {e}");
                skipped += 1;
            }
        }
    }

    (records, skipped)
}

/// Lays records back out as stop-log rows, keeping at most `limit` of them.
#[must_use]
pub fn stops_to_table(records: &[StopRecord], limit: Option<usize>) -> TabularResult {
    let mut table = TabularResult::new(STOP_LOG_COLUMNS);
    for record in records.iter().take(limit.unwrap_or(usize::MAX)) {
        table.push_row(vec![
            record.timestamp.into(),
            record.country_name.clone().into(),
            record.driver_gender.map(|g| g.to_string()).into(),
            record.driver_age.map(u32::from).into(),
            record.driver_race.clone().into(),
            record.violation.clone().into(),
            record.search_conducted.into(),
            record.search_type.clone().into(),
            record.stop_outcome.clone().into(),
            record.is_arrested.into(),
            record.stop_duration.clone().into(),
            record.drugs_related_stop.into(),
            record.vehicle_number.clone().into(),
        ]);
    }
    table
}

/// Converts one row of a stop-log table. Missing columns read as `NULL`.
///
/// # Errors
///
/// Returns [`DbError::Conversion`] if a value has an unusable type, an
/// unknown gender code, or an age outside the accepted range.
pub fn stop_from_row(table: &TabularResult, row: usize) -> Result<StopRecord, DbError> {
    let cell = |column: &str| table.value(row, column).unwrap_or(&CellValue::Null);

    Ok(StopRecord {
        timestamp: timestamp_cell(cell("timestamp"))?,
        country_name: text_cell(cell("country_name")),
        driver_gender: gender_cell(cell("driver_gender"))?,
        driver_age: age_cell(cell("driver_age"))?,
        driver_race: text_cell(cell("driver_race")),
        violation: text_cell(cell("violation")),
        search_conducted: flag_cell("search_conducted", cell("search_conducted"))?,
        search_type: text_cell(cell("search_type")),
        stop_outcome: text_cell(cell("stop_outcome")),
        is_arrested: flag_cell("is_arrested", cell("is_arrested"))?,
        stop_duration: text_cell(cell("stop_duration")),
        drugs_related_stop: flag_cell("drugs_related_stop", cell("drugs_related_stop"))?,
        vehicle_number: text_cell(cell("vehicle_number")),
    })
}

fn text_cell(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Null => None,
        CellValue::Text(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn timestamp_cell(value: &CellValue) -> Result<Option<NaiveDateTime>, DbError> {
    match value {
        CellValue::Null => Ok(None),
        CellValue::DateTime(dt) => Ok(Some(*dt)),
        CellValue::Text(s) => ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(Some)
            .ok_or_else(|| DbError::Conversion {
                message: format!("Invalid timestamp '{s}'"),
            }),
        other => Err(DbError::Conversion {
            message: format!("Unexpected timestamp value {other:?}"),
        }),
    }
}

fn gender_cell(value: &CellValue) -> Result<Option<DriverGender>, DbError> {
    match value {
        CellValue::Null => Ok(None),
        CellValue::Text(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DbError::Conversion {
                message: format!("Unknown driver gender '{s}'"),
            }),
        other => Err(DbError::Conversion {
            message: format!("Unexpected driver gender value {other:?}"),
        }),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn age_cell(value: &CellValue) -> Result<Option<u8>, DbError> {
    let raw = match value {
        CellValue::Null => return Ok(None),
        CellValue::Int(v) => *v,
        CellValue::Real(v) if v.fract() == 0.0 => *v as i64,
        CellValue::Text(s) => s.trim().parse().map_err(|_| DbError::Conversion {
            message: format!("Invalid driver age '{s}'"),
        })?,
        other => {
            return Err(DbError::Conversion {
                message: format!("Unexpected driver age value {other:?}"),
            });
        }
    };

    validate_age(raw).map(Some).map_err(|e| DbError::Conversion {
        message: e.to_string(),
    })
}

fn flag_cell(column: &str, value: &CellValue) -> Result<bool, DbError> {
    match value {
        CellValue::Null => Ok(false),
        CellValue::Bool(b) => Ok(*b),
        CellValue::Int(v) => Ok(*v != 0),
        CellValue::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "1" | "yes" => Ok(true),
            "false" | "f" | "0" | "no" | "" => Ok(false),
            _ => Err(DbError::Conversion {
                message: format!("Invalid {column} flag '{s}'"),
            }),
        },
        other => Err(DbError::Conversion {
            message: format!("Unexpected {column} value {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn stop_table() -> TabularResult {
        TabularResult::new(STOP_LOG_COLUMNS)
    }

    #[test]
    fn converts_a_full_row() {
        let ts = NaiveDate::from_ymd_opt(2020, 3, 14)
            .unwrap()
            .and_hms_opt(21, 5, 0)
            .unwrap();
        let mut table = stop_table();
        table.push_row(vec![
            ts.into(),
            "Canada".into(),
            "F".into(),
            34_i64.into(),
            "Asian".into(),
            "Speeding".into(),
            true.into(),
            "Vehicle Search".into(),
            "Citation".into(),
            false.into(),
            "16-30 Min".into(),
            CellValue::Null,
            "AB1234".into(),
        ]);

        let (records, skipped) = stops_from_table(&table);
        assert_eq!(skipped, 0);
        let record = &records[0];
        assert_eq!(record.timestamp, Some(ts));
        assert_eq!(record.driver_gender, Some(DriverGender::Female));
        assert_eq!(record.driver_age, Some(34));
        assert!(record.search_conducted);
        assert!(!record.drugs_related_stop);
        assert_eq!(record.stop_duration.as_deref(), Some("16-30 Min"));
        assert_eq!(record.hour(), Some(21));
    }

    #[test]
    fn missing_columns_read_as_null() {
        let mut table = TabularResult::new(["violation"]);
        table.push_row(vec!["DUI".into()]);

        let record = stop_from_row(&table, 0).unwrap();
        assert_eq!(record.violation.as_deref(), Some("DUI"));
        assert!(record.timestamp.is_none());
        assert!(!record.is_arrested);
    }

    #[test]
    fn text_timestamps_and_flags_parse() {
        let mut table = TabularResult::new(["timestamp", "is_arrested"]);
        table.push_row(vec!["2021-06-01 06:30:00".into(), "t".into()]);

        let record = stop_from_row(&table, 0).unwrap();
        assert_eq!(record.hour(), Some(6));
        assert!(record.is_arrested);
    }

    #[test]
    fn skips_rows_with_out_of_range_age() {
        let mut table = TabularResult::new(["driver_age", "driver_gender"]);
        table.push_row(vec![140_i64.into(), "M".into()]);
        table.push_row(vec![40_i64.into(), "X".into()]);
        table.push_row(vec![40_i64.into(), "m".into()]);

        let (records, skipped) = stops_from_table(&table);
        assert_eq!(skipped, 2);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].driver_gender, Some(DriverGender::Male));
    }

    #[test]
    fn log_table_keeps_column_order_and_limit() {
        let records = vec![
            StopRecord {
                driver_gender: Some(DriverGender::Male),
                driver_age: Some(27),
                violation: Some("Speeding".to_string()),
                is_arrested: true,
                ..StopRecord::default()
            },
            StopRecord::default(),
            StopRecord::default(),
        ];

        let table = stops_to_table(&records, Some(2));
        assert_eq!(table.columns, STOP_LOG_COLUMNS);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(0, "driver_gender"), Some(&CellValue::Text("M".to_string())));
        assert_eq!(table.value(0, "driver_age"), Some(&CellValue::Int(27)));
        assert_eq!(table.value(0, "is_arrested"), Some(&CellValue::Bool(true)));
        assert_eq!(table.value(1, "violation"), Some(&CellValue::Null));

        let (reread, skipped) = stops_from_table(&table);
        assert_eq!(skipped, 0);
        assert_eq!(reread[0], records[0]);

        assert_eq!(stops_to_table(&records, None).row_count(), 3);
        assert_eq!(stops_to_table(&[], None).columns.len(), 13);
    }

    #[test]
    fn select_all_targets_stop_log() {
        assert_eq!(select_all_sql(), "SELECT * FROM \"Policelog\"");
    }
}
