//! Connection handling and raw query execution.

use securecheck_database_models::{CellValue, ConnectionConfig, QueryOutcome, TabularResult};
use switchy_database::{Database, DatabaseValue, Row};
use switchy_database_connection::Credentials;

use crate::DbError;

/// Opens a new connection described by `config`.
///
/// The connection is owned by the caller and closed when dropped.
///
/// # Errors
///
/// Returns [`DbError::Connection`] if the store cannot be reached or rejects
/// the credentials.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn Database>, DbError> {
    log::debug!("Connecting to {}", config.redacted_url());

    switchy_database_connection::init_postgres_raw_native_tls(credentials(config))
        .await
        .map_err(|e| DbError::Connection {
            message: e.to_string(),
        })
}

/// Builds driver credentials field by field. The user and password are
/// passed through untouched, so characters such as `@`, `:` or `/` need no
/// escaping.
fn credentials(config: &ConnectionConfig) -> Credentials {
    Credentials::new(
        config.host.clone(),
        Some(config.port),
        config.database.clone(),
        config.user.clone(),
        config.password().map(str::to_string),
    )
}

/// Runs `query` on a fresh connection and returns its rows.
///
/// # Errors
///
/// Returns [`DbError::Connection`] if no connection could be opened and
/// [`DbError::Query`] if the store rejected or failed the query.
pub async fn try_execute(config: &ConnectionConfig, query: &str) -> Result<TabularResult, DbError> {
    let db = connect(config).await?;
    log::debug!("Executing query: {query}");
    let rows = db.query_raw_params(query, &[]).await?;
    Ok(rows_to_table(&rows))
}

/// Runs `query` and degrades any failure into an empty result with a
/// diagnostic.
///
/// Callers cannot tell an empty result from a query that matched nothing
/// except through [`QueryOutcome::diagnostic`].
pub async fn execute(config: &ConnectionConfig, query: &str) -> QueryOutcome {
    match try_execute(config, query).await {
        Ok(result) => {
            log::debug!("Query returned {} row(s)", result.row_count());
            QueryOutcome::success(result)
        }
        Err(e) => {
            log::error!("{e}");
            QueryOutcome::failure(e.to_string())
        }
    }
}

/// Converts driver rows into a [`TabularResult`].
///
/// Column names come from the first row, so a query returning no rows
/// produces a result with no columns.
#[must_use]
pub fn rows_to_table(rows: &[Row]) -> TabularResult {
    let Some(first) = rows.first() else {
        return TabularResult::empty();
    };

    let mut table = TabularResult::new(first.columns.iter().map(|(name, _)| name.clone()));
    for row in rows {
        table.push_row(
            row.columns
                .iter()
                .map(|(_, value)| to_cell(value))
                .collect(),
        );
    }
    table
}

fn to_cell(value: &DatabaseValue) -> CellValue {
    match value {
        DatabaseValue::Null => CellValue::Null,
        DatabaseValue::String(s) => CellValue::Text(s.clone()),
        DatabaseValue::StringOpt(s) => CellValue::from(s.clone()),
        DatabaseValue::Bool(b) => CellValue::Bool(*b),
        DatabaseValue::BoolOpt(b) => CellValue::from(*b),
        DatabaseValue::Int8(v) => CellValue::Int(i64::from(*v)),
        DatabaseValue::Int8Opt(v) => CellValue::from(v.map(i64::from)),
        DatabaseValue::Int16(v) => CellValue::Int(i64::from(*v)),
        DatabaseValue::Int16Opt(v) => CellValue::from(v.map(i64::from)),
        DatabaseValue::Int32(v) => CellValue::Int(i64::from(*v)),
        DatabaseValue::Int32Opt(v) => CellValue::from(*v),
        DatabaseValue::Int64(v) => CellValue::Int(*v),
        DatabaseValue::Int64Opt(v) => CellValue::from(*v),
        DatabaseValue::UInt8(v) => CellValue::Int(i64::from(*v)),
        DatabaseValue::UInt8Opt(v) => CellValue::from(v.map(i64::from)),
        DatabaseValue::UInt16(v) => CellValue::Int(i64::from(*v)),
        DatabaseValue::UInt16Opt(v) => CellValue::from(v.map(i64::from)),
        DatabaseValue::UInt32(v) => CellValue::from(*v),
        DatabaseValue::UInt32Opt(v) => CellValue::from(*v),
        DatabaseValue::UInt64(v) => CellValue::from(*v),
        DatabaseValue::UInt64Opt(v) => CellValue::from(*v),
        DatabaseValue::Real32(v) => CellValue::Real(f64::from(*v)),
        DatabaseValue::Real32Opt(v) => CellValue::from(v.map(f64::from)),
        DatabaseValue::Real64(v) => CellValue::Real(*v),
        DatabaseValue::Real64Opt(v) => CellValue::from(*v),
        DatabaseValue::Decimal(d) => numeric_cell(&d.to_string()),
        DatabaseValue::DecimalOpt(d) => d.map_or(CellValue::Null, |d| numeric_cell(&d.to_string())),
        DatabaseValue::DateTime(dt) => CellValue::DateTime(*dt),
        other => {
            log::trace!("Rendering unmapped database value as text: {other:?}");
            CellValue::Text(format!("{other:?}"))
        }
    }
}

/// Converts the text of a `NUMERIC` value, as produced by `ROUND` or
/// `EXTRACT`. Whole numbers without a scale become integers, the rest reals.
/// Values outside `f64` stay as text.
fn numeric_cell(text: &str) -> CellValue {
    if let Ok(whole) = text.parse::<i64>() {
        return CellValue::Int(whole);
    }
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map_or_else(|| CellValue::Text(text.to_string()), CellValue::Real)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_means_no_columns() {
        let table = rows_to_table(&[]);
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn maps_common_values() {
        assert_eq!(to_cell(&DatabaseValue::Null), CellValue::Null);
        assert_eq!(to_cell(&DatabaseValue::Int32(7)), CellValue::Int(7));
        assert_eq!(to_cell(&DatabaseValue::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            to_cell(&DatabaseValue::String("Speeding".to_string())),
            CellValue::Text("Speeding".to_string())
        );
        assert_eq!(to_cell(&DatabaseValue::StringOpt(None)), CellValue::Null);
    }

    #[test]
    fn maps_unsigned_and_narrow_values() {
        assert_eq!(to_cell(&DatabaseValue::UInt64(42)), CellValue::Int(42));
        assert_eq!(to_cell(&DatabaseValue::UInt8Opt(None)), CellValue::Null);
        assert_eq!(to_cell(&DatabaseValue::Int16(-3)), CellValue::Int(-3));
        assert_eq!(to_cell(&DatabaseValue::Real32(0.5)), CellValue::Real(0.5));
    }

    #[test]
    fn numeric_text_becomes_real() {
        assert_eq!(numeric_cell("0.58"), CellValue::Real(0.58));
        assert_eq!(numeric_cell("100.00"), CellValue::Real(100.0));
        assert_eq!(numeric_cell("17"), CellValue::Int(17));
        assert_eq!(numeric_cell("NaN"), CellValue::Text("NaN".to_string()));
    }

    #[tokio::test]
    async fn unreachable_store_degrades_to_empty_result() {
        let config = ConnectionConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..ConnectionConfig::default()
        };

        let outcome = execute(&config, "SELECT 1").await;

        assert!(outcome.is_failure());
        assert!(outcome.result.is_empty());
        assert!(outcome.result.columns.is_empty());
    }
}
