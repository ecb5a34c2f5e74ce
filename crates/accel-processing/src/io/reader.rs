//! CSV loading.

use crate::error::{ProcessingError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Field values read as missing.
///
/// The same set pandas treats as NA by default, so files exported from a
/// pandas workflow load with the same gaps.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Load a comma-separated file with a header row.
///
/// # Errors
///
/// Returns `Parse` when the file is missing, unreadable, or not valid
/// delimited text.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(ProcessingError::parse(path, "file not found"));
    }

    debug!("Reading CSV from {}", path.display());

    let null_values = NullValues::AllColumns(MISSING_MARKERS.iter().map(|m| (*m).into()).collect());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        // Scan every row: integer-looking leading rows must not pin a
        // column to i64 when decimals follow further down.
        .with_infer_schema_length(None)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(b',')
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| ProcessingError::parse(path, e))?;

    if df.width() == 0 {
        return Err(ProcessingError::parse(path, "no header row"));
    }

    info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    Ok(df)
}

/// Per-column shape information for a loaded table.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnOverview {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
}

/// Shape and column summary of a table.
#[derive(Debug, Clone, Serialize)]
pub struct TableOverview {
    pub rows: usize,
    pub columns: Vec<ColumnOverview>,
}

/// Summarise a table's shape and per-column types and null counts.
pub fn describe_table(df: &DataFrame) -> TableOverview {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| ColumnOverview {
            name: column.name().to_string(),
            dtype: column.dtype().to_string(),
            null_count: column.null_count(),
        })
        .collect();

    TableOverview {
        rows: df.height(),
        columns,
    }
}
