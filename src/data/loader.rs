//! CSV Record Loader Module
//! Reads the avocado sales table with Polars and converts it into typed records.

use crate::data::record::{AvocadoType, Record, SizeVolumes, TOTAL_US};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const ROW_INDEX: &str = "__row";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    "Date",
    "AveragePrice",
    "Total Volume",
    "4046",
    "4225",
    "4770",
    "Total Bags",
    "Small Bags",
    "Large Bags",
    "XLarge Bags",
    "type",
    "year",
    "region",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Malformed value in column '{column}' at data row {row}")]
    MalformedField { column: String, row: u64 },
    #[error("Invalid date '{value}' at data row {row}")]
    InvalidDate { row: u64, value: String },
}

/// Loads avocado records from a delimited file, dropping whole-country rows.
pub struct RecordLoader {
    separator: u8,
}

impl Default for RecordLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordLoader {
    pub fn new() -> Self {
        Self {
            separator: b',',
        }
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Load every non-`TotalUS` row of the file into a [`Record`].
    pub fn load(&self, path: &Path) -> Result<Vec<Record>, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }
        info!(path = %path.display(), "loading avocado records");

        // Every column is read as text and typed by the casts below, so a
        // decimal far down an integer-looking column still parses
        let mut lazy = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(self.separator)
            .with_infer_schema_length(Some(0))
            .finish()?;

        let schema = lazy.collect_schema()?;
        for name in REQUIRED_COLUMNS {
            if !schema.contains(name) {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }

        // Row numbers are attached before filtering so errors point at the file
        let df = lazy
            .with_row_index(ROW_INDEX, Some(1))
            .filter(col("region").neq_missing(lit(TOTAL_US)))
            .collect()?;

        let records = Self::records_from_frame(&df)?;
        info!(records = records.len(), "loaded avocado records");
        Ok(records)
    }

    /// Convert an already-filtered frame into records.
    fn records_from_frame(df: &DataFrame) -> Result<Vec<Record>, LoaderError> {
        let rows = Self::row_numbers(df)?;

        let dates = Self::string_column(df, "Date", &rows)?;
        let prices = Self::float_column(df, "AveragePrice", &rows)?;
        let volumes = Self::float_column(df, "Total Volume", &rows)?;
        let plu_4046 = Self::float_column(df, "4046", &rows)?;
        let plu_4225 = Self::float_column(df, "4225", &rows)?;
        let plu_4770 = Self::float_column(df, "4770", &rows)?;
        let total_bags = Self::float_column(df, "Total Bags", &rows)?;
        let small_bags = Self::float_column(df, "Small Bags", &rows)?;
        let large_bags = Self::float_column(df, "Large Bags", &rows)?;
        let xlarge_bags = Self::float_column(df, "XLarge Bags", &rows)?;
        let types = Self::text_column(df, "type")?;
        let years = Self::int_column(df, "year", &rows)?;
        let regions = Self::string_column(df, "region", &rows)?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let date = NaiveDate::parse_from_str(dates[i].trim(), DATE_FORMAT).map_err(|_| {
                LoaderError::InvalidDate {
                    row: rows[i],
                    value: dates[i].clone(),
                }
            })?;

            records.push(Record {
                date,
                average_price: prices[i],
                total_volume: volumes[i],
                sizes: SizeVolumes::new(plu_4046[i], plu_4225[i], plu_4770[i]),
                total_bags: total_bags[i],
                small_bags: small_bags[i],
                large_bags: large_bags[i],
                xlarge_bags: xlarge_bags[i],
                avocado_type: AvocadoType::from_label(types[i].as_deref().unwrap_or("")),
                year: years[i],
                region: regions[i].clone(),
            });
        }

        Ok(records)
    }

    fn row_numbers(df: &DataFrame) -> Result<Vec<u64>, LoaderError> {
        let column = df.column(ROW_INDEX)?.cast(&DataType::UInt64)?;
        Ok(column.u64()?.into_iter().map(|v| v.unwrap_or(0)).collect())
    }

    fn float_column(df: &DataFrame, name: &str, rows: &[u64]) -> Result<Vec<f64>, LoaderError> {
        debug!(column = name, "extracting float column");
        let column = df.column(name)?.cast(&DataType::Float64)?;
        column
            .f64()?
            .into_iter()
            .zip(rows)
            .map(|(value, &row)| Self::require(value, name, row))
            .collect()
    }

    fn int_column(df: &DataFrame, name: &str, rows: &[u64]) -> Result<Vec<i32>, LoaderError> {
        debug!(column = name, "extracting integer column");
        let column = df.column(name)?.cast(&DataType::Int64)?;
        column
            .i64()?
            .into_iter()
            .zip(rows)
            .map(|(value, &row)| {
                let value = Self::require(value, name, row)?;
                i32::try_from(value).map_err(|_| LoaderError::MalformedField {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }

    fn string_column(
        df: &DataFrame,
        name: &str,
        rows: &[u64],
    ) -> Result<Vec<String>, LoaderError> {
        debug!(column = name, "extracting string column");
        let column = df.column(name)?.cast(&DataType::String)?;
        column
            .str()?
            .into_iter()
            .zip(rows)
            .map(|(value, &row)| Self::require(value, name, row).map(|s| s.to_string()))
            .collect()
    }

    /// Nullable text, for columns where an empty cell is still meaningful.
    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let column = df.column(name)?.cast(&DataType::String)?;
        Ok(column
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect())
    }

    fn require<T>(value: Option<T>, column: &str, row: u64) -> Result<T, LoaderError> {
        value.ok_or_else(|| LoaderError::MalformedField {
            column: column.to_string(),
            row,
        })
    }
}
