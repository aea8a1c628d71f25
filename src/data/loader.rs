// External crates
use chrono::NaiveDate;
use ndarray::Array2;
use polars::prelude::*;
use std::path::Path;

// Internal imports
use crate::error::{ForecastError, Result};
use crate::series::{Frequency, TimeSeries};

/// Load a delimited tabular file into a [`TimeSeries`].
///
/// Expects a header row, a date column parseable as `%Y-%m-%d` or `%Y-%m`
/// (monthly timestamps), and one numeric column per requested channel.
pub fn load_csv_series(
    path: &Path,
    time_column: &str,
    value_columns: &[&str],
    frequency: Frequency,
) -> Result<TimeSeries> {
    log::info!("Loading series data from: {}", path.display());

    if !path.exists() {
        return Err(ForecastError::DataPreparation(format!(
            "file not found: {}",
            path.display()
        )));
    }
    if value_columns.is_empty() {
        return Err(ForecastError::InvalidInput(
            "at least one value column is required".to_string(),
        ));
    }

    let file = std::fs::File::open(path)?;
    let df = CsvReader::new(file).finish()?;

    // Verify required columns exist before touching any values
    for &col in std::iter::once(&time_column).chain(value_columns.iter()) {
        if df.column(col).is_err() {
            return Err(ForecastError::DataPreparation(format!(
                "required column {} not found in {}",
                col,
                path.display()
            )));
        }
    }

    let times = parse_time_column(&df, time_column)?;
    let height = df.height();

    let mut buffer = Vec::with_capacity(height * value_columns.len());
    let mut channels = Vec::with_capacity(value_columns.len());
    for &col in value_columns {
        let series = df.column(col)?.cast(&DataType::Float64)?;
        let chunked = series.f64()?.clone();
        channels.push(chunked);
    }
    for row in 0..height {
        for chunked in &channels {
            let value = chunked.get(row).ok_or_else(|| {
                ForecastError::DataPreparation(format!("missing value at row {}", row))
            })?;
            buffer.push(value);
        }
    }

    let values = Array2::from_shape_vec((height, value_columns.len()), buffer)
        .map_err(|e| ForecastError::InvalidShape(e.to_string()))?;
    TimeSeries::from_times_and_values(times, values, frequency)
}

fn parse_time_column(df: &DataFrame, time_column: &str) -> Result<Vec<NaiveDate>> {
    let column = df.column(time_column)?;
    let strings = column.str().map_err(|_| {
        ForecastError::DataPreparation(format!(
            "time column {} is not a string column",
            time_column
        ))
    })?;

    let mut times = Vec::with_capacity(df.height());
    for entry in strings.into_iter() {
        let raw = entry.ok_or_else(|| {
            ForecastError::DataPreparation("time column contains a missing value".to_string())
        })?;
        times.push(parse_date(raw)?);
    }
    Ok(times)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    // Monthly stamps like "1949-01" resolve to the first of the month
    let padded = format!("{}-01", raw);
    NaiveDate::parse_from_str(&padded, "%Y-%m-%d").map_err(|_| {
        ForecastError::DataPreparation(format!("cannot parse {} as a date", raw))
    })
}
