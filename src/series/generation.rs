// External imports
use chrono::{Datelike, NaiveDate};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

// Internal imports
use crate::error::{ForecastError, Result};
use crate::series::{Frequency, TimeSeries};

/// Calendar attribute extracted from a series' time index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatetimeAttribute {
    Year,
    Month,
}

/// Generate a univariate gaussian-noise series of the given length.
pub fn gaussian_series(
    length: usize,
    start: NaiveDate,
    frequency: Frequency,
    mean: f64,
    std: f64,
    seed: u64,
) -> Result<TimeSeries> {
    if length == 0 {
        return Err(ForecastError::InvalidInput(
            "gaussian series length must be positive".to_string(),
        ));
    }
    let normal = Normal::new(mean, std)
        .map_err(|e| ForecastError::InvalidInput(format!("invalid gaussian parameters: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let values: Vec<f64> = (0..length).map(|_| rng.sample(normal)).collect();
    let values = Array2::from_shape_vec((length, 1), values)
        .map_err(|e| ForecastError::InvalidShape(e.to_string()))?;
    TimeSeries::from_values(start, values, frequency)
}

/// A univariate series holding one calendar attribute (year or month
/// number) per step of the input series' time index.
pub fn datetime_attribute_series(
    series: &TimeSeries,
    attribute: DatetimeAttribute,
) -> Result<TimeSeries> {
    let values: Vec<f64> = series
        .time_index()
        .iter()
        .map(|date| match attribute {
            DatetimeAttribute::Year => date.year() as f64,
            DatetimeAttribute::Month => date.month() as f64,
        })
        .collect();
    let values = Array2::from_shape_vec((series.len(), 1), values)
        .map_err(|e| ForecastError::InvalidShape(e.to_string()))?;
    series.with_values(values)
}

/// A copy of the series with seeded gaussian noise added to every value.
pub fn with_gaussian_noise(series: &TimeSeries, std: f64, seed: u64) -> Result<TimeSeries> {
    let normal = Normal::new(0.0, std)
        .map_err(|e| ForecastError::InvalidInput(format!("invalid noise level: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = series.values().clone();
    values.iter_mut().for_each(|v| *v += rng.sample(normal));
    series.with_values(values)
}
