// External imports
use chrono::NaiveDate;

// Internal imports
use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;

/// Mean absolute percentage error between two series, in percent.
///
/// The series are aligned on their overlapping time range before scoring,
/// so a short forecast can be compared against a longer validation slice.
/// Zero actual values make the percentage undefined and are rejected.
pub fn mape(actual: &TimeSeries, predicted: &TimeSeries) -> Result<f64> {
    aligned_error(actual, predicted, |a, p| {
        if a == 0.0 {
            Err(ForecastError::InvalidInput(
                "mape is undefined for zero actual values".to_string(),
            ))
        } else {
            Ok(((a - p) / a).abs() * 100.0)
        }
    })
}

/// Mean absolute error between two series over their common time range.
pub fn mae(actual: &TimeSeries, predicted: &TimeSeries) -> Result<f64> {
    aligned_error(actual, predicted, |a, p| Ok((a - p).abs()))
}

/// Mean squared error between two series over their common time range.
pub fn mse(actual: &TimeSeries, predicted: &TimeSeries) -> Result<f64> {
    aligned_error(actual, predicted, |a, p| Ok((a - p) * (a - p)))
}

/// Root mean squared error between two series over their common time range.
pub fn rmse(actual: &TimeSeries, predicted: &TimeSeries) -> Result<f64> {
    Ok(mse(actual, predicted)?.sqrt())
}

fn aligned_error<F>(actual: &TimeSeries, predicted: &TimeSeries, pointwise: F) -> Result<f64>
where
    F: Fn(f64, f64) -> Result<f64>,
{
    if actual.width() != predicted.width() {
        return Err(ForecastError::InvalidInput(format!(
            "cannot compare series of width {} and {}",
            actual.width(),
            predicted.width()
        )));
    }
    if actual.frequency() != predicted.frequency() {
        return Err(ForecastError::InvalidInput(
            "cannot compare series of different frequencies".to_string(),
        ));
    }

    let start: NaiveDate = actual.start_time().max(predicted.start_time());
    let end: NaiveDate = actual.end_time().min(predicted.end_time());
    if start > end {
        return Err(ForecastError::InvalidInput(
            "series have no overlapping time range".to_string(),
        ));
    }

    let freq = actual.frequency();
    let len = freq
        .steps_between(start, end)
        .ok_or_else(|| ForecastError::InvalidInput("series time grids do not align".to_string()))?
        + 1;
    let a_offset = freq
        .steps_between(actual.start_time(), start)
        .ok_or_else(|| ForecastError::InvalidInput("series time grids do not align".to_string()))?;
    let p_offset = freq
        .steps_between(predicted.start_time(), start)
        .ok_or_else(|| ForecastError::InvalidInput("series time grids do not align".to_string()))?;

    let mut sum = 0.0;
    let mut count = 0usize;
    for t in 0..len {
        for c in 0..actual.width() {
            let a = actual.values()[(a_offset + t, c)];
            let p = predicted.values()[(p_offset + t, c)];
            sum += pointwise(a, p)?;
            count += 1;
        }
    }
    Ok(sum / count as f64)
}
