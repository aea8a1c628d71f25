// External imports
use chrono::{Duration, Months, NaiveDate};
use ndarray::{concatenate, s, Array2, Axis};
use serde::{Deserialize, Serialize};

// Internal imports
use crate::error::{ForecastError, Result};

/// Sampling frequency of a time series.
///
/// The reference datasets used by this crate are monthly; daily series are
/// supported for the same operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Monthly,
    Daily,
}

impl Frequency {
    /// Advance a date by `steps` periods at this frequency.
    pub fn advance(&self, date: NaiveDate, steps: usize) -> NaiveDate {
        match self {
            Frequency::Monthly => date + Months::new(steps as u32),
            Frequency::Daily => date + Duration::days(steps as i64),
        }
    }

    /// Number of whole periods from `start` to `end`, if `end` lies on the
    /// grid spanned by `start` at this frequency.
    pub fn steps_between(&self, start: NaiveDate, end: NaiveDate) -> Option<usize> {
        if end < start {
            return None;
        }
        match self {
            Frequency::Monthly => {
                use chrono::Datelike;
                let months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
                if months >= 0 && self.advance(start, months as usize) == end {
                    Some(months as usize)
                } else {
                    None
                }
            }
            Frequency::Daily => Some((end - start).num_days() as usize),
        }
    }
}

/// An immutable, fixed-frequency time series with one or more channels.
///
/// Values are stored as a `(time, channels)` matrix aligned with a strictly
/// increasing time index. Derived series (slices, stacks, rescaled copies)
/// are new independent objects.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    times: Vec<NaiveDate>,
    values: Array2<f64>,
    frequency: Frequency,
}

impl TimeSeries {
    /// Build a series from an explicit time index and value matrix.
    ///
    /// The index must be non-empty, match the number of value rows, and
    /// advance by exactly one period per step.
    pub fn from_times_and_values(
        times: Vec<NaiveDate>,
        values: Array2<f64>,
        frequency: Frequency,
    ) -> Result<Self> {
        if times.is_empty() {
            return Err(ForecastError::InvalidInput(
                "time series cannot be empty".to_string(),
            ));
        }
        if times.len() != values.nrows() {
            return Err(ForecastError::InvalidInput(format!(
                "time index length {} does not match value rows {}",
                times.len(),
                values.nrows()
            )));
        }
        if values.ncols() == 0 {
            return Err(ForecastError::InvalidInput(
                "time series must have at least one channel".to_string(),
            ));
        }
        for pair in times.windows(2) {
            if frequency.advance(pair[0], 1) != pair[1] {
                return Err(ForecastError::InvalidInput(format!(
                    "time index is not strictly increasing at fixed frequency: {} -> {}",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(Self {
            times,
            values,
            frequency,
        })
    }

    /// Build a series from a start date and a value matrix, synthesizing
    /// the time index at the given frequency.
    pub fn from_values(start: NaiveDate, values: Array2<f64>, frequency: Frequency) -> Result<Self> {
        let times = (0..values.nrows())
            .map(|i| frequency.advance(start, i))
            .collect();
        Self::from_times_and_values(times, values, frequency)
    }

    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of channels (1 = univariate).
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn start_time(&self) -> NaiveDate {
        self.times[0]
    }

    pub fn end_time(&self) -> NaiveDate {
        self.times[self.times.len() - 1]
    }

    pub fn time_index(&self) -> &[NaiveDate] {
        &self.times
    }

    /// The `(time, channels)` value matrix.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn value_at(&self, step: usize, channel: usize) -> Option<f64> {
        self.values.get((step, channel)).copied()
    }

    /// A new series covering `len` steps starting at `start`.
    pub fn slice(&self, start: usize, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(ForecastError::InvalidInput(
                "slice length must be positive".to_string(),
            ));
        }
        if start + len > self.len() {
            return Err(ForecastError::InvalidInput(format!(
                "slice {}..{} out of bounds for series of length {}",
                start,
                start + len,
                self.len()
            )));
        }
        Ok(Self {
            times: self.times[start..start + len].to_vec(),
            values: self.values.slice(s![start..start + len, ..]).to_owned(),
            frequency: self.frequency,
        })
    }

    /// Everything except the last `n` steps.
    pub fn drop_last(&self, n: usize) -> Result<Self> {
        if n >= self.len() {
            return Err(ForecastError::InvalidInput(format!(
                "cannot drop {} steps from a series of length {}",
                n,
                self.len()
            )));
        }
        self.slice(0, self.len() - n)
    }

    /// The last `n` steps.
    pub fn last_n(&self, n: usize) -> Result<Self> {
        if n == 0 || n > self.len() {
            return Err(ForecastError::InvalidInput(format!(
                "cannot take the last {} steps of a series of length {}",
                n,
                self.len()
            )));
        }
        self.slice(self.len() - n, n)
    }

    /// Concatenate channels of two series sharing the same time index.
    pub fn stack(&self, other: &TimeSeries) -> Result<Self> {
        if self.frequency != other.frequency || self.times != other.times {
            return Err(ForecastError::InvalidInput(
                "stacked series must share the same time index".to_string(),
            ));
        }
        let values = concatenate(Axis(1), &[self.values.view(), other.values.view()]).map_err(
            |e| ForecastError::InvalidInput(format!("failed to stack series values: {}", e)),
        )?;
        Ok(Self {
            times: self.times.clone(),
            values,
            frequency: self.frequency,
        })
    }

    /// A copy of this series with the same time index and new values.
    pub fn with_values(&self, values: Array2<f64>) -> Result<Self> {
        Self::from_times_and_values(self.times.clone(), values, self.frequency)
    }
}
