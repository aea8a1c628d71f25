// External imports
use ndarray::{Array3, Axis};

// Internal imports
use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;

/// A pre-built batch of inference inputs: `(samples, time, channels)`.
///
/// This is the dataset-object form accepted by the dataset-predict entry
/// point; the raw numeric alternative is a plain 3-D array of the same
/// layout.
#[derive(Debug, Clone)]
pub struct SequenceDataset {
    values: Array3<f64>,
}

impl SequenceDataset {
    /// Wrap an existing `(samples, time, channels)` array.
    pub fn new(values: Array3<f64>) -> Result<Self> {
        let (samples, time, channels) = values.dim();
        if samples == 0 || time == 0 || channels == 0 {
            return Err(ForecastError::InvalidShape(format!(
                "dataset dimensions must all be positive, got ({}, {}, {})",
                samples, time, channels
            )));
        }
        Ok(Self { values })
    }

    /// Build a batch from the trailing `window` steps of each series.
    ///
    /// All series must share the same channel count.
    pub fn from_series(series: &[TimeSeries], window: usize) -> Result<Self> {
        if series.is_empty() {
            return Err(ForecastError::InvalidInput(
                "cannot build a dataset from zero series".to_string(),
            ));
        }
        let width = series[0].width();
        let mut values = Array3::zeros((series.len(), window, width));
        for (i, s) in series.iter().enumerate() {
            if s.width() != width {
                return Err(ForecastError::InvalidInput(format!(
                    "series {} has width {}, expected {}",
                    i,
                    s.width(),
                    width
                )));
            }
            let tail = s.last_n(window)?;
            values
                .index_axis_mut(Axis(0), i)
                .assign(tail.values());
        }
        Self::new(values)
    }

    pub fn num_samples(&self) -> usize {
        self.values.dim().0
    }

    pub fn time_steps(&self) -> usize {
        self.values.dim().1
    }

    pub fn width(&self) -> usize {
        self.values.dim().2
    }

    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }
}
