// External imports
use ndarray::Array2;

// Internal imports
use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;

/// Per-channel min/max rescaling of a series into [0, 1].
///
/// A scaler is stateless until fitted; after `fit` it remembers the channel
/// ranges and can invert its own transform. Use a fresh instance per
/// independent stream (target vs. covariates) so ranges never leak between
/// them.
#[derive(Debug, Clone, Default)]
pub struct Scaler {
    params: Option<Vec<(f64, f64)>>,
}

impl Scaler {
    pub fn new() -> Self {
        Self { params: None }
    }

    /// Learn per-channel min/max from the series.
    pub fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let mut params = Vec::with_capacity(values.ncols());
        for channel in values.columns() {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for &v in channel {
                if v.is_nan() {
                    return Err(ForecastError::InvalidInput(
                        "cannot fit scaler on NaN values".to_string(),
                    ));
                }
                min = min.min(v);
                max = max.max(v);
            }
            params.push((min, max));
        }
        self.params = Some(params);
        Ok(())
    }

    /// Rescale a series with the fitted parameters.
    pub fn transform(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let params = self
            .params
            .as_ref()
            .ok_or_else(|| ForecastError::InvalidInput("scaler has not been fitted".to_string()))?;
        if params.len() != series.width() {
            return Err(ForecastError::InvalidInput(format!(
                "scaler was fitted on {} channels, series has {}",
                params.len(),
                series.width()
            )));
        }
        let mut scaled = Array2::zeros(series.values().dim());
        for (c, &(min, max)) in params.iter().enumerate() {
            let range = max - min;
            for (t, &v) in series.values().column(c).iter().enumerate() {
                // Constant channels map to the middle of the target range
                scaled[(t, c)] = if range.abs() < 1e-12 {
                    0.5
                } else {
                    (v - min) / range
                };
            }
        }
        series.with_values(scaled)
    }

    pub fn fit_transform(&mut self, series: &TimeSeries) -> Result<TimeSeries> {
        self.fit(series)?;
        self.transform(series)
    }

    /// Map a scaled series back to the original value range.
    pub fn inverse_transform(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let params = self
            .params
            .as_ref()
            .ok_or_else(|| ForecastError::InvalidInput("scaler has not been fitted".to_string()))?;
        if params.len() != series.width() {
            return Err(ForecastError::InvalidInput(format!(
                "scaler was fitted on {} channels, series has {}",
                params.len(),
                series.width()
            )));
        }
        let mut restored = Array2::zeros(series.values().dim());
        for (c, &(min, max)) in params.iter().enumerate() {
            let range = max - min;
            for (t, &v) in series.values().column(c).iter().enumerate() {
                restored[(t, c)] = if range.abs() < 1e-12 {
                    min
                } else {
                    v * range + min
                };
            }
        }
        series.with_values(restored)
    }
}
