// External crates
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use ndarray::{concatenate, s, Array2, Array3, Axis};

// Internal modules
use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;

/// Channel-concatenate a target series with its covariates over the full
/// training range.
///
/// At fit time target and covariates must share the same time index; the
/// resulting matrix carries the target channels first, covariate channels
/// after them.
pub fn fit_matrix(series: &TimeSeries, covariates: Option<&TimeSeries>) -> Result<Array2<f64>> {
    match covariates {
        Some(cov) => Ok(series.stack(cov)?.values().clone()),
        None => Ok(series.values().clone()),
    }
}

/// The trailing `window` steps of a target series, channel-concatenated
/// with the covariate values covering the same dates.
///
/// Unlike [`fit_matrix`], the covariate series may extend past the target
/// on either side; it only has to cover the window.
pub fn window_with_covariates(
    series: &TimeSeries,
    covariates: Option<&TimeSeries>,
    window: usize,
) -> Result<Array2<f64>> {
    let tail = series.last_n(window)?;
    let cov = match covariates {
        Some(cov) => cov,
        None => return Ok(tail.values().clone()),
    };

    if cov.frequency() != series.frequency() {
        return Err(ForecastError::InvalidInput(
            "covariates must have the same frequency as the target series".to_string(),
        ));
    }
    let offset = cov
        .frequency()
        .steps_between(cov.start_time(), tail.start_time())
        .ok_or_else(|| {
            ForecastError::InvalidInput(
                "covariates do not align with the target series time grid".to_string(),
            )
        })?;
    if offset + window > cov.len() {
        return Err(ForecastError::InvalidInput(format!(
            "covariates end at {} but must cover the target input window ending at {}",
            cov.end_time(),
            series.end_time()
        )));
    }

    let cov_window = cov.values().slice(s![offset..offset + window, ..]);
    concatenate(Axis(1), &[tail.values().view(), cov_window])
        .map_err(|e| ForecastError::InvalidShape(e.to_string()))
}

/// Slide fixed windows over every series and emit training tensors.
///
/// Features have shape `[samples, input_window, width]`; targets hold the
/// following `output_window` steps of the full stacked width, flattened to
/// `[samples, output_window * width]`.
pub fn build_training_tensors<B: Backend>(
    series: &[TimeSeries],
    covariates: Option<&[TimeSeries]>,
    input_window: usize,
    output_window: usize,
    device: &B::Device,
) -> Result<(Tensor<B, 3>, Tensor<B, 2>)> {
    let mut feature_buffer: Vec<f32> = Vec::new();
    let mut target_buffer: Vec<f32> = Vec::new();
    let mut n_samples = 0usize;
    let mut width = 0usize;

    for (i, target) in series.iter().enumerate() {
        let cov = covariates.map(|c| &c[i]);
        let stacked = fit_matrix(target, cov)?;
        let rows = stacked.nrows();

        if width == 0 {
            width = stacked.ncols();
        } else if stacked.ncols() != width {
            return Err(ForecastError::InvalidInput(format!(
                "series {} has {} stacked channels, expected {}",
                i,
                stacked.ncols(),
                width
            )));
        }

        if rows < input_window + output_window {
            return Err(ForecastError::InvalidInput(format!(
                "series {} has {} steps but input_window={} and output_window={} require {}",
                i,
                rows,
                input_window,
                output_window,
                input_window + output_window
            )));
        }

        let max_sequences = rows - input_window - output_window + 1;
        for start in 0..max_sequences {
            for row in start..start + input_window {
                for col in 0..width {
                    feature_buffer.push(stacked[(row, col)] as f32);
                }
            }
            for row in start + input_window..start + input_window + output_window {
                for col in 0..width {
                    target_buffer.push(stacked[(row, col)] as f32);
                }
            }
        }
        n_samples += max_sequences;
    }

    let features = Tensor::<B, 1>::from_floats(feature_buffer.as_slice(), device)
        .reshape([n_samples, input_window, width]);
    let targets = Tensor::<B, 1>::from_floats(target_buffer.as_slice(), device)
        .reshape([n_samples, output_window * width]);
    Ok((features, targets))
}

/// Convert a `(samples, time, channels)` array into an input tensor.
pub fn batch_to_tensor<B: Backend>(batch: &Array3<f64>, device: &B::Device) -> Tensor<B, 3> {
    let (samples, time, channels) = batch.dim();
    let standard = batch.as_standard_layout();
    let buffer: Vec<f32> = standard.iter().map(|&v| v as f32).collect();
    Tensor::<B, 1>::from_floats(buffer.as_slice(), device).reshape([samples, time, channels])
}

/// Reshape a flattened network output back into `(samples, steps, width)`.
pub fn outputs_to_array<B: Backend>(
    output: Tensor<B, 2>,
    samples: usize,
    steps: usize,
    width: usize,
) -> Result<Array3<f64>> {
    let data = output.to_data().convert::<f32>();
    let slice = data
        .as_slice::<f32>()
        .map_err(|_| ForecastError::InvalidShape("network output is not contiguous".to_string()))?;
    if slice.len() != samples * steps * width {
        return Err(ForecastError::InvalidShape(format!(
            "network produced {} values, expected {}",
            slice.len(),
            samples * steps * width
        )));
    }
    let values: Vec<f64> = slice.iter().map(|&v| v as f64).collect();
    Array3::from_shape_vec((samples, steps, width), values)
        .map_err(|e| ForecastError::InvalidShape(e.to_string()))
}
