// External imports
use ndarray::{concatenate, s, Array3, Axis};

// Internal imports
use crate::error::{ForecastError, Result};
use crate::model::network::ForecastNetwork;
use crate::model::step_1_tensor_preparation::{batch_to_tensor, outputs_to_array};
use crate::model::{CpuBackend, CpuDevice};

/// Roll a trained network forward for `n` steps.
///
/// The network emits one output window per pass; longer horizons are
/// produced recursively by appending each prediction to the context and
/// sliding the input window forward. All channels (target and covariate)
/// are predicted, so the rollout is closed over its own output.
pub fn autoregressive_forecast(
    network: &ForecastNetwork<CpuBackend>,
    context: &Array3<f64>,
    n: usize,
    input_window: usize,
    output_window: usize,
    device: &CpuDevice,
) -> Result<Array3<f64>> {
    let (samples, time_steps, width) = context.dim();
    if n == 0 {
        return Err(ForecastError::InvalidInput(
            "forecast horizon must be positive".to_string(),
        ));
    }
    if time_steps < input_window {
        return Err(ForecastError::InvalidShape(format!(
            "context holds {} steps but the model needs an input window of {}",
            time_steps, input_window
        )));
    }

    // Only the trailing input window conditions the forecast
    let mut window = context
        .slice(s![.., time_steps - input_window.., ..])
        .to_owned();
    let mut collected: Option<Array3<f64>> = None;
    let mut remaining = n;

    while remaining > 0 {
        let input = batch_to_tensor::<CpuBackend>(&window, device);
        let output = network.forward(input);
        let predicted = outputs_to_array(output, samples, output_window, width)?;

        let take = remaining.min(output_window);
        let step = predicted.slice(s![.., ..take, ..]).to_owned();

        collected = Some(match collected {
            Some(acc) => concatenate(Axis(1), &[acc.view(), step.view()])
                .map_err(|e| ForecastError::InvalidShape(e.to_string()))?,
            None => step,
        });
        remaining -= take;

        if remaining > 0 {
            // Slide the window over the freshly predicted steps
            let extended = concatenate(Axis(1), &[window.view(), predicted.view()])
                .map_err(|e| ForecastError::InvalidShape(e.to_string()))?;
            let total = extended.dim().1;
            window = extended
                .slice(s![.., total - input_window.., ..])
                .to_owned();
        }
    }

    let forecast = collected.ok_or_else(|| {
        ForecastError::InvalidShape("autoregressive rollout produced no output".to_string())
    })?;
    debug_assert_eq!(forecast.dim(), (samples, n, width));
    Ok(forecast)
}
