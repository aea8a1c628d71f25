// External imports
use burn::module::AutodiffModule;
use ndarray::{s, Array3, ArrayD, Axis, Ix3};
use std::any::Any;

// Internal imports
use crate::data::SequenceDataset;
use crate::error::{ForecastError, Result};
use crate::model::config::{ArchitectureConfig, ForecastConfig};
use crate::model::network::ForecastNetwork;
use crate::model::step_1_tensor_preparation::{build_training_tensors, window_with_covariates};
use crate::model::step_4_train_model::train_network;
use crate::model::step_5_prediction::autoregressive_forecast;
use crate::model::{CpuBackend, CpuDevice, TrainingBackend};
use crate::series::TimeSeries;

/// Everything a fit leaves behind.
///
/// The flags gate which arguments later predict calls must supply, checked
/// at the start of every call rather than inferred dynamically.
pub(crate) struct FittedState {
    pub network: ForecastNetwork<CpuBackend>,
    pub trained_on_single: bool,
    pub used_covariates: bool,
    pub target_width: usize,
    pub total_width: usize,
    pub training_series: Vec<TimeSeries>,
}

/// A global forecasting model: one set of parameters trained across one or
/// many series, optionally informed by aligned covariate series.
///
/// Constructed with a [`ForecastConfig`], moved to the trained state by
/// [`fit`](Self::fit), after which [`predict`](Self::predict) and
/// [`predict_from_dataset`](Self::predict_from_dataset) are usable any
/// number of times.
pub struct GlobalForecastModel {
    config: ForecastConfig,
    state: Option<FittedState>,
}

impl GlobalForecastModel {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: None,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Train on one or several target series.
    ///
    /// When covariates are given there must be exactly one covariate
    /// series per target, channel-aligned over the same time index. The
    /// model remembers whether it was trained on a single series and
    /// whether covariates were used; both gate the arguments
    /// [`predict`](Self::predict) requires later.
    pub fn fit(
        &mut self,
        series: &[TimeSeries],
        covariates: Option<&[TimeSeries]>,
    ) -> Result<()> {
        if series.is_empty() {
            return Err(ForecastError::InvalidInput(
                "fit requires at least one series".to_string(),
            ));
        }

        let target_width = series[0].width();
        let frequency = series[0].frequency();
        for (i, s) in series.iter().enumerate() {
            if s.width() != target_width {
                return Err(ForecastError::InvalidInput(format!(
                    "series {} has width {}, expected {}",
                    i,
                    s.width(),
                    target_width
                )));
            }
            if s.frequency() != frequency {
                return Err(ForecastError::InvalidInput(
                    "all training series must share the same frequency".to_string(),
                ));
            }
        }

        let cov_width = match covariates {
            Some(covs) => {
                if covs.len() != series.len() {
                    return Err(ForecastError::InvalidInput(format!(
                        "got {} covariate series for {} targets; one per target is required",
                        covs.len(),
                        series.len()
                    )));
                }
                let width = covs[0].width();
                for (i, c) in covs.iter().enumerate() {
                    if c.width() != width {
                        return Err(ForecastError::InvalidInput(format!(
                            "covariate series {} has width {}, expected {}",
                            i,
                            c.width(),
                            width
                        )));
                    }
                }
                width
            }
            None => 0,
        };
        let total_width = target_width + cov_width;

        if matches!(self.config.architecture, ArchitectureConfig::DecompositionStack(_))
            && total_width > 1
        {
            return Err(ForecastError::InvalidInput(
                "the decomposition-stack family supports univariate series without covariates only"
                    .to_string(),
            ));
        }

        let device = CpuDevice::default();
        let (features, targets) = build_training_tensors::<TrainingBackend>(
            series,
            covariates,
            self.config.input_window,
            self.config.output_window,
            &device,
        )?;

        log::info!(
            "Fitting {} model on {} series ({} samples)",
            self.config.architecture.family_name(),
            series.len(),
            features.dims()[0]
        );

        let untrained = ForecastNetwork::<TrainingBackend>::init(
            &self.config.architecture,
            self.config.input_window,
            self.config.output_window,
            total_width,
            &device,
        );
        let training = &self.config.training;
        let network = match untrained {
            ForecastNetwork::Recurrent(net) => ForecastNetwork::Recurrent(
                train_network(net, |m, x| m.forward(x), features, targets, training, &device)?
                    .valid(),
            ),
            ForecastNetwork::Convolutional(net) => ForecastNetwork::Convolutional(
                train_network(net, |m, x| m.forward(x), features, targets, training, &device)?
                    .valid(),
            ),
            ForecastNetwork::Transformer(net) => ForecastNetwork::Transformer(
                train_network(net, |m, x| m.forward(x), features, targets, training, &device)?
                    .valid(),
            ),
            ForecastNetwork::DecompositionStack(net) => ForecastNetwork::DecompositionStack(
                train_network(net, |m, x| m.forward(x), features, targets, training, &device)?
                    .valid(),
            ),
        };

        self.state = Some(FittedState {
            network,
            trained_on_single: series.len() == 1,
            used_covariates: covariates.is_some(),
            target_width,
            total_width,
            training_series: series.to_vec(),
        });
        Ok(())
    }

    /// Forecast `n` future steps of one series.
    ///
    /// `series` may be omitted only when the model was trained on exactly
    /// one series; `covariates` are required exactly when the model was
    /// trained with covariates, in which case `n` cannot exceed the
    /// configured output window.
    pub fn predict(
        &self,
        n: usize,
        series: Option<&TimeSeries>,
        covariates: Option<&TimeSeries>,
    ) -> Result<TimeSeries> {
        let state = self.state.as_ref().ok_or(ForecastError::NotFitted)?;
        if n == 0 {
            return Err(ForecastError::InvalidInput(
                "forecast horizon must be positive".to_string(),
            ));
        }

        let target = match series {
            Some(s) => s,
            None => {
                if !state.trained_on_single {
                    return Err(ForecastError::InvalidInput(
                        "model was trained on multiple series; the target series must be supplied"
                            .to_string(),
                    ));
                }
                &state.training_series[0]
            }
        };

        let covariates = match (state.used_covariates, covariates) {
            (true, Some(c)) => Some(c),
            (true, None) => {
                return Err(ForecastError::InvalidInput(
                    "model was trained with covariates; covariates must be supplied at prediction"
                        .to_string(),
                ))
            }
            (false, Some(_)) => {
                return Err(ForecastError::InvalidInput(
                    "model was trained without covariates".to_string(),
                ))
            }
            (false, None) => None,
        };

        if state.used_covariates && n > self.config.output_window {
            return Err(ForecastError::InvalidInput(format!(
                "a covariate model cannot predict {} steps past its output window of {}",
                n, self.config.output_window
            )));
        }

        if target.width() != state.target_width {
            return Err(ForecastError::InvalidInput(format!(
                "series has width {} but the model was trained on width {}",
                target.width(),
                state.target_width
            )));
        }
        if target.len() < self.config.input_window {
            return Err(ForecastError::InvalidInput(format!(
                "series holds {} steps but the model requires an input window of {}",
                target.len(),
                self.config.input_window
            )));
        }

        let window = window_with_covariates(target, covariates, self.config.input_window)?;
        if window.ncols() != state.total_width {
            return Err(ForecastError::InvalidInput(format!(
                "stacked input has {} channels but the model was trained with {}",
                window.ncols(),
                state.total_width
            )));
        }

        let context = window.insert_axis(Axis(0));
        let device = CpuDevice::default();
        let forecast = autoregressive_forecast(
            &state.network,
            &context,
            n,
            self.config.input_window,
            self.config.output_window,
            &device,
        )?;

        // Only target channels make it into the returned series
        let values = forecast
            .index_axis(Axis(0), 0)
            .slice(s![.., ..state.target_width])
            .to_owned();
        let start = target.frequency().advance(target.end_time(), 1);
        TimeSeries::from_values(start, values, target.frequency())
    }

    /// Forecast `n` steps for each series in an ordered collection,
    /// returning one forecast per input series in the same order.
    pub fn predict_multiple(
        &self,
        n: usize,
        series: &[TimeSeries],
        covariates: Option<&[TimeSeries]>,
    ) -> Result<Vec<TimeSeries>> {
        if series.is_empty() {
            return Err(ForecastError::InvalidInput(
                "predict requires at least one series".to_string(),
            ));
        }
        if let Some(covs) = covariates {
            if covs.len() != series.len() {
                return Err(ForecastError::InvalidInput(format!(
                    "got {} covariate series for {} targets",
                    covs.len(),
                    series.len()
                )));
            }
        }
        series
            .iter()
            .enumerate()
            .map(|(i, s)| self.predict(n, Some(s), covariates.map(|c| &c[i])))
            .collect()
    }

    /// Forecast directly from a prepared dataset or a raw numeric batch.
    ///
    /// The entry point is dynamically typed, mirroring the original API
    /// surface: supported inputs are a [`SequenceDataset`], an
    /// `ndarray::Array3<f64>`, or a dynamic-rank `ndarray::ArrayD<f64>`
    /// of rank 3, all laid out `(samples, time, channels)`. Anything else
    /// is an [`ForecastError::UnsupportedInput`] error, while supported
    /// inputs with a bad rank, a too-short time dimension or a channel
    /// mismatch fail with [`ForecastError::InvalidShape`].
    ///
    /// Returns the predicted batch `(samples, n, channels)`, preserving
    /// sample order and the full trained channel width.
    pub fn predict_from_dataset(
        &self,
        n: usize,
        input_series_dataset: &dyn Any,
    ) -> Result<Array3<f64>> {
        let state = self.state.as_ref().ok_or(ForecastError::NotFitted)?;
        if n == 0 {
            return Err(ForecastError::InvalidInput(
                "forecast horizon must be positive".to_string(),
            ));
        }

        let values: Array3<f64> = if let Some(dataset) =
            input_series_dataset.downcast_ref::<SequenceDataset>()
        {
            dataset.values().clone()
        } else if let Some(array) = input_series_dataset.downcast_ref::<Array3<f64>>() {
            array.clone()
        } else if let Some(dynamic) = input_series_dataset.downcast_ref::<ArrayD<f64>>() {
            if dynamic.ndim() != 3 {
                return Err(ForecastError::InvalidShape(format!(
                    "expected a (samples, time, channels) array, got {} dimensions",
                    dynamic.ndim()
                )));
            }
            dynamic
                .clone()
                .into_dimensionality::<Ix3>()
                .map_err(|e| ForecastError::InvalidShape(e.to_string()))?
        } else {
            return Err(ForecastError::UnsupportedInput(
                "expected a SequenceDataset or a 3-dimensional f64 array".to_string(),
            ));
        };

        let (samples, time_steps, channels) = values.dim();
        if samples == 0 {
            return Err(ForecastError::InvalidShape(
                "input batch holds no samples".to_string(),
            ));
        }
        if time_steps < self.config.input_window {
            return Err(ForecastError::InvalidShape(format!(
                "input holds {} time steps but the model requires at least {}",
                time_steps, self.config.input_window
            )));
        }
        if channels != state.total_width {
            return Err(ForecastError::InvalidShape(format!(
                "input has {} channels but the model was trained with {}",
                channels, state.total_width
            )));
        }

        let device = CpuDevice::default();
        autoregressive_forecast(
            &state.network,
            &values,
            n,
            self.config.input_window,
            self.config.output_window,
            &device,
        )
    }

    pub(crate) fn fitted_state(&self) -> Option<&FittedState> {
        self.state.as_ref()
    }

    /// Rebuild a model around a deserialized network.
    ///
    /// Training series are not persisted, so a loaded model always needs
    /// an explicit target series at prediction time.
    pub(crate) fn from_loaded_network(
        config: ForecastConfig,
        network: ForecastNetwork<CpuBackend>,
        used_covariates: bool,
        target_width: usize,
        total_width: usize,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: Some(FittedState {
                network,
                trained_on_single: false,
                used_covariates,
                target_width,
                total_width,
                training_series: Vec::new(),
            }),
        })
    }
}
