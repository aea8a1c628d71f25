// External imports
use burn::module::Module;
use burn::record::{BinFileRecorder, FullPrecisionSettings};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Internal imports
use crate::error::{ForecastError, Result};
use crate::model::config::ForecastConfig;
use crate::model::forecaster::GlobalForecastModel;
use crate::model::network::ForecastNetwork;
use crate::model::{CpuBackend, CpuDevice};

/// Metadata saved alongside model weights.
///
/// Carries everything needed to rebuild the network with the right
/// architecture before loading the weight record, plus the trained-state
/// flags a restored model must keep enforcing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ModelMetadata {
    pub config: ForecastConfig,
    pub used_covariates: bool,
    pub target_width: usize,
    pub total_width: usize,
    /// Unix timestamp when the model was saved.
    pub timestamp: u64,
    /// Crate version that produced the files.
    pub version: String,
    pub description: String,
}

/// Save a fitted model as a weight file plus a JSON metadata file.
///
/// Writes `<path>.bin` and `<path>.meta.json`; returns the weight path.
pub fn save_model(model: &GlobalForecastModel, path: &Path) -> Result<PathBuf> {
    let state = model.fitted_state().ok_or(ForecastError::NotFitted)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let weights_path = path.with_extension("bin");
    let metadata_path = path.with_extension("meta.json");

    let recorder: BinFileRecorder<FullPrecisionSettings> = Default::default();
    let saved = match &state.network {
        ForecastNetwork::Recurrent(net) => net.clone().save_file(&weights_path, &recorder),
        ForecastNetwork::Convolutional(net) => net.clone().save_file(&weights_path, &recorder),
        ForecastNetwork::Transformer(net) => net.clone().save_file(&weights_path, &recorder),
        ForecastNetwork::DecompositionStack(net) => net.clone().save_file(&weights_path, &recorder),
    };
    saved.map_err(|e| {
        ForecastError::Serialization(format!(
            "failed to save weights to {}: {}",
            weights_path.display(),
            e
        ))
    })?;

    let metadata = ModelMetadata {
        config: model.config().clone(),
        used_covariates: state.used_covariates,
        target_width: state.target_width,
        total_width: state.total_width,
        timestamp: Utc::now().timestamp() as u64,
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: format!(
            "{} global forecasting model",
            model.config().architecture.family_name()
        ),
    };
    let metadata_json = serde_json::to_string_pretty(&metadata)
        .map_err(|e| ForecastError::Serialization(e.to_string()))?;
    fs::write(&metadata_path, metadata_json)?;

    log::info!(
        "Saved model to {} with metadata at {}",
        weights_path.display(),
        metadata_path.display()
    );
    Ok(weights_path)
}

/// Load a model saved by [`save_model`].
///
/// The network is rebuilt from the metadata and the weight record loaded
/// into it. Training series are not persisted, so the restored model
/// requires an explicit target series at prediction time.
pub fn load_model(path: &Path, device: &CpuDevice) -> Result<GlobalForecastModel> {
    let weights_path = path.with_extension("bin");
    let metadata_path = path.with_extension("meta.json");

    if !weights_path.exists() {
        return Err(ForecastError::Serialization(format!(
            "model file not found: {}",
            weights_path.display()
        )));
    }

    let metadata_json = fs::read_to_string(&metadata_path)?;
    let metadata: ModelMetadata = serde_json::from_str(&metadata_json)
        .map_err(|e| ForecastError::Serialization(e.to_string()))?;

    let network = ForecastNetwork::<CpuBackend>::init(
        &metadata.config.architecture,
        metadata.config.input_window,
        metadata.config.output_window,
        metadata.total_width,
        device,
    );

    let recorder: BinFileRecorder<FullPrecisionSettings> = Default::default();
    let network = match network {
        ForecastNetwork::Recurrent(net) => net
            .load_file(&weights_path, &recorder, device)
            .map(ForecastNetwork::Recurrent),
        ForecastNetwork::Convolutional(net) => net
            .load_file(&weights_path, &recorder, device)
            .map(ForecastNetwork::Convolutional),
        ForecastNetwork::Transformer(net) => net
            .load_file(&weights_path, &recorder, device)
            .map(ForecastNetwork::Transformer),
        ForecastNetwork::DecompositionStack(net) => net
            .load_file(&weights_path, &recorder, device)
            .map(ForecastNetwork::DecompositionStack),
    }
    .map_err(|e| {
        ForecastError::Serialization(format!(
            "failed to load weights from {}: {}",
            weights_path.display(),
            e
        ))
    })?;

    GlobalForecastModel::from_loaded_network(
        metadata.config,
        network,
        metadata.used_covariates,
        metadata.target_width,
        metadata.total_width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{ArchitectureConfig, RecurrentConfig};
    use crate::model::step_4_train_model::TrainingConfig;
    use crate::series::generation::gaussian_series;
    use crate::series::Frequency;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn quick_model() -> (GlobalForecastModel, crate::series::TimeSeries) {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let series = gaussian_series(40, start, Frequency::Monthly, 0.5, 0.1, 9).unwrap();

        let config = ForecastConfig::new(
            8,
            4,
            ArchitectureConfig::Recurrent(RecurrentConfig {
                hidden_size: 8,
                num_layers: 1,
                dropout: 0.1,
            }),
        )
        .with_training(TrainingConfig {
            epochs: 1,
            ..TrainingConfig::default()
        });

        let mut model = GlobalForecastModel::new(config).unwrap();
        model.fit(std::slice::from_ref(&series), None).unwrap();
        (model, series)
    }

    #[test]
    fn test_save_load_round_trip() {
        let (model, series) = quick_model();
        let dir = tempdir().unwrap();
        let base = dir.path().join("recurrent_model");

        let weights_path = save_model(&model, &base).unwrap();
        assert!(weights_path.exists());
        assert!(base.with_extension("meta.json").exists());

        let device = CpuDevice::default();
        let loaded = load_model(&base, &device).unwrap();
        assert!(loaded.is_fitted());

        // Restored models keep the architecture and predict with an
        // explicit series
        let forecast = loaded.predict(4, Some(&series), None).unwrap();
        assert_eq!(forecast.len(), 4);
        assert_eq!(forecast.width(), 1);

        // Training series are not persisted: implicit-target predicts
        // are rejected after a load
        assert!(loaded.predict(4, None, None).is_err());
    }

    #[test]
    fn test_save_unfitted_fails() {
        let config = ForecastConfig::default();
        let model = GlobalForecastModel::new(config).unwrap();
        let dir = tempdir().unwrap();
        assert!(save_model(&model, &dir.path().join("unfit")).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let device = CpuDevice::default();
        assert!(load_model(&dir.path().join("nope"), &device).is_err());
    }
}
