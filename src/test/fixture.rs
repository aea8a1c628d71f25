// External imports
use std::path::PathBuf;

// Internal imports
use crate::constants::{
    AIR_PASSENGERS_CSV, AIR_PASSENGERS_TIME_COLUMN, AIR_PASSENGERS_VALUE_COLUMN,
    DEFAULT_INPUT_WINDOW, DEFAULT_OUTPUT_WINDOW, VALIDATION_POINTS,
};
use crate::data::load_csv_series;
use crate::model::config::{
    ArchitectureConfig, ConvolutionalConfig, DecompositionConfig, ForecastConfig, RecurrentConfig,
    TransformerConfig,
};
use crate::model::TrainingConfig;
use crate::series::generation::{datetime_attribute_series, with_gaussian_noise, DatetimeAttribute};
use crate::series::{Frequency, Scaler, TimeSeries};

/// Shared reference data for the global forecasting tests.
///
/// Everything is scaled to [0, 1]: the passenger series through one
/// scaler, the calendar covariates through an independent one.
pub struct GlobalFixture {
    /// Full scaled passenger series (144 monthly steps).
    pub scaled: TimeSeries,
    /// First 108 steps, used for fitting.
    pub train: TimeSeries,
    /// Held-out last 36 steps.
    pub val: TimeSeries,
    /// Train segment with seeded gaussian noise added, as a second series.
    pub train_noisy: TimeSeries,
    /// Scaled year+month covariates over the full range.
    pub covariates: TimeSeries,
    /// Covariates restricted to the training range.
    pub covariates_train: TimeSeries,
}

pub fn global_fixture() -> GlobalFixture {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(AIR_PASSENGERS_CSV);
    let raw = load_csv_series(
        &path,
        AIR_PASSENGERS_TIME_COLUMN,
        &[AIR_PASSENGERS_VALUE_COLUMN],
        Frequency::Monthly,
    )
    .expect("reference dataset should load");

    let mut scaler = Scaler::new();
    let scaled = scaler.fit_transform(&raw).unwrap();
    let train = scaled.drop_last(VALIDATION_POINTS).unwrap();
    let val = scaled.last_n(VALIDATION_POINTS).unwrap();

    let train_noisy = with_gaussian_noise(&train, 0.01, 42).unwrap();

    let years = datetime_attribute_series(&scaled, DatetimeAttribute::Year).unwrap();
    let months = datetime_attribute_series(&scaled, DatetimeAttribute::Month).unwrap();
    let mut scaler_dt = Scaler::new();
    let covariates = scaler_dt.fit_transform(&years.stack(&months).unwrap()).unwrap();
    let covariates_train = covariates.drop_last(VALIDATION_POINTS).unwrap();

    GlobalFixture {
        scaled,
        train,
        val,
        train_noisy,
        covariates,
        covariates_train,
    }
}

/// One registered model configuration plus its acceptance criteria.
pub struct ModelCase {
    pub name: &'static str,
    pub config: ForecastConfig,
    /// Acceptable validation error bound, in percent.
    pub max_mape: f64,
    /// The decomposition-stack family is univariate only.
    pub supports_multivariate: bool,
}

fn short_training() -> TrainingConfig {
    TrainingConfig {
        epochs: 10,
        batch_size: 32,
        ..TrainingConfig::default()
    }
}

fn case(
    name: &'static str,
    architecture: ArchitectureConfig,
    supports_multivariate: bool,
) -> ModelCase {
    ModelCase {
        name,
        config: ForecastConfig::new(DEFAULT_INPUT_WINDOW, DEFAULT_OUTPUT_WINDOW, architecture)
            .with_training(short_training()),
        max_mape: 180.0,
        supports_multivariate,
    }
}

/// Every model family with representative hyperparameters, kept small so
/// the whole battery trains in bounded time.
pub fn model_roster() -> Vec<ModelCase> {
    vec![
        case(
            "recurrent",
            ArchitectureConfig::Recurrent(RecurrentConfig {
                hidden_size: 10,
                num_layers: 1,
                dropout: 0.1,
            }),
            true,
        ),
        case(
            "convolutional",
            ArchitectureConfig::Convolutional(ConvolutionalConfig::default()),
            true,
        ),
        case(
            "transformer",
            ArchitectureConfig::Transformer(TransformerConfig {
                d_model: 16,
                num_layers: 2,
                ff_size: 16,
                dropout: 0.1,
            }),
            true,
        ),
        case(
            "decomposition-stack",
            ArchitectureConfig::DecompositionStack(DecompositionConfig {
                num_stacks: 4,
                num_blocks: 1,
                num_layers: 2,
                layer_width: 12,
            }),
            false,
        ),
    ]
}
