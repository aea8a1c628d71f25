pub mod config;
pub mod convolutional;
pub mod decomposition;
pub mod forecaster;
pub mod network;
pub mod recurrent;
pub mod step_1_tensor_preparation;
pub mod step_4_train_model;
pub mod step_5_prediction;
pub mod step_6_model_serialization;
pub mod transformer;

pub use config::{ArchitectureConfig, ForecastConfig};
pub use forecaster::GlobalForecastModel;
pub use network::ForecastNetwork;
pub use step_4_train_model::TrainingConfig;

/// CPU inference backend used by fitted models.
pub type CpuBackend = burn_ndarray::NdArray<f32>;

/// Autodiff wrapper over the CPU backend, used during fitting.
pub type TrainingBackend = burn_autodiff::Autodiff<CpuBackend>;

/// Device shared by both backends.
pub type CpuDevice = burn_ndarray::NdArrayDevice;
