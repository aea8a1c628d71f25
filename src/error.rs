// External imports
use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors raised at the public forecasting API boundary.
///
/// Every variant is raised synchronously at the call that violates the
/// contract; nothing is retried or suppressed internally.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// A caller-supplied argument violates the fit/predict contract
    /// (missing target selector, missing covariates, horizon above the
    /// output window, misaligned series, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The dataset-predict entry point received a runtime value of an
    /// unsupported type.
    #[error("unsupported input type: {0}")]
    UnsupportedInput(String),

    /// A numeric array input has the wrong rank or dimensions.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Predict was called on a model that has not been fitted.
    #[error("model has not been fitted")]
    NotFitted,

    /// Loading or preparing input data failed.
    #[error("data preparation failed: {0}")]
    DataPreparation(String),

    /// Saving or loading a model failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
