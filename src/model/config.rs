// External imports
use serde::{Deserialize, Serialize};

// Internal imports
use crate::constants::{DEFAULT_DROPOUT, DEFAULT_INPUT_WINDOW, DEFAULT_OUTPUT_WINDOW};
use crate::error::{ForecastError, Result};
use crate::model::step_4_train_model::TrainingConfig;

/// Hyperparameters for the recurrent (gated RNN) family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrentConfig {
    pub hidden_size: usize,
    pub num_layers: usize,
    pub dropout: f64,
}

impl Default for RecurrentConfig {
    fn default() -> Self {
        Self {
            hidden_size: 32,
            num_layers: 1,
            dropout: DEFAULT_DROPOUT,
        }
    }
}

/// Hyperparameters for the convolutional (causal dilated TCN) family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvolutionalConfig {
    /// Output channels of each residual block; dilation doubles per block.
    pub num_channels: Vec<usize>,
    pub kernel_size: usize,
    pub dropout: f64,
}

impl Default for ConvolutionalConfig {
    fn default() -> Self {
        Self {
            num_channels: vec![16, 16],
            kernel_size: 3,
            dropout: DEFAULT_DROPOUT,
        }
    }
}

/// Hyperparameters for the transformer encoder family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerConfig {
    pub d_model: usize,
    pub num_layers: usize,
    pub ff_size: usize,
    pub dropout: f64,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            d_model: 16,
            num_layers: 2,
            ff_size: 16,
            dropout: DEFAULT_DROPOUT,
        }
    }
}

/// Hyperparameters for the decomposition-stack family.
///
/// The family is univariate only: fitting it on more than one channel is
/// rejected at fit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompositionConfig {
    pub num_stacks: usize,
    pub num_blocks: usize,
    pub num_layers: usize,
    pub layer_width: usize,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            num_stacks: 4,
            num_blocks: 1,
            num_layers: 2,
            layer_width: 12,
        }
    }
}

/// The supported model families behind the shared fit/predict contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ArchitectureConfig {
    Recurrent(RecurrentConfig),
    Convolutional(ConvolutionalConfig),
    Transformer(TransformerConfig),
    DecompositionStack(DecompositionConfig),
}

impl ArchitectureConfig {
    pub fn family_name(&self) -> &'static str {
        match self {
            ArchitectureConfig::Recurrent(_) => "recurrent",
            ArchitectureConfig::Convolutional(_) => "convolutional",
            ArchitectureConfig::Transformer(_) => "transformer",
            ArchitectureConfig::DecompositionStack(_) => "decomposition-stack",
        }
    }
}

/// Full model configuration: forecasting windows, architecture and
/// training settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Past steps consumed per inference step.
    pub input_window: usize,
    /// Future steps produced per inference step.
    pub output_window: usize,
    pub architecture: ArchitectureConfig,
    pub training: TrainingConfig,
}

impl ForecastConfig {
    pub fn new(
        input_window: usize,
        output_window: usize,
        architecture: ArchitectureConfig,
    ) -> Self {
        Self {
            input_window,
            output_window,
            architecture,
            training: TrainingConfig::default(),
        }
    }

    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_window == 0 || self.output_window == 0 {
            return Err(ForecastError::InvalidInput(
                "input and output windows must be positive".to_string(),
            ));
        }
        if let ArchitectureConfig::Convolutional(c) = &self.architecture {
            if c.num_channels.is_empty() || c.kernel_size == 0 {
                return Err(ForecastError::InvalidInput(
                    "convolutional family needs at least one block and a positive kernel"
                        .to_string(),
                ));
            }
        }
        if let ArchitectureConfig::DecompositionStack(c) = &self.architecture {
            if c.num_stacks == 0 || c.num_blocks == 0 || c.num_layers == 0 || c.layer_width == 0 {
                return Err(ForecastError::InvalidInput(
                    "decomposition stack dimensions must all be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_INPUT_WINDOW,
            DEFAULT_OUTPUT_WINDOW,
            ArchitectureConfig::Recurrent(RecurrentConfig::default()),
        )
    }
}
