// External imports
use burn::tensor::{backend::Backend, Tensor};

// Internal imports
use crate::model::config::ArchitectureConfig;
use crate::model::convolutional::TimeSeriesTcn;
use crate::model::decomposition::TimeSeriesDecomposition;
use crate::model::recurrent::TimeSeriesRnn;
use crate::model::transformer::TimeSeriesTransformer;

/// A trained network of any supported family.
///
/// All variants share the same shape contract: `[batch, time, channels]`
/// in, `[batch, output_window * channels]` out.
#[derive(Debug)]
pub enum ForecastNetwork<B: Backend> {
    Recurrent(TimeSeriesRnn<B>),
    Convolutional(TimeSeriesTcn<B>),
    Transformer(TimeSeriesTransformer<B>),
    DecompositionStack(TimeSeriesDecomposition<B>),
}

impl<B: Backend> ForecastNetwork<B> {
    /// Initialize an untrained network for the given architecture.
    ///
    /// `width` is the full stacked channel count (target plus covariates);
    /// the head always emits `output_window * width` values.
    pub fn init(
        architecture: &ArchitectureConfig,
        input_window: usize,
        output_window: usize,
        width: usize,
        device: &B::Device,
    ) -> Self {
        let output_size = output_window * width;
        match architecture {
            ArchitectureConfig::Recurrent(c) => ForecastNetwork::Recurrent(TimeSeriesRnn::new(
                width,
                c.hidden_size,
                output_size,
                c.num_layers,
                c.dropout,
                device,
            )),
            ArchitectureConfig::Convolutional(c) => {
                ForecastNetwork::Convolutional(TimeSeriesTcn::new(
                    width,
                    &c.num_channels,
                    c.kernel_size,
                    output_size,
                    c.dropout,
                    device,
                ))
            }
            ArchitectureConfig::Transformer(c) => {
                ForecastNetwork::Transformer(TimeSeriesTransformer::new(
                    width,
                    c.d_model,
                    c.num_layers,
                    c.ff_size,
                    output_size,
                    c.dropout,
                    device,
                ))
            }
            ArchitectureConfig::DecompositionStack(c) => {
                ForecastNetwork::DecompositionStack(TimeSeriesDecomposition::new(
                    input_window,
                    output_size,
                    c.num_stacks,
                    c.num_blocks,
                    c.num_layers,
                    c.layer_width,
                    device,
                ))
            }
        }
    }

    /// Forward pass dispatching to the concrete family.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        match self {
            ForecastNetwork::Recurrent(net) => net.forward(x),
            ForecastNetwork::Convolutional(net) => net.forward(x),
            ForecastNetwork::Transformer(net) => net.forward(x),
            ForecastNetwork::DecompositionStack(net) => net.forward(x),
        }
    }

    pub fn family_name(&self) -> &'static str {
        match self {
            ForecastNetwork::Recurrent(_) => "recurrent",
            ForecastNetwork::Convolutional(_) => "convolutional",
            ForecastNetwork::Transformer(_) => "transformer",
            ForecastNetwork::DecompositionStack(_) => "decomposition-stack",
        }
    }
}
