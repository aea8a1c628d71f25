// External imports
use burn::module::Module;
use burn::tensor::{backend::Backend, Tensor};

// Internal imports
use super::step_2_basis_block::BasisBlock;

/// Decomposition-stack forecasting architecture.
///
/// Blocks subtract their backcast from a running residual and add their
/// forecast to a running total, so each block models what the previous
/// ones left unexplained. Univariate input only.
#[derive(Module, Debug)]
pub struct TimeSeriesDecomposition<B: Backend> {
    blocks: Vec<BasisBlock<B>>,
    input_size: usize,
    output_size: usize,
}

impl<B: Backend> TimeSeriesDecomposition<B> {
    pub fn new(
        input_size: usize,
        output_size: usize,
        num_stacks: usize,
        num_blocks: usize,
        num_layers: usize,
        layer_width: usize,
        device: &B::Device,
    ) -> Self {
        let total_blocks = (num_stacks * num_blocks).max(1);
        let blocks = (0..total_blocks)
            .map(|_| BasisBlock::new(input_size, output_size, num_layers, layer_width, device))
            .collect();

        Self {
            blocks,
            input_size,
            output_size,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Forward pass: `[batch, time, 1]` -> `[batch, output_size]`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let batch_size = x.dims()[0];
        let seq_len = x.dims()[1];
        let device = x.device();

        // Univariate input flattens to [batch, time]
        let mut residual = x.reshape([batch_size, seq_len]);
        let mut total_forecast = Tensor::zeros([batch_size, self.output_size], &device);

        for block in &self.blocks {
            let (backcast, forecast) = block.forward(residual.clone());
            residual = residual - backcast;
            total_forecast = total_forecast + forecast;
        }

        total_forecast.clamp(0.0, 1.0)
    }
}
