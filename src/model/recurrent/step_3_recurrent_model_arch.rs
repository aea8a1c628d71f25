// External imports
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::prelude::Backend;
use burn::tensor::Tensor;

// Internal imports
use super::step_2_recurrent_cell::RecurrentCell;
use crate::constants::DEFAULT_DROPOUT;

/// Recurrent forecasting architecture.
///
/// A stack of gated recurrent layers, last-step pooling, dropout and a
/// linear head producing the whole output window in one shot.
#[derive(Module, Debug)]
pub struct TimeSeriesRnn<B: Backend> {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    cell: RecurrentCell<B>,
    dropout: Dropout,
    output: Linear<B>,
}

impl<B: Backend> TimeSeriesRnn<B> {
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        num_layers: usize,
        dropout_prob: f64,
        device: &B::Device,
    ) -> Self {
        let dropout_prob = if dropout_prob <= 0.0 {
            DEFAULT_DROPOUT
        } else {
            dropout_prob
        };

        let cell = RecurrentCell::new(input_size, hidden_size, num_layers, device);
        let dropout = DropoutConfig::new(dropout_prob).init();
        let output = LinearConfig::new(hidden_size, output_size).init(device);

        Self {
            input_size,
            hidden_size,
            output_size,
            cell,
            dropout,
            output,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Forward pass: `[batch, time, channels]` -> `[batch, output_size]`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let hidden_sequence = self.cell.forward(x);

        // Pool the last step of the sequence
        let batch_size = hidden_sequence.dims()[0];
        let last_step = hidden_sequence.dims()[1] - 1;
        let pooled = hidden_sequence
            .narrow(1, last_step, 1)
            .reshape([batch_size, self.hidden_size]);

        let dropped = self.dropout.forward(pooled);
        let output = self.output.forward(dropped);

        // Clamp to [0.0, 1.0] to match the normalized target range
        output.clamp(0.0, 1.0)
    }
}
