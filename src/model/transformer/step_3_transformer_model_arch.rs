// External imports
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::{backend::Backend, Tensor};

// Internal imports
use super::step_2_attention::EncoderLayer;

/// Transformer forecasting architecture.
///
/// Input projection plus sinusoidal position information, a stack of
/// encoder layers, last-step pooling and a linear head over the full
/// output window.
#[derive(Module, Debug)]
pub struct TimeSeriesTransformer<B: Backend> {
    input_projection: Linear<B>,
    layers: Vec<EncoderLayer<B>>,
    output: Linear<B>,
    d_model: usize,
    output_size: usize,
}

impl<B: Backend> TimeSeriesTransformer<B> {
    pub fn new(
        input_size: usize,
        d_model: usize,
        num_layers: usize,
        ff_size: usize,
        output_size: usize,
        dropout: f64,
        device: &B::Device,
    ) -> Self {
        let input_projection = LinearConfig::new(input_size, d_model).init(device);
        let layers = (0..num_layers.max(1))
            .map(|_| EncoderLayer::new(d_model, ff_size, dropout, device))
            .collect();
        let output = LinearConfig::new(d_model, output_size).init(device);

        Self {
            input_projection,
            layers,
            output,
            d_model,
            output_size,
        }
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Forward pass: `[batch, time, channels]` -> `[batch, output_size]`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let batch_size = x.dims()[0];
        let seq_len = x.dims()[1];
        let input_size = x.dims()[2];
        let device = x.device();

        let projected = self
            .input_projection
            .forward(x.reshape([batch_size * seq_len, input_size]))
            .reshape([batch_size, seq_len, self.d_model]);

        // Broadcast the positional encoding over the batch dimension
        let positions = self.positional_encoding(seq_len, &device);
        let mut out = projected + positions.unsqueeze::<3>();

        for layer in &self.layers {
            out = layer.forward(out);
        }

        let last_step = seq_len - 1;
        let pooled = out
            .narrow(1, last_step, 1)
            .reshape([batch_size, self.d_model]);

        self.output.forward(pooled).clamp(0.0, 1.0)
    }

    /// Standard sinusoidal position encoding of shape `[time, d_model]`.
    fn positional_encoding(&self, seq_len: usize, device: &B::Device) -> Tensor<B, 2> {
        let mut buffer = Vec::with_capacity(seq_len * self.d_model);
        for pos in 0..seq_len {
            for i in 0..self.d_model {
                let exponent = (2 * (i / 2)) as f64 / self.d_model as f64;
                let angle = pos as f64 / 10000f64.powf(exponent);
                let value = if i % 2 == 0 { angle.sin() } else { angle.cos() };
                buffer.push(value as f32);
            }
        }
        Tensor::<B, 1>::from_floats(buffer.as_slice(), device).reshape([seq_len, self.d_model])
    }
}
