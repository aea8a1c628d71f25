// External imports
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::{backend::Backend, Tensor};

// Internal imports
use super::step_2_causal_block::CausalConvBlock;

/// Convolutional forecasting architecture.
///
/// Stacked causal residual blocks with exponentially increasing dilation,
/// last-step pooling and a linear head over the full output window.
#[derive(Module, Debug)]
pub struct TimeSeriesTcn<B: Backend> {
    blocks: Vec<CausalConvBlock<B>>,
    output: Linear<B>,
    final_channels: usize,
    output_size: usize,
}

impl<B: Backend> TimeSeriesTcn<B> {
    pub fn new(
        input_size: usize,
        num_channels: &[usize],
        kernel_size: usize,
        output_size: usize,
        dropout: f64,
        device: &B::Device,
    ) -> Self {
        let mut blocks = Vec::with_capacity(num_channels.len());
        for (i, &out_channels) in num_channels.iter().enumerate() {
            let in_channels = if i == 0 { input_size } else { num_channels[i - 1] };
            // Exponential dilation: 1, 2, 4, 8, ...
            let dilation = 1 << i;
            blocks.push(CausalConvBlock::new(
                in_channels,
                out_channels,
                kernel_size,
                dilation,
                dropout,
                device,
            ));
        }

        let final_channels = *num_channels.last().unwrap_or(&input_size);
        let output = LinearConfig::new(final_channels, output_size).init(device);

        Self {
            blocks,
            output,
            final_channels,
            output_size,
        }
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Forward pass: `[batch, time, channels]` -> `[batch, output_size]`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        // Convolutions expect [batch, channels, time]
        let mut out = x.permute([0, 2, 1]);
        for block in &self.blocks {
            out = block.forward(out);
        }

        // Pool the last (most recent) step
        let batch_size = out.dims()[0];
        let last_step = out.dims()[2] - 1;
        let pooled = out
            .narrow(2, last_step, 1)
            .reshape([batch_size, self.final_channels]);

        self.output.forward(pooled).clamp(0.0, 1.0)
    }
}
