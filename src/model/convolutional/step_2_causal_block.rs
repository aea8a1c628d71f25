// External imports
use burn::module::Module;
use burn::nn::conv::{Conv1d, Conv1dConfig};
use burn::nn::{Dropout, DropoutConfig, PaddingConfig1d};
use burn::tensor::{activation, backend::Backend, Tensor};

/// Residual block of causal dilated convolutions.
///
/// Padding is applied on the left only (by over-padding and trimming the
/// tail) so no step ever sees future values.
#[derive(Module, Debug)]
pub struct CausalConvBlock<B: Backend> {
    conv1: Conv1d<B>,
    conv2: Conv1d<B>,
    dropout: Dropout,
    // 1x1 convolution aligning channel counts on the residual path
    residual: Option<Conv1d<B>>,
}

impl<B: Backend> CausalConvBlock<B> {
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        dilation: usize,
        dropout: f64,
        device: &B::Device,
    ) -> Self {
        // Causal padding: (kernel_size - 1) * dilation
        let padding = (kernel_size - 1) * dilation;

        let conv1 = Conv1dConfig::new(in_channels, out_channels, kernel_size)
            .with_dilation(dilation)
            .with_padding(PaddingConfig1d::Explicit(padding))
            .init(device);
        let conv2 = Conv1dConfig::new(out_channels, out_channels, kernel_size)
            .with_dilation(dilation)
            .with_padding(PaddingConfig1d::Explicit(padding))
            .init(device);

        let residual = if in_channels != out_channels {
            Some(Conv1dConfig::new(in_channels, out_channels, 1).init(device))
        } else {
            None
        };

        let dropout = DropoutConfig::new(dropout).init();

        Self {
            conv1,
            conv2,
            dropout,
            residual,
        }
    }

    /// Forward pass over `[batch, channels, time]`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let seq_len = x.dims()[2];

        let out = self.conv1.forward(x.clone());
        let dims = out.dims();
        // Trim the tail the symmetric padding added, keeping causality
        let out = out.slice([0..dims[0], 0..dims[1], 0..seq_len]);
        let out = activation::relu(out);
        let out = self.dropout.forward(out);

        let out = self.conv2.forward(out);
        let dims = out.dims();
        let out = out.slice([0..dims[0], 0..dims[1], 0..seq_len]);
        let out = activation::relu(out);
        let out = self.dropout.forward(out);

        let residual = match &self.residual {
            Some(conv) => conv.forward(x),
            None => x,
        };

        activation::relu(out + residual)
    }
}
