// External imports
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::{activation, backend::Backend, Tensor};

/// One basis-expansion block.
///
/// A small fully-connected trunk feeds two heads: a backcast over the
/// input window (what the block explains away) and a forecast over the
/// output window (what it contributes).
#[derive(Module, Debug)]
pub struct BasisBlock<B: Backend> {
    trunk: Vec<Linear<B>>,
    backcast: Linear<B>,
    forecast: Linear<B>,
}

impl<B: Backend> BasisBlock<B> {
    pub fn new(
        input_size: usize,
        output_size: usize,
        num_layers: usize,
        layer_width: usize,
        device: &B::Device,
    ) -> Self {
        let num_layers = num_layers.max(1);
        let mut trunk = Vec::with_capacity(num_layers);
        for i in 0..num_layers {
            let in_features = if i == 0 { input_size } else { layer_width };
            trunk.push(LinearConfig::new(in_features, layer_width).init(device));
        }

        Self {
            trunk,
            backcast: LinearConfig::new(layer_width, input_size).init(device),
            forecast: LinearConfig::new(layer_width, output_size).init(device),
        }
    }

    /// Returns `(backcast, forecast)` for a `[batch, input_size]` input.
    pub fn forward(&self, x: Tensor<B, 2>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let mut hidden = x;
        for layer in &self.trunk {
            hidden = activation::relu(layer.forward(hidden));
        }
        (
            self.backcast.forward(hidden.clone()),
            self.forecast.forward(hidden),
        )
    }
}
