// External imports
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, LayerNorm, LayerNormConfig, Linear, LinearConfig};
use burn::tensor::{activation, backend::Backend, Tensor};

/// Scaled dot-product self-attention over a sequence.
#[derive(Module, Debug)]
pub struct SelfAttention<B: Backend> {
    query: Linear<B>,
    key: Linear<B>,
    value: Linear<B>,
}

impl<B: Backend> SelfAttention<B> {
    pub fn new(hidden_dim: usize, device: &B::Device) -> Self {
        Self {
            query: LinearConfig::new(hidden_dim, hidden_dim).init(device),
            key: LinearConfig::new(hidden_dim, hidden_dim).init(device),
            value: LinearConfig::new(hidden_dim, hidden_dim).init(device),
        }
    }

    /// Forward pass over `[batch, time, hidden]`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let batch_size = x.dims()[0];
        let seq_len = x.dims()[1];
        let hidden_dim = x.dims()[2];

        // Linear layers consume [batch * time, hidden]
        let x_reshaped = x.reshape([batch_size * seq_len, hidden_dim]);

        let q = self
            .query
            .forward(x_reshaped.clone())
            .reshape([batch_size, seq_len, hidden_dim]);
        let k = self
            .key
            .forward(x_reshaped.clone())
            .reshape([batch_size, seq_len, hidden_dim]);
        let v = self
            .value
            .forward(x_reshaped)
            .reshape([batch_size, seq_len, hidden_dim]);

        let scale = (hidden_dim as f64).sqrt();
        let k_t = k.permute([0, 2, 1]);

        // Scores: [batch, time, time]
        let scores = q.matmul(k_t) / scale;
        let weights = activation::softmax(scores, 2);

        weights.matmul(v)
    }
}

/// One encoder layer: self-attention and a position-wise feed-forward
/// sublayer, each with a residual connection and layer norm.
#[derive(Module, Debug)]
pub struct EncoderLayer<B: Backend> {
    attention: SelfAttention<B>,
    norm1: LayerNorm<B>,
    norm2: LayerNorm<B>,
    ff_inner: Linear<B>,
    ff_outer: Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> EncoderLayer<B> {
    pub fn new(d_model: usize, ff_size: usize, dropout: f64, device: &B::Device) -> Self {
        Self {
            attention: SelfAttention::new(d_model, device),
            norm1: LayerNormConfig::new(d_model).init(device),
            norm2: LayerNormConfig::new(d_model).init(device),
            ff_inner: LinearConfig::new(d_model, ff_size).init(device),
            ff_outer: LinearConfig::new(ff_size, d_model).init(device),
            dropout: DropoutConfig::new(dropout).init(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let batch_size = x.dims()[0];
        let seq_len = x.dims()[1];
        let d_model = x.dims()[2];

        let attended = self.attention.forward(x.clone());
        let x = self.norm1.forward(x + self.dropout.forward(attended));

        let flat = x.clone().reshape([batch_size * seq_len, d_model]);
        let ff = self
            .ff_outer
            .forward(activation::relu(self.ff_inner.forward(flat)))
            .reshape([batch_size, seq_len, d_model]);

        self.norm2.forward(x + self.dropout.forward(ff))
    }
}
