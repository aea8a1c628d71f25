// External imports
use burn::module::AutodiffModule;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

// Internal imports
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE};
use crate::error::{ForecastError, Result};

/// Training settings shared by every model family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
    /// Epochs without improvement before stopping early.
    pub patience: usize,
    pub min_delta: f64,
    /// Seed for the per-epoch sample shuffle, for reproducible runs.
    pub shuffle_seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            batch_size: DEFAULT_BATCH_SIZE,
            epochs: DEFAULT_EPOCHS,
            patience: 5,
            min_delta: 1e-4,
            shuffle_seed: 42,
        }
    }
}

/// Train any forecasting network with Adam on an MSE objective.
///
/// The forward closure keeps this generic over the concrete family; the
/// trained model is returned by value, as burn optimizers consume and
/// rebuild the module each step.
pub fn train_network<B, M, F>(
    model: M,
    forward: F,
    features: Tensor<B, 3>,
    targets: Tensor<B, 2>,
    config: &TrainingConfig,
    device: &B::Device,
) -> Result<M>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Clone,
    F: Fn(&M, Tensor<B, 3>) -> Tensor<B, 2>,
{
    let num_samples = features.dims()[0];
    if num_samples == 0 {
        return Err(ForecastError::InvalidInput(
            "cannot train on zero samples".to_string(),
        ));
    }
    if config.epochs == 0 || config.batch_size == 0 {
        return Err(ForecastError::InvalidInput(
            "epochs and batch size must be positive".to_string(),
        ));
    }

    let mut optim = AdamConfig::new().init::<B, M>();
    let mut model = model;

    let mut best_loss = f64::INFINITY;
    let mut patience_counter = 0usize;
    let mut indices: Vec<usize> = (0..num_samples).collect();

    for epoch in 0..config.epochs {
        let mut rng = StdRng::seed_from_u64(config.shuffle_seed.wrapping_add(epoch as u64));
        indices.shuffle(&mut rng);

        let mut epoch_loss = 0.0;
        let mut num_batches = 0usize;

        for chunk in indices.chunks(config.batch_size) {
            let batch_indices: Vec<i32> = chunk.iter().map(|&i| i as i32).collect();
            let index_tensor = Tensor::<B, 1, Int>::from_ints(batch_indices.as_slice(), device);

            let batch_features = features.clone().select(0, index_tensor.clone());
            let batch_targets = targets.clone().select(0, index_tensor);

            let predictions = forward(&model, batch_features);
            let diff = predictions - batch_targets;
            let loss = (diff.clone() * diff).mean();

            epoch_loss += loss.clone().into_scalar().elem::<f32>() as f64;
            num_batches += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(config.learning_rate, model, grads);
        }

        let avg_loss = epoch_loss / num_batches as f64;
        log::info!("Epoch {}/{} - loss {:.6}", epoch + 1, config.epochs, avg_loss);

        if avg_loss < best_loss - config.min_delta {
            best_loss = avg_loss;
            patience_counter = 0;
        } else {
            patience_counter += 1;
            if patience_counter >= config.patience {
                log::info!("Early stopping triggered after {} epochs", epoch + 1);
                break;
            }
        }
    }

    Ok(model)
}
