// External imports
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use burn_ndarray::NdArray;

// Internal imports
use crate::model::config::{
    ArchitectureConfig, ConvolutionalConfig, DecompositionConfig, RecurrentConfig,
    TransformerConfig,
};
use crate::model::convolutional::TimeSeriesTcn;
use crate::model::decomposition::TimeSeriesDecomposition;
use crate::model::network::ForecastNetwork;
use crate::model::recurrent::step_2_recurrent_cell::RecurrentCell;
use crate::model::recurrent::TimeSeriesRnn;
use crate::model::transformer::TimeSeriesTransformer;

type TestBackend = NdArray<f32>;

fn device() -> <TestBackend as Backend>::Device {
    Default::default()
}

fn assert_unit_range(output: &Tensor<TestBackend, 2>) {
    let data = output.to_data().convert::<f32>();
    for val in data.as_slice::<f32>().unwrap() {
        assert!(!val.is_nan(), "output contains NaN values");
        assert!(
            *val >= 0.0 && *val <= 1.0,
            "output should be clamped to [0, 1], got {}",
            val
        );
    }
}

#[test]
fn test_recurrent_cell_forward_pass() {
    let device = device();
    // batch_size=2, seq_len=3, input_size=4
    let input = Tensor::<TestBackend, 3>::ones([2, 3, 4], &device);
    let cell = RecurrentCell::<TestBackend>::new(4, 5, 1, &device);

    let output = cell.forward(input);
    assert_eq!(output.dims(), [2, 3, 5]);

    let data = output.to_data().convert::<f32>();
    for val in data.as_slice::<f32>().unwrap() {
        assert!(!val.is_nan(), "output contains NaN values");
    }
}

#[test]
fn test_recurrent_cell_stacks_layers() {
    let device = device();
    let input = Tensor::<TestBackend, 3>::ones([2, 3, 4], &device);
    let cell = RecurrentCell::<TestBackend>::new(4, 5, 2, &device);

    let output = cell.forward(input);
    assert_eq!(output.dims(), [2, 3, 5]);
}

#[test]
fn test_recurrent_model_output_shape() {
    let device = device();
    let model = TimeSeriesRnn::<TestBackend>::new(3, 20, 12, 1, 0.1, &device);
    let input = Tensor::<TestBackend, 3>::ones([2, 5, 3], &device);

    let output = model.forward(input);
    assert_eq!(output.dims(), [2, 12]);
    assert_unit_range(&output);
}

#[test]
fn test_tcn_model_output_shape() {
    let device = device();
    let model = TimeSeriesTcn::<TestBackend>::new(2, &[8, 8], 3, 24, 0.1, &device);
    let input = Tensor::<TestBackend, 3>::ones([4, 24, 2], &device);

    let output = model.forward(input);
    assert_eq!(output.dims(), [4, 24]);
    assert_unit_range(&output);
}

#[test]
fn test_transformer_model_output_shape() {
    let device = device();
    let model = TimeSeriesTransformer::<TestBackend>::new(2, 16, 2, 16, 24, 0.1, &device);
    let input = Tensor::<TestBackend, 3>::ones([3, 24, 2], &device);

    let output = model.forward(input);
    assert_eq!(output.dims(), [3, 24]);
    assert_unit_range(&output);
}

#[test]
fn test_decomposition_model_output_shape() {
    let device = device();
    let model = TimeSeriesDecomposition::<TestBackend>::new(24, 12, 4, 1, 2, 12, &device);
    let input = Tensor::<TestBackend, 3>::ones([2, 24, 1], &device);

    let output = model.forward(input);
    assert_eq!(output.dims(), [2, 12]);
    assert_unit_range(&output);
}

#[test]
fn test_network_dispatch_per_family() {
    let device = device();
    let input_window = 12;
    let output_window = 6;
    let width = 1;

    let architectures = vec![
        ArchitectureConfig::Recurrent(RecurrentConfig {
            hidden_size: 8,
            num_layers: 1,
            dropout: 0.1,
        }),
        ArchitectureConfig::Convolutional(ConvolutionalConfig {
            num_channels: vec![8],
            kernel_size: 3,
            dropout: 0.1,
        }),
        ArchitectureConfig::Transformer(TransformerConfig {
            d_model: 8,
            num_layers: 1,
            ff_size: 8,
            dropout: 0.1,
        }),
        ArchitectureConfig::DecompositionStack(DecompositionConfig {
            num_stacks: 2,
            num_blocks: 1,
            num_layers: 1,
            layer_width: 8,
        }),
    ];

    for architecture in architectures {
        let network = ForecastNetwork::<TestBackend>::init(
            &architecture,
            input_window,
            output_window,
            width,
            &device,
        );
        let input = Tensor::<TestBackend, 3>::ones([2, input_window, width], &device);
        let output = network.forward(input);
        assert_eq!(
            output.dims(),
            [2, output_window * width],
            "{} family broke the shape contract",
            network.family_name()
        );
        assert_unit_range(&output);
    }
}
