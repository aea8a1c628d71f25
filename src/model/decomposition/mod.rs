pub mod step_2_basis_block;
pub mod step_3_decomposition_model_arch;

pub use step_3_decomposition_model_arch::TimeSeriesDecomposition;
