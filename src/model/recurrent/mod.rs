pub mod step_2_recurrent_cell;
pub mod step_3_recurrent_model_arch;

pub use step_3_recurrent_model_arch::TimeSeriesRnn;
