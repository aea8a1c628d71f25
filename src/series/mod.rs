pub mod generation;
pub mod scaler;
pub mod time_series;

pub use scaler::Scaler;
pub use time_series::{Frequency, TimeSeries};
