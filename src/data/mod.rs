pub mod dataset;
pub mod loader;

pub use dataset::SequenceDataset;
pub use loader::load_csv_series;
