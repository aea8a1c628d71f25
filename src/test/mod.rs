pub mod fixture;
pub mod test_networks;
pub mod test_time_series;
