// External imports
use chrono::NaiveDate;
use ndarray::{array, Array2};
use std::path::PathBuf;

// Internal imports
use crate::constants::{
    AIR_PASSENGERS_CSV, AIR_PASSENGERS_TIME_COLUMN, AIR_PASSENGERS_VALUE_COLUMN,
};
use crate::data::load_csv_series;
use crate::series::{Frequency, TimeSeries};

fn date(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn monthly(values: Vec<f64>) -> TimeSeries {
    let len = values.len();
    TimeSeries::from_values(
        date(2020, 1),
        Array2::from_shape_vec((len, 1), values).unwrap(),
        Frequency::Monthly,
    )
    .unwrap()
}

#[test]
fn test_construction_invariants() {
    // Empty series are rejected
    assert!(TimeSeries::from_times_and_values(
        vec![],
        Array2::zeros((0, 1)),
        Frequency::Monthly
    )
    .is_err());

    // Time index and values must agree in length
    assert!(TimeSeries::from_times_and_values(
        vec![date(2020, 1)],
        Array2::zeros((2, 1)),
        Frequency::Monthly
    )
    .is_err());

    // Gaps in the index violate the fixed frequency
    assert!(TimeSeries::from_times_and_values(
        vec![date(2020, 1), date(2020, 3)],
        Array2::zeros((2, 1)),
        Frequency::Monthly
    )
    .is_err());

    // Out-of-order timestamps are rejected
    assert!(TimeSeries::from_times_and_values(
        vec![date(2020, 2), date(2020, 1)],
        Array2::zeros((2, 1)),
        Frequency::Monthly
    )
    .is_err());
}

#[test]
fn test_slicing_derivations() {
    let series = monthly(vec![1.0, 2.0, 3.0, 4.0, 5.0]);

    let head = series.drop_last(2).unwrap();
    assert_eq!(head.len(), 3);
    assert_eq!(head.start_time(), date(2020, 1));
    assert_eq!(head.end_time(), date(2020, 3));

    let tail = series.last_n(2).unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail.start_time(), date(2020, 4));
    assert_eq!(tail.values().column(0).to_vec(), vec![4.0, 5.0]);

    let middle = series.slice(1, 3).unwrap();
    assert_eq!(middle.start_time(), date(2020, 2));
    assert_eq!(middle.values().column(0).to_vec(), vec![2.0, 3.0, 4.0]);

    // Derived series are independent of the source
    assert!(series.slice(3, 4).is_err());
    assert!(series.drop_last(5).is_err());
    assert!(series.last_n(6).is_err());
}

#[test]
fn test_stack_concatenates_channels() {
    let a = monthly(vec![1.0, 2.0, 3.0]);
    let b = monthly(vec![4.0, 5.0, 6.0]);

    let stacked = a.stack(&b).unwrap();
    assert_eq!(stacked.width(), 2);
    assert_eq!(stacked.len(), 3);
    assert_eq!(stacked.values().row(0).to_vec(), vec![1.0, 4.0]);

    // Misaligned time indexes cannot be stacked
    let shifted = TimeSeries::from_values(
        date(2020, 2),
        array![[1.0], [2.0], [3.0]],
        Frequency::Monthly,
    )
    .unwrap();
    assert!(a.stack(&shifted).is_err());
}

#[test]
fn test_frequency_arithmetic() {
    let freq = Frequency::Monthly;
    assert_eq!(freq.advance(date(2020, 11), 3), date(2021, 2));
    assert_eq!(freq.steps_between(date(2020, 1), date(2021, 1)), Some(12));
    assert_eq!(freq.steps_between(date(2020, 3), date(2020, 1)), None);

    let daily = Frequency::Daily;
    let start = NaiveDate::from_ymd_opt(2020, 1, 30).unwrap();
    assert_eq!(
        daily.advance(start, 3),
        NaiveDate::from_ymd_opt(2020, 2, 2).unwrap()
    );
    assert_eq!(daily.steps_between(start, daily.advance(start, 10)), Some(10));
}

#[test]
fn test_reference_dataset_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(AIR_PASSENGERS_CSV);
    let series = load_csv_series(
        &path,
        AIR_PASSENGERS_TIME_COLUMN,
        &[AIR_PASSENGERS_VALUE_COLUMN],
        Frequency::Monthly,
    )
    .unwrap();

    assert_eq!(series.len(), 144);
    assert_eq!(series.width(), 1);
    assert_eq!(series.start_time(), date(1949, 1));
    assert_eq!(series.end_time(), date(1960, 12));
    assert_eq!(series.value_at(0, 0), Some(112.0));
    assert_eq!(series.value_at(143, 0), Some(432.0));
}

#[test]
fn test_missing_column_fails() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(AIR_PASSENGERS_CSV);
    assert!(load_csv_series(&path, "NoSuchColumn", &["#Passengers"], Frequency::Monthly).is_err());
    assert!(load_csv_series(&path, "Month", &["NoSuchColumn"], Frequency::Monthly).is_err());
}
