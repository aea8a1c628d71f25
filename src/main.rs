// External crates
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

// Local modules
use ClawFoxyForecast::constants::{
    AIR_PASSENGERS_CSV, AIR_PASSENGERS_TIME_COLUMN, AIR_PASSENGERS_VALUE_COLUMN,
    DEFAULT_INPUT_WINDOW, DEFAULT_OUTPUT_WINDOW, VALIDATION_POINTS,
};
use ClawFoxyForecast::data::load_csv_series;
use ClawFoxyForecast::metrics::mape;
use ClawFoxyForecast::model::config::{
    ArchitectureConfig, ConvolutionalConfig, DecompositionConfig, ForecastConfig, RecurrentConfig,
    TransformerConfig,
};
use ClawFoxyForecast::model::GlobalForecastModel;
use ClawFoxyForecast::series::{Frequency, Scaler};

fn architecture_for(family: &str) -> Result<ArchitectureConfig> {
    match family {
        "recurrent" => Ok(ArchitectureConfig::Recurrent(RecurrentConfig::default())),
        "convolutional" => Ok(ArchitectureConfig::Convolutional(
            ConvolutionalConfig::default(),
        )),
        "transformer" => Ok(ArchitectureConfig::Transformer(TransformerConfig::default())),
        "decomposition" => Ok(ArchitectureConfig::DecompositionStack(
            DecompositionConfig::default(),
        )),
        other => bail!(
            "unknown model family: {} (expected recurrent, convolutional, transformer or decomposition)",
            other
        ),
    }
}

fn main() -> Result<()> {
    // Accept family and csv path as command-line arguments
    let args: Vec<String> = env::args().collect();
    let family = args.get(1).map(|s| s.as_str()).unwrap_or("recurrent");
    let csv_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(AIR_PASSENGERS_CSV));
    println!("Using model family: {} | data: {}", family, csv_path.display());

    let series = load_csv_series(
        &csv_path,
        AIR_PASSENGERS_TIME_COLUMN,
        &[AIR_PASSENGERS_VALUE_COLUMN],
        Frequency::Monthly,
    )
    .context("failed to load the input series")?;

    let mut scaler = Scaler::new();
    let scaled = scaler.fit_transform(&series)?;
    let train = scaled.drop_last(VALIDATION_POINTS)?;
    let val = scaled.last_n(VALIDATION_POINTS)?;
    println!(
        "Training on {} steps, validating on {} steps",
        train.len(),
        val.len()
    );

    let config = ForecastConfig::new(
        DEFAULT_INPUT_WINDOW,
        DEFAULT_OUTPUT_WINDOW,
        architecture_for(family)?,
    );
    let mut model = GlobalForecastModel::new(config)?;
    model.fit(std::slice::from_ref(&train), None)?;

    let forecast = model.predict(VALIDATION_POINTS, None, None)?;
    let error = mape(&val, &forecast)?;
    println!(
        "Forecast {} steps ahead | validation MAPE: {:.2}%",
        forecast.len(),
        error
    );

    let restored = scaler.inverse_transform(&forecast)?;
    for (date, value) in restored
        .time_index()
        .iter()
        .zip(restored.values().column(0).iter())
        .take(12)
    {
        println!("{}  {:.1}", date, value);
    }

    Ok(())
}
