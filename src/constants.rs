// Forecasting windows
pub const DEFAULT_INPUT_WINDOW: usize = 24; // Past steps consumed per inference step
pub const DEFAULT_OUTPUT_WINDOW: usize = 12; // Future steps produced per inference step

// Data preprocessing
pub const VALIDATION_POINTS: usize = 36; // Held-out tail of the reference series

// Training defaults
pub const DEFAULT_LEARNING_RATE: f64 = 1e-3;
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_EPOCHS: usize = 10;
pub const DEFAULT_DROPOUT: f64 = 0.1;

// Reference dataset shipped with the repository
pub const AIR_PASSENGERS_CSV: &str = "data/AirPassengers.csv";
pub const AIR_PASSENGERS_TIME_COLUMN: &str = "Month";
pub const AIR_PASSENGERS_VALUE_COLUMN: &str = "#Passengers";
