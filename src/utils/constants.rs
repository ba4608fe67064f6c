/// Identity column names
pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";
pub const DAY_COLUMN: &str = "day";
pub const HOUR_COLUMN: &str = "hour";
pub const STATION_COLUMN: &str = "station";

/// Cell values read as "no measurement", matching the usual dataframe NA tokens
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Default station file
pub const DEFAULT_DATASET_PATH: &str =
    "PRSA_Data_20130301-20170228/PRSA_Data_Nongzhanguan_20130301-20170228.csv";

/// Calendar
pub const DAYS_PER_WEEK: u32 = 7;
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Columns of the wind/pollutant correlation heatmap
pub const DEFAULT_CORRELATION_COLUMNS: [&str; 7] = ["WSPM", "PM2.5", "PM10", "SO2", "NO2", "CO", "O3"];

/// Scatter plot axes
pub const DEFAULT_SCATTER_X: &str = "WSPM";
pub const DEFAULT_SCATTER_Y: &str = "PM2.5";

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Environment prefix for configuration overrides (AQ__DATASET_PATH, ...)
pub const CONFIG_ENV_PREFIX: &str = "AQ";
