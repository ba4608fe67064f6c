//! Layered application settings: built-in defaults, an optional config file, then
//! `AQ__`-prefixed environment variables (e.g. `AQ__DATASET_PATH`, `AQ__USE_MMAP=true`).

use crate::error::Result;
use crate::models::{Measurement, Pollutant};
use crate::utils::constants::{CONFIG_ENV_PREFIX, DEFAULT_DATASET_PATH, DEFAULT_SAMPLE_SIZE};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    /// Station CSV used when a command is not given `--input`
    pub dataset_path: PathBuf,

    pub default_pollutant: Pollutant,

    /// Columns of the correlation heatmap
    #[validate(length(min = 1), custom(function = "validate_unique_columns"))]
    pub correlation_columns: Vec<Measurement>,

    /// Read the station file through a memory map instead of buffered I/O
    pub use_mmap: bool,

    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,

    #[validate(range(max = 1000))]
    pub sample_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            default_pollutant: Pollutant::default(),
            correlation_columns: crate::analyzers::default_correlation_columns(),
            use_mmap: false,
            log_level: "info".to_string(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl AppConfig {
    /// Load settings, layering `file` (if any) and the environment over the defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(CONFIG_ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("correlation_columns")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }
}

fn validate_unique_columns(columns: &[Measurement]) -> std::result::Result<(), ValidationError> {
    let mut seen = Vec::with_capacity(columns.len());
    for column in columns {
        if seen.contains(column) {
            return Err(ValidationError::new("duplicate_column"));
        }
        seen.push(*column);
    }
    Ok(())
}

fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("unknown_log_level")),
    }
}
