pub mod cache;

pub use cache::{DatasetCache, SourceKey};

use crate::error::Result;
use crate::models::CleanedTable;
use crate::processors::{CleaningReport, DatasetCleaner};
use crate::readers::StationFileReader;
use std::path::Path;
use tracing::info;

/// A cleaned table together with the account of how it was repaired.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub table: CleanedTable,
    pub report: CleaningReport,
}

/// Read and clean a station file. No caching; see [`DatasetCache`] for that.
pub fn load_and_clean(path: &Path) -> Result<CleanedTable> {
    load_with_report(path, &StationFileReader::new()).map(|dataset| dataset.table)
}

pub fn load_with_report(path: &Path, reader: &StationFileReader) -> Result<LoadedDataset> {
    let raw = reader.read_table(path)?;
    let (table, report) = DatasetCleaner::new().clean_with_report(raw)?;

    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.measurements().len(),
        "Loaded dataset"
    );

    Ok(LoadedDataset { table, report })
}
