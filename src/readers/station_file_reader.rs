use crate::error::{ProcessingError, Result};
use crate::models::{Measurement, RawRecord, RawTable};
use crate::utils::constants::{
    DAY_COLUMN, DEFAULT_BUFFER_SIZE, HOUR_COLUMN, MISSING_TOKENS, MONTH_COLUMN, STATION_COLUMN,
    YEAR_COLUMN,
};
use csv::StringRecord;
use encoding_rs::UTF_8;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Positions of the columns the loader cares about within a station file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub year: usize,
    pub month: usize,
    pub day: usize,
    pub hour: usize,
    pub station: Option<usize>,
    pub measurements: Vec<(Measurement, usize)>,
}

impl ColumnLayout {
    /// Resolve header names. Identity columns and required measurements must be present;
    /// optional measurements are picked up when found, anything else is ignored.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| ProcessingError::Schema {
                column: name.to_string(),
            })
        };

        let year = require(YEAR_COLUMN)?;
        let month = require(MONTH_COLUMN)?;
        let day = require(DAY_COLUMN)?;
        let hour = require(HOUR_COLUMN)?;

        let mut measurements = Vec::new();
        for measurement in Measurement::ALL {
            match find(measurement.column_name()) {
                Some(idx) => measurements.push((measurement, idx)),
                None if measurement.is_required() => {
                    return Err(ProcessingError::Schema {
                        column: measurement.column_name().to_string(),
                    });
                }
                None => debug!("Optional column {} not present", measurement),
            }
        }

        Ok(Self {
            year,
            month,
            day,
            hour,
            station: find(STATION_COLUMN),
            measurements,
        })
    }
}

pub struct StationFileReader {
    use_mmap: bool,
}

impl StationFileReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read a station CSV file into a raw table
    pub fn read_table(&self, path: &Path) -> Result<RawTable> {
        debug!(path = %path.display(), mmap = self.use_mmap, "Reading station file");
        if self.use_mmap {
            self.read_table_mmap(path)
        } else {
            self.read_table_buffered(path)
        }
    }

    /// Read the file using buffered I/O
    fn read_table_buffered(&self, path: &Path) -> Result<RawTable> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(&bytes)
    }

    /// Read the file using memory-mapped I/O for large files
    fn read_table_mmap(&self, path: &Path) -> Result<RawTable> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        self.parse_bytes(&mmap)
    }

    /// Decode raw bytes (UTF-8, BOM stripped) and parse them
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<RawTable> {
        let (text, _, had_errors) = UTF_8.decode(bytes);
        if had_errors {
            warn!("Station file contains invalid UTF-8; offending bytes were replaced");
        }
        self.parse_str(&text)
    }

    /// Parse CSV text with a header row
    pub fn parse_str(&self, text: &str) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let layout = ColumnLayout::from_headers(reader.headers()?)?;
        let mut table = RawTable::new(layout.measurements.iter().map(|(m, _)| *m));

        for (idx, record_result) in reader.records().enumerate() {
            let record = record_result?;
            let row = idx + 1;
            let identity = self.parse_identity(&record, &layout, row)?;
            let values = self.parse_measurements(&record, &layout, row)?;
            table.push(identity, values)?;
        }

        debug!(
            rows = table.len(),
            columns = layout.measurements.len(),
            missing = table.total_missing(),
            "Parsed station file"
        );

        Ok(table)
    }

    /// Parse the year/month/day/hour cells of a row. Row numbers are 1-based data rows.
    fn parse_identity(
        &self,
        record: &StringRecord,
        layout: &ColumnLayout,
        row: usize,
    ) -> Result<RawRecord> {
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let malformed = || ProcessingError::MalformedTimestamp {
            row,
            value: format!(
                "year='{}' month='{}' day='{}' hour='{}'",
                cell(layout.year),
                cell(layout.month),
                cell(layout.day),
                cell(layout.hour)
            ),
        };

        let year = parse_integer::<i32>(cell(layout.year)).ok_or_else(malformed)?;
        let month = parse_integer::<u32>(cell(layout.month)).ok_or_else(malformed)?;
        let day = parse_integer::<u32>(cell(layout.day)).ok_or_else(malformed)?;
        let hour = parse_integer::<u32>(cell(layout.hour)).ok_or_else(malformed)?;

        let mut identity = RawRecord::new(year, month, day, hour);
        if let Some(station) = layout
            .station
            .and_then(|idx| record.get(idx))
            .filter(|s| !s.is_empty())
        {
            identity = identity.with_station(station);
        }

        Ok(identity)
    }

    fn parse_measurements(
        &self,
        record: &StringRecord,
        layout: &ColumnLayout,
        row: usize,
    ) -> Result<Vec<(Measurement, Option<f64>)>> {
        layout
            .measurements
            .iter()
            .map(|(measurement, idx)| {
                let cell = record.get(*idx).unwrap_or("");
                let value = parse_measurement(cell).map_err(|_| {
                    ProcessingError::InvalidFormat(format!(
                        "Row {}: invalid {} value '{}'",
                        row, measurement, cell
                    ))
                })?;
                Ok((*measurement, value))
            })
            .collect()
    }
}

impl Default for StationFileReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one measurement cell. Missing tokens and non-finite numbers are `None`.
pub fn parse_measurement(cell: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    let cell = cell.trim();
    if MISSING_TOKENS.contains(&cell) {
        return Ok(None);
    }
    let value = cell.parse::<f64>()?;
    Ok(value.is_finite().then_some(value))
}

/// Integers are sometimes written as `3.0` by upstream exports
fn parse_integer<T: TryFrom<i64>>(cell: &str) -> Option<T> {
    let cell = cell.trim();
    let value = match cell.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let float = cell.parse::<f64>().ok()?;
            if float.fract() != 0.0 || !float.is_finite() {
                return None;
            }
            float as i64
        }
    };
    T::try_from(value).ok()
}
