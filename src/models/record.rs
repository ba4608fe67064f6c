use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ProcessingError, Result};
use crate::models::Measurement;

/// Identity columns of one raw observation. The measurements live column-wise in [`RawTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub station: Option<String>,
}

impl RawRecord {
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            station: None,
        }
    }

    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }
}

/// The table as read from the source: row identities plus one possibly-gappy vector per
/// measurement column, all of the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    records: Vec<RawRecord>,
    columns: BTreeMap<Measurement, Vec<Option<f64>>>,
}

impl RawTable {
    pub fn new<I: IntoIterator<Item = Measurement>>(measurements: I) -> Self {
        Self {
            records: Vec::new(),
            columns: measurements.into_iter().map(|m| (m, Vec::new())).collect(),
        }
    }

    /// Append a row. `values` must name every column of the table exactly once.
    pub fn push<I>(&mut self, record: RawRecord, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (Measurement, Option<f64>)>,
    {
        let row: BTreeMap<Measurement, Option<f64>> = values.into_iter().collect();

        if row.len() != self.columns.len() || !row.keys().all(|m| self.columns.contains_key(m)) {
            return Err(ProcessingError::InvalidFormat(format!(
                "Row {} does not match the table columns",
                self.records.len() + 1
            )));
        }

        for (measurement, value) in row {
            if let Some(column) = self.columns.get_mut(&measurement) {
                column.push(value);
            }
        }
        self.records.push(record);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn measurements(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.columns.keys().copied()
    }

    pub fn column(&self, measurement: Measurement) -> Option<&[Option<f64>]> {
        self.columns.get(&measurement).map(Vec::as_slice)
    }

    pub fn missing_count(&self, measurement: Measurement) -> usize {
        self.column(measurement)
            .map(|values| values.iter().filter(|v| v.is_none()).count())
            .unwrap_or(0)
    }

    pub fn total_missing(&self) -> usize {
        self.columns
            .values()
            .map(|values| values.iter().filter(|v| v.is_none()).count())
            .sum()
    }

    pub fn into_parts(self) -> (Vec<RawRecord>, BTreeMap<Measurement, Vec<Option<f64>>>) {
        (self.records, self.columns)
    }
}
