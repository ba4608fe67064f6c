use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ProcessingError, Result};
use crate::models::{Measurement, RawRecord, RawTable};

/// One fully populated observation, keyed by its derived timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub timestamp: NaiveDateTime,
    /// Hour of day taken from `timestamp`, 0..=23.
    pub hour: u32,
    /// Monday = 0 ... Sunday = 6.
    pub day_of_week: u32,
    pub station: Option<String>,
    pub values: BTreeMap<Measurement, f64>,
}

impl CleanedRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        station: Option<String>,
        values: BTreeMap<Measurement, f64>,
    ) -> Self {
        Self {
            timestamp,
            hour: timestamp.hour(),
            day_of_week: timestamp.weekday().num_days_from_monday(),
            station,
            values,
        }
    }

    pub fn value(&self, measurement: Measurement) -> Option<f64> {
        self.values.get(&measurement).copied()
    }
}

/// The cleaned working frame. Built once per source and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CleanedTable {
    measurements: Vec<Measurement>,
    records: Vec<CleanedRecord>,
}

impl CleanedTable {
    pub fn new(measurements: Vec<Measurement>, records: Vec<CleanedRecord>) -> Self {
        Self {
            measurements,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CleanedRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleanedRecord> {
        self.records.iter()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn has_measurement(&self, measurement: Measurement) -> bool {
        self.measurements.contains(&measurement)
    }

    /// Values of one column in row order.
    pub fn column(&self, measurement: Measurement) -> Result<Vec<f64>> {
        if !self.has_measurement(measurement) {
            return Err(ProcessingError::UnknownColumn(measurement.to_string()));
        }

        self.records
            .iter()
            .map(|r| {
                r.value(measurement).ok_or_else(|| {
                    ProcessingError::MissingData(format!(
                        "{} has no value at {}",
                        measurement, r.timestamp
                    ))
                })
            })
            .collect()
    }

    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.first()?.timestamp;
        let (min, max) = self
            .records
            .iter()
            .fold((first, first), |(min, max), r| {
                (min.min(r.timestamp), max.max(r.timestamp))
            });
        Some((min, max))
    }

    /// Turn the table back into raw form, e.g. to run it through the cleaner again.
    pub fn to_raw(&self) -> Result<RawTable> {
        let mut raw = RawTable::new(self.measurements.iter().copied());
        for record in &self.records {
            let identity = RawRecord {
                year: record.timestamp.year(),
                month: record.timestamp.month(),
                day: record.timestamp.day(),
                hour: record.hour,
                station: record.station.clone(),
            };
            let values = self
                .measurements
                .iter()
                .map(|m| (*m, record.value(*m)))
                .collect::<Vec<_>>();
            raw.push(identity, values)?;
        }
        Ok(raw)
    }
}

impl<'a> IntoIterator for &'a CleanedTable {
    type Item = &'a CleanedRecord;
    type IntoIter = std::slice::Iter<'a, CleanedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
