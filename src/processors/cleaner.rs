use crate::error::{ProcessingError, Result};
use crate::models::{CleanedRecord, CleanedTable, Measurement, RawRecord, RawTable};
use crate::processors::cleaning_report::{CleaningReport, ColumnRepair};
use crate::processors::imputation::fill_with_mean;
use crate::processors::interpolation::interpolate_forward;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Build the timestamp of a raw row. `row` is the 1-based data row used in error messages.
pub fn derive_timestamp(record: &RawRecord, row: usize) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(record.year, record.month, record.day)
        .and_then(|date| date.and_hms_opt(record.hour, 0, 0))
        .ok_or_else(|| ProcessingError::MalformedTimestamp {
            row,
            value: format!(
                "{:04}-{:02}-{:02} hour {}",
                record.year, record.month, record.day, record.hour
            ),
        })
}

/// Turns a raw station table into the cleaned working frame.
///
/// Measurement columns are repaired in two passes: forward-limited linear interpolation,
/// then a column-mean fill for whatever interpolation could not reach. The identity columns
/// are never touched; `hour` and `day_of_week` are recomputed from the derived timestamp.
pub struct DatasetCleaner;

impl DatasetCleaner {
    pub fn new() -> Self {
        Self
    }

    pub fn clean(&self, raw: RawTable) -> Result<CleanedTable> {
        self.clean_with_report(raw).map(|(table, _)| table)
    }

    pub fn clean_with_report(&self, raw: RawTable) -> Result<(CleanedTable, CleaningReport)> {
        let mut report = CleaningReport::new(raw.len());
        let (records, columns) = raw.into_parts();

        // Fail on bad calendar data before doing any repair work
        let timestamps = records
            .iter()
            .enumerate()
            .map(|(idx, record)| derive_timestamp(record, idx + 1))
            .collect::<Result<Vec<_>>>()?;

        let mut repaired: BTreeMap<Measurement, Vec<f64>> = BTreeMap::new();
        for (measurement, values) in columns {
            let (complete, repair) = self.repair_column(measurement, values)?;
            report.columns.push(repair);
            repaired.insert(measurement, complete);
        }

        let measurements: Vec<Measurement> = repaired.keys().copied().collect();
        let cleaned: Vec<CleanedRecord> = records
            .into_iter()
            .zip(timestamps)
            .enumerate()
            .map(|(idx, (record, timestamp))| {
                let values = repaired
                    .iter()
                    .map(|(measurement, column)| (*measurement, column[idx]))
                    .collect();
                CleanedRecord::new(timestamp, record.station, values)
            })
            .collect();

        info!(
            rows = cleaned.len(),
            missing = report.total_missing(),
            interpolated = report.total_interpolated(),
            mean_filled = report.total_mean_filled(),
            "Cleaned dataset"
        );

        Ok((CleanedTable::new(measurements, cleaned), report))
    }

    /// Run both repair passes over one column and return it fully populated.
    pub fn repair_column(
        &self,
        measurement: Measurement,
        mut values: Vec<Option<f64>>,
    ) -> Result<(Vec<f64>, ColumnRepair)> {
        let missing = values.iter().filter(|v| v.is_none()).count();
        let mut repair = ColumnRepair::new(measurement, missing);

        if missing > 0 {
            repair.interpolated = interpolate_forward(&mut values);
            let fill = fill_with_mean(&mut values);
            repair.mean_filled = fill.filled;
            repair.fill_mean = fill.mean;

            debug!(
                column = %measurement,
                missing,
                interpolated = repair.interpolated,
                mean_filled = repair.mean_filled,
                "Repaired column"
            );
        }

        let complete = values.into_iter().collect::<Option<Vec<f64>>>().ok_or_else(|| {
            ProcessingError::MissingData(format!(
                "column {} has no known values to impute from",
                measurement
            ))
        })?;

        Ok((complete, repair))
    }
}

impl Default for DatasetCleaner {
    fn default() -> Self {
        Self::new()
    }
}
