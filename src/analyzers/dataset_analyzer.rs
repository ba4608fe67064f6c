use crate::error::{ProcessingError, Result};
use crate::models::{CleanedTable, Measurement};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Serialize)]
pub struct DatasetStatistics {
    pub total_records: usize,
    pub stations: Vec<String>,
    pub time_range: (NaiveDateTime, NaiveDateTime),
    pub column_stats: Vec<ColumnStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub measurement: Measurement,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub min_at: NaiveDateTime,
    pub max_at: NaiveDateTime,
}

pub struct DatasetAnalyzer;

impl DatasetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, table: &CleanedTable) -> Result<DatasetStatistics> {
        let time_range = table.time_range().ok_or_else(|| {
            ProcessingError::MissingData("No records to analyze".to_string())
        })?;

        let stations: BTreeSet<String> = table.iter().filter_map(|r| r.station.clone()).collect();

        let column_stats = table
            .measurements()
            .iter()
            .filter_map(|m| self.column_stats(table, *m))
            .collect();

        Ok(DatasetStatistics {
            total_records: table.len(),
            stations: stations.into_iter().collect(),
            time_range,
            column_stats,
        })
    }

    fn column_stats(&self, table: &CleanedTable, measurement: Measurement) -> Option<ColumnStats> {
        let first = table.records().first()?;
        let first_value = first.value(measurement)?;

        let mut stats = ColumnStats {
            measurement,
            min: first_value,
            max: first_value,
            mean: 0.0,
            min_at: first.timestamp,
            max_at: first.timestamp,
        };
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for record in table {
            let Some(value) = record.value(measurement) else {
                continue;
            };
            if value < stats.min {
                stats.min = value;
                stats.min_at = record.timestamp;
            }
            if value > stats.max {
                stats.max = value;
                stats.max_at = record.timestamp;
            }
            sum += value;
            count += 1;
        }

        stats.mean = sum / count as f64;
        Some(stats)
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStatistics {
    pub fn column(&self, measurement: Measurement) -> Option<&ColumnStats> {
        self.column_stats
            .iter()
            .find(|c| c.measurement == measurement)
    }

    pub fn summary(&self) -> String {
        let stations = if self.stations.is_empty() {
            "unknown".to_string()
        } else {
            self.stations.join(", ")
        };
        let span = self.time_range.1.signed_duration_since(self.time_range.0);

        format!(
            "Station: {}\n\
            Time Range: {} to {} ({} days)\n\
            Records: {} total\n\
            Measurements: {}",
            stations,
            self.time_range.0,
            self.time_range.1,
            span.num_days(),
            self.total_records,
            self.column_stats
                .iter()
                .map(|c| c.measurement.column_name())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }

    pub fn detailed_summary(&self) -> String {
        let mut out = format!("{}\n\nColumn Statistics:\n", self.summary());
        for stats in &self.column_stats {
            out.push_str(&format!(
                "- {:<6} mean {:>9.2} {:<6} | min {:>9.2} at {} | max {:>9.2} at {}\n",
                stats.measurement.column_name(),
                stats.mean,
                stats.measurement.units(),
                stats.min,
                stats.min_at,
                stats.max,
                stats.max_at
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CleanedRecord;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn record(hour: u32, pm25: f64) -> CleanedRecord {
        let ts = NaiveDate::from_ymd_opt(2013, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        CleanedRecord::new(
            ts,
            Some("Nongzhanguan".to_string()),
            BTreeMap::from([(Measurement::Pm25, pm25)]),
        )
    }

    #[test]
    fn test_analyze_table() {
        let table = CleanedTable::new(
            vec![Measurement::Pm25],
            vec![record(0, 10.0), record(1, 40.0), record(2, 4.0)],
        );

        let stats = DatasetAnalyzer::new().analyze(&table).unwrap();

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.stations, vec!["Nongzhanguan".to_string()]);
        let pm25 = stats.column(Measurement::Pm25).unwrap();
        assert_eq!(pm25.min, 4.0);
        assert_eq!(pm25.max, 40.0);
        assert_eq!(pm25.mean, 18.0);
        assert_eq!(pm25.max_at, record(1, 0.0).timestamp);

        let text = stats.detailed_summary();
        assert!(text.contains("Records: 3 total"));
        assert!(text.contains("PM2.5"));
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let result = DatasetAnalyzer::new().analyze(&CleanedTable::default());
        assert!(matches!(result, Err(ProcessingError::MissingData(_))));
    }
}
