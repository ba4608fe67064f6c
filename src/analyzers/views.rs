use crate::error::Result;
use crate::models::{CleanedRecord, CleanedTable, Measurement, Pollutant, WeekdaySet};
use serde::Serialize;
use std::collections::BTreeMap;

/// A borrowed, row-order-preserving selection of a cleaned table.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    records: Vec<&'a CleanedRecord>,
}

impl<'a> TableView<'a> {
    pub fn full(table: &'a CleanedTable) -> Self {
        Self {
            records: table.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[&'a CleanedRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CleanedRecord> + '_ {
        self.records.iter().copied()
    }
}

/// Rows whose `day_of_week` is in `weekdays`. An empty set selects nothing.
pub fn filter_by_weekday<'a>(table: &'a CleanedTable, weekdays: &WeekdaySet) -> TableView<'a> {
    TableView {
        records: table
            .iter()
            .filter(|r| weekdays.contains(r.day_of_week))
            .collect(),
    }
}

/// Mean of `measurement` per group key. Groups without rows are absent.
pub fn group_mean<F>(view: &TableView<'_>, measurement: Measurement, key: F) -> BTreeMap<u32, f64>
where
    F: Fn(&CleanedRecord) -> u32,
{
    let mut sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in view.iter() {
        if let Some(value) = record.value(measurement) {
            let entry = sums.entry(key(record)).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(group, (sum, count))| (group, sum / count as f64))
        .collect()
}

/// Mean pollutant level per hour of day (0..=23).
pub fn hourly_mean(view: &TableView<'_>, pollutant: Pollutant) -> BTreeMap<u32, f64> {
    group_mean(view, pollutant.measurement(), |r| r.hour)
}

/// Mean pollutant level per day of week (Monday = 0).
pub fn weekday_mean(view: &TableView<'_>, pollutant: Pollutant) -> BTreeMap<u32, f64> {
    group_mean(view, pollutant.measurement(), |r| r.day_of_week)
}

/// Paired raw values of two columns over the full table, for a scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x: Measurement,
    pub y: Measurement,
    pub points: Vec<(f64, f64)>,
}

pub fn scatter_pairs(table: &CleanedTable, x: Measurement, y: Measurement) -> Result<ScatterSeries> {
    let xs = table.column(x)?;
    let ys = table.column(y)?;

    Ok(ScatterSeries {
        x,
        y,
        points: xs.into_iter().zip(ys).collect(),
    })
}
