use crate::analyzers::correlation::{correlation_matrix, CorrelationMatrix};
use crate::analyzers::views::{filter_by_weekday, hourly_mean, scatter_pairs, weekday_mean, ScatterSeries};
use crate::error::Result;
use crate::models::{weekday_name, CleanedTable, Measurement, Pollutant, WeekdaySet};
use crate::utils::constants::{DEFAULT_CORRELATION_COLUMNS, DEFAULT_SCATTER_X, DEFAULT_SCATTER_Y};
use serde::Serialize;
use std::collections::BTreeMap;

pub fn default_correlation_columns() -> Vec<Measurement> {
    DEFAULT_CORRELATION_COLUMNS
        .iter()
        .filter_map(|name| Measurement::from_column_name(name))
        .collect()
}

/// The user's selections for one dashboard render.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub pollutant: Pollutant,
    pub weekdays: WeekdaySet,
    pub correlation_columns: Vec<Measurement>,
    pub scatter_x: Measurement,
    pub scatter_y: Measurement,
}

impl DashboardRequest {
    pub fn new(pollutant: Pollutant, weekdays: WeekdaySet) -> Self {
        Self {
            pollutant,
            weekdays,
            ..Self::default()
        }
    }

    pub fn with_correlation_columns(mut self, columns: Vec<Measurement>) -> Self {
        self.correlation_columns = columns;
        self
    }
}

impl Default for DashboardRequest {
    fn default() -> Self {
        Self {
            pollutant: Pollutant::default(),
            weekdays: WeekdaySet::all(),
            correlation_columns: default_correlation_columns(),
            scatter_x: Measurement::from_column_name(DEFAULT_SCATTER_X).unwrap_or(Measurement::Wspm),
            scatter_y: Measurement::from_column_name(DEFAULT_SCATTER_Y).unwrap_or(Measurement::Pm25),
        }
    }
}

/// Everything the presentation layer needs to draw the four charts.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub pollutant: Pollutant,
    pub weekdays: WeekdaySet,
    pub selected_records: usize,
    pub hourly_mean: BTreeMap<u32, f64>,
    pub weekday_mean: BTreeMap<u32, f64>,
    pub correlation: CorrelationMatrix,
    pub scatter: ScatterSeries,
}

/// Compute every view for `request`. Trend views use the weekday selection; the
/// correlation matrix and scatter series always cover the full table.
pub fn build_dashboard(table: &CleanedTable, request: &DashboardRequest) -> Result<DashboardReport> {
    let selection = filter_by_weekday(table, &request.weekdays);

    Ok(DashboardReport {
        pollutant: request.pollutant,
        weekdays: request.weekdays,
        selected_records: selection.len(),
        hourly_mean: hourly_mean(&selection, request.pollutant),
        weekday_mean: weekday_mean(&selection, request.pollutant),
        correlation: correlation_matrix(table, &request.correlation_columns)?,
        scatter: scatter_pairs(table, request.scatter_x, request.scatter_y)?,
    })
}

impl DashboardReport {
    pub fn render_text(&self) -> String {
        let units = self.pollutant.measurement().units();
        let mut out = format!(
            "Pollutant: {} | Weekdays: {} | Rows selected: {}\n",
            self.pollutant, self.weekdays, self.selected_records
        );

        out.push_str(&format!("\nMean {} per hour of day ({}):\n", self.pollutant, units));
        if self.hourly_mean.is_empty() {
            out.push_str("  (no rows selected)\n");
        }
        for (hour, mean) in &self.hourly_mean {
            out.push_str(&format!("  {:02}:00  {:>9.2}\n", hour, mean));
        }

        out.push_str(&format!("\nMean {} per day of week ({}):\n", self.pollutant, units));
        if self.weekday_mean.is_empty() {
            out.push_str("  (no rows selected)\n");
        }
        for (day, mean) in &self.weekday_mean {
            out.push_str(&format!(
                "  {:<9}  {:>9.2}\n",
                weekday_name(*day).unwrap_or("?"),
                mean
            ));
        }

        out.push_str("\nCorrelation (full dataset):\n");
        out.push_str(&self.correlation.render_table());

        out.push_str(&format!(
            "\nScatter {} vs {}: {} points\n",
            self.scatter.x,
            self.scatter.y,
            self.scatter.points.len()
        ));

        out
    }
}
