use crate::models::Measurement;
use serde::Serialize;

/// What the repair passes did to one measurement column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRepair {
    pub measurement: Measurement,
    pub missing_before: usize,
    pub interpolated: usize,
    pub mean_filled: usize,
    /// Mean used by the fallback pass, if the column had any known values.
    pub fill_mean: Option<f64>,
}

impl ColumnRepair {
    pub fn new(measurement: Measurement, missing_before: usize) -> Self {
        Self {
            measurement,
            missing_before,
            interpolated: 0,
            mean_filled: 0,
            fill_mean: None,
        }
    }

    pub fn total_filled(&self) -> usize {
        self.interpolated + self.mean_filled
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CleaningReport {
    pub total_records: usize,
    pub columns: Vec<ColumnRepair>,
}

impl CleaningReport {
    pub fn new(total_records: usize) -> Self {
        Self {
            total_records,
            columns: Vec::new(),
        }
    }

    pub fn column(&self, measurement: Measurement) -> Option<&ColumnRepair> {
        self.columns.iter().find(|c| c.measurement == measurement)
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing_before).sum()
    }

    pub fn total_interpolated(&self) -> usize {
        self.columns.iter().map(|c| c.interpolated).sum()
    }

    pub fn total_mean_filled(&self) -> usize {
        self.columns.iter().map(|c| c.mean_filled).sum()
    }

    /// Generate a summary report
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();
        let cells = self.total_records * self.columns.len();

        summary.push_str("=== Cleaning Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", self.total_records));
        summary.push_str(&format!("Measurement Columns: {}\n", self.columns.len()));
        summary.push_str(&format!(
            "Missing Values: {} ({:.2}% of cells)\n",
            self.total_missing(),
            percentage(self.total_missing(), cells)
        ));
        summary.push_str(&format!(
            "Filled by Interpolation: {}\n",
            self.total_interpolated()
        ));
        summary.push_str(&format!("Filled by Column Mean: {}\n", self.total_mean_filled()));

        let repaired: Vec<&ColumnRepair> = self
            .columns
            .iter()
            .filter(|c| c.missing_before > 0)
            .collect();

        if !repaired.is_empty() {
            summary.push_str("\nPer Column:\n");
            for column in repaired {
                let mean = column
                    .fill_mean
                    .map(|m| format!("{:.2}", m))
                    .unwrap_or_else(|| "n/a".to_string());
                summary.push_str(&format!(
                    "  {:<6} missing {:>6} ({:>5.2}%), interpolated {:>6}, mean-filled {:>4} (mean {})\n",
                    column.measurement.column_name(),
                    column.missing_before,
                    percentage(column.missing_before, self.total_records),
                    column.interpolated,
                    column.mean_filled,
                    mean
                ));
            }
        }

        summary
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}
