use crate::error::{ProcessingError, Result};
use crate::models::{CleanedTable, Measurement};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Pearson correlation coefficient of two equally long series.
///
/// `NaN` when the series are shorter than two points or either has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let (x, y) = (&x[..n], &y[..n]);

    let std_x = x.std_dev();
    let std_y = y.std_dev();
    if std_x == 0.0 || std_y == 0.0 {
        return f64::NAN;
    }

    (x.covariance(y) / (std_x * std_y)).clamp(-1.0, 1.0)
}

/// Square correlation matrix over a set of columns, in the order they were requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<Measurement>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, a: Measurement, b: Measurement) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        Some(self.values[i][j])
    }

    /// Symmetric, NaN entries included (NaN mirrors NaN).
    pub fn is_symmetric(&self) -> bool {
        (0..self.size()).all(|i| {
            (0..self.size()).all(|j| {
                let (a, b) = (self.values[i][j], self.values[j][i]);
                a == b || (a.is_nan() && b.is_nan())
            })
        })
    }

    /// Fixed-width text rendering, one row per column.
    pub fn render_table(&self) -> String {
        let mut out = format!("{:>8}", "");
        for column in &self.columns {
            out.push_str(&format!("{:>8}", column.column_name()));
        }
        out.push('\n');

        for (i, column) in self.columns.iter().enumerate() {
            out.push_str(&format!("{:>8}", column.column_name()));
            for value in &self.values[i] {
                if value.is_nan() {
                    out.push_str(&format!("{:>8}", "n/a"));
                } else {
                    out.push_str(&format!("{:>8.2}", value));
                }
            }
            out.push('\n');
        }

        out
    }
}

/// Pearson correlation between every pair of `columns` over the whole cleaned table.
///
/// The diagonal is 1.0 and `values[j][i]` is copied from `values[i][j]`.
pub fn correlation_matrix(table: &CleanedTable, columns: &[Measurement]) -> Result<CorrelationMatrix> {
    if columns.is_empty() {
        return Err(ProcessingError::MissingData(
            "No columns given for correlation".to_string(),
        ));
    }

    let series = columns
        .iter()
        .map(|c| table.column(*c))
        .collect::<Result<Vec<_>>>()?;

    let size = columns.len();
    let mut values = vec![vec![0.0; size]; size];
    for i in 0..size {
        values[i][i] = 1.0;
        for j in (i + 1)..size {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}
