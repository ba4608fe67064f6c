/// Arithmetic mean of the known values, `None` if there are none.
pub fn column_mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Outcome of a mean fill over one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanFill {
    /// Mean of the values known before filling.
    pub mean: Option<f64>,
    pub filled: usize,
}

/// Replace every remaining `None` with the mean of the known values.
///
/// A column with no known values is left untouched and reports `mean: None`.
pub fn fill_with_mean(values: &mut [Option<f64>]) -> MeanFill {
    let mean = column_mean(values);
    let mut filled = 0;

    if let Some(mean) = mean {
        for slot in values.iter_mut().filter(|v| v.is_none()) {
            *slot = Some(mean);
            filled += 1;
        }
    }

    MeanFill { mean, filled }
}
