/// Fill interior gaps by linear interpolation along row position.
///
/// A missing value is replaced by the straight-line estimate between the nearest known value
/// before it and the nearest known value after it. Trailing gaps take the last known value.
/// Leading gaps (no known value before them) are left as `None`.
///
/// Returns the number of values filled.
pub fn interpolate_forward(values: &mut [Option<f64>]) -> usize {
    let mut filled = 0;
    let mut previous: Option<(usize, f64)> = None;

    for idx in 0..values.len() {
        let Some(current) = values[idx] else {
            continue;
        };

        if let Some((prev_idx, prev_value)) = previous {
            let span = (idx - prev_idx) as f64;
            for (offset, slot) in values[prev_idx + 1..idx].iter_mut().enumerate() {
                let step = (offset + 1) as f64;
                *slot = Some(prev_value + (current - prev_value) * step / span);
                filled += 1;
            }
        }

        previous = Some((idx, current));
    }

    if let Some((last_idx, last_value)) = previous {
        for slot in values[last_idx + 1..].iter_mut() {
            *slot = Some(last_value);
            filled += 1;
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_interior_gap_linearly() {
        let mut values = vec![Some(10.0), None, None, Some(40.0)];
        assert_eq!(interpolate_forward(&mut values), 2);
        assert_eq!(values, vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)]);
    }

    #[test]
    fn test_leaves_leading_gap() {
        let mut values = vec![None, Some(20.0), Some(40.0)];
        assert_eq!(interpolate_forward(&mut values), 0);
        assert_eq!(values, vec![None, Some(20.0), Some(40.0)]);
    }

    #[test]
    fn test_carries_last_value_into_trailing_gap() {
        let mut values = vec![Some(1.0), None, Some(3.0), None, None];
        assert_eq!(interpolate_forward(&mut values), 3);
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0), Some(3.0), Some(3.0)]);

        let mut values = vec![Some(0.0), None, Some(2.0), None];
        assert_eq!(interpolate_forward(&mut values), 2);
        assert_eq!(values, vec![Some(0.0), Some(1.0), Some(2.0), Some(2.0)]);
    }

    #[test]
    fn test_leading_and_trailing_gaps_together() {
        let mut values = vec![None, Some(20.0), Some(40.0), None];
        assert_eq!(interpolate_forward(&mut values), 1);
        assert_eq!(values, vec![None, Some(20.0), Some(40.0), Some(40.0)]);
    }

    #[test]
    fn test_multiple_gaps_and_degenerate_inputs() {
        let mut values = vec![Some(0.0), None, Some(4.0), None, None, None, Some(0.0)];
        assert_eq!(interpolate_forward(&mut values), 4);
        assert_eq!(
            values,
            vec![
                Some(0.0),
                Some(2.0),
                Some(4.0),
                Some(3.0),
                Some(2.0),
                Some(1.0),
                Some(0.0)
            ]
        );

        let mut empty: Vec<Option<f64>> = Vec::new();
        assert_eq!(interpolate_forward(&mut empty), 0);

        let mut all_missing = vec![None, None];
        assert_eq!(interpolate_forward(&mut all_missing), 0);
        assert_eq!(all_missing, vec![None, None]);
    }
}
