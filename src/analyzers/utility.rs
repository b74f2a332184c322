//! Small numeric reducers shared by the aggregators.
//!
//! Every reducer over optional cells skips `None` and returns `None` for
//! an empty input rather than imputing zero.

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean over the present cells of an optional column.
pub fn mean_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        None
    } else {
        Some(mean(&present))
    }
}

/// Median over the present cells of an optional column. Even-length inputs
/// average the two middle values.
pub fn median_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(f64::total_cmp);
    let n = present.len();
    if n % 2 == 1 {
        Some(present[n / 2])
    } else {
        Some((present[n / 2 - 1] + present[n / 2]) / 2.0)
    }
}

/// Share of `true` among the present cells of an optional boolean column.
pub fn rate_present(values: impl Iterator<Item = Option<bool>>) -> Option<f64> {
    mean_present(values.map(|v| v.map(|b| if b { 1.0 } else { 0.0 })))
}

/// Linear-interpolated quantile of an already sorted, non-empty slice,
/// with `q` in [0, 1].
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_present_skips_none() {
        let vals = [Some(1.0), None, Some(3.0)];
        assert_eq!(mean_present(vals.into_iter()), Some(2.0));
    }

    #[test]
    fn test_mean_present_all_none() {
        assert_eq!(mean_present([None, None].into_iter()), None);
    }

    #[test]
    fn test_median_present_odd_and_even() {
        assert_eq!(
            median_present([Some(3.0), Some(1.0), Some(2.0)].into_iter()),
            Some(2.0)
        );
        assert_eq!(
            median_present([Some(4.0), Some(1.0), None, Some(2.0), Some(3.0)].into_iter()),
            Some(2.5)
        );
    }

    #[test]
    fn test_rate_present() {
        let flags = [Some(true), Some(false), None, Some(true), Some(true)];
        assert_eq!(rate_present(flags.into_iter()), Some(0.75));
        assert_eq!(rate_present([None, None].into_iter()), None);
    }

    #[test]
    fn test_quantile_sorted_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
        assert_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_eq!(quantile_sorted(&sorted, 0.25), 1.75);
    }
}
