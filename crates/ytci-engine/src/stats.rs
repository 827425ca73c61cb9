//! Small statistics helpers shared by the analyzers.
//!
//! All of them resolve degenerate inputs (empty slices, zero variance, zero
//! weight) to `0.0` or `None` instead of producing NaN or infinity.

#![allow(clippy::cast_precision_loss)]

/// Arithmetic mean; `0.0` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; `0.0` for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Population standard deviation; `0.0` for fewer than two values.
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Pearson correlation coefficient, clamped to `[-1, 1]`.
///
/// Returns `0.0` for mismatched or empty inputs and when either series has
/// zero variance.
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;

    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        (numerator / denominator).clamp(-1.0, 1.0)
    }
}

/// `Σ(metric × weight) / Σ(weight)`, or `None` when the total weight is zero.
///
/// Pairs with a non-finite metric or a non-positive weight are ignored.
#[must_use]
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (weighted_sum, total_weight) = pairs
        .into_iter()
        .filter(|(metric, weight)| metric.is_finite() && weight.is_finite() && *weight > 0.0)
        .fold((0.0, 0.0), |(sum, total), (metric, weight)| {
            (sum + metric * weight, total + weight)
        });
    (total_weight > 0.0).then(|| weighted_sum / total_weight)
}

/// `part / whole * 100`, or `0.0` when `whole` is zero.
#[must_use]
pub fn percent_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn std_dev_matches_population_formula() {
        let sd = std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((sd - std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn std_dev_single_value_is_zero() {
        assert_eq!(std_dev(&[42.0]), 0.0);
    }

    #[test]
    fn pearson_perfect_positive() {
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[10.0, 20.0, 30.0, 40.0]);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_perfect_negative() {
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[4.0, 3.0, 2.0, 1.0]);
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_zero_variance_is_zero() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[3.0, 5.0, 9.0]), 0.0);
    }

    #[test]
    fn pearson_mismatched_lengths_is_zero() {
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn weighted_mean_differs_from_naive_mean() {
        // CTR 10% on 100 impressions, 2% on 10,000 impressions.
        let weighted = weighted_mean([(0.10, 100.0), (0.02, 10_000.0)]).unwrap();
        let naive = mean(&[0.10, 0.02]);
        assert!((weighted - 0.020_792).abs() < 1e-6);
        assert!((naive - 0.06).abs() < 1e-12);
    }

    #[test]
    fn weighted_mean_zero_weight_is_none() {
        assert_eq!(weighted_mean([(0.5, 0.0), (0.7, 0.0)]), None);
        assert_eq!(weighted_mean(std::iter::empty()), None);
    }

    #[test]
    fn weighted_mean_ignores_non_finite_metrics() {
        assert_eq!(weighted_mean([(f64::NAN, 10.0), (0.4, 10.0)]), Some(0.4));
    }

    #[test]
    fn percent_of_zero_whole() {
        assert_eq!(percent_of(3, 0), 0.0);
        assert_eq!(percent_of(1, 4), 25.0);
    }
}
