//! Distribution summary statistics

use serde::{Deserialize, Serialize};

/// Shape of a numeric distribution
///
/// `sd` is the sample standard deviation (`n - 1` denominator) and
/// `skewness` is `mean((x - mean)^3) / sd^3`. Both are 0.0 when fewer than two
/// values are present or the values are constant. Quantiles interpolate
/// linearly between order statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub sd: f64,
    pub median: f64,
    pub skewness: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
    pub q90: f64,
    pub q99: f64,
}

impl Summary {
    /// Summarise a sequence of values. Empty input yields all zeros.
    pub fn of(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Summary::default();
        }

        let mean = mean(values);
        let sd = sample_sd(values, mean);
        let skewness = if sd > 0.0 {
            let third = values.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / count as f64;
            third / sd.powi(3)
        } else {
            0.0
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Summary {
            count,
            mean,
            sd,
            median: quantile(&sorted, 0.5),
            skewness,
            min: sorted[0],
            max: sorted[count - 1],
            q25: quantile(&sorted, 0.25),
            q75: quantile(&sorted, 0.75),
            q90: quantile(&sorted, 0.90),
            q99: quantile(&sorted, 0.99),
        }
    }

    /// Convenience for integer sequences such as degrees
    pub fn of_counts(values: &[usize]) -> Self {
        let values: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        Self::of(&values)
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0.0 for fewer than two values
pub(crate) fn sample_sd(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Quantile of sorted values by linear interpolation: `h = (n - 1) p`.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = h.ceil() as usize;
            sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_basic() {
        let s = Summary::of(&[2.0, 1.0, 0.0]);

        assert_eq!(s.count, 3);
        assert_eq!(s.mean, 1.0);
        assert_eq!(s.sd, 1.0);
        assert_eq!(s.median, 1.0);
        assert_eq!(s.skewness, 0.0);
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 2.0);
        assert_eq!(s.q25, 0.5);
        assert_eq!(s.q75, 1.5);
    }

    #[test]
    fn test_counts_match_float_summary() {
        assert_eq!(Summary::of_counts(&[2, 1, 0]), Summary::of(&[2.0, 1.0, 0.0]));
    }

    #[test]
    fn test_even_median() {
        let s = Summary::of(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.median, 2.5);
    }

    #[test]
    fn test_right_skew_is_positive() {
        let s = Summary::of(&[0.0, 0.0, 0.0, 0.0, 10.0]);
        assert!(s.skewness > 0.0);

        // mean 2, sd sqrt(20), third moment (4 * -8 + 512) / 5 = 96
        let expected = 96.0 / 20.0_f64.sqrt().powi(3);
        assert!((s.skewness - expected).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(Summary::of(&[]), Summary::default());

        let single = Summary::of(&[3.5]);
        assert_eq!(single.sd, 0.0);
        assert_eq!(single.skewness, 0.0);
        assert_eq!(single.median, 3.5);

        let constant = Summary::of(&[1.0, 1.0, 1.0]);
        assert_eq!(constant.sd, 0.0);
        assert_eq!(constant.skewness, 0.0);
    }

    #[test]
    fn test_quantile_interpolation() {
        let sorted: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 10.0);
        assert!((quantile(&sorted, 0.9) - 9.1).abs() < 1e-12);
    }
}
