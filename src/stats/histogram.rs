//! Equal-width histograms

use serde::{Deserialize, Serialize};

/// One histogram bin, `[lower, upper)`; the last bin also includes `upper`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width binning of a value sequence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width intervals spanning `[min, max]`.
    ///
    /// Empty input produces no bins; a constant sequence produces a single bin.
    pub fn new(values: &[f64], bins: usize) -> Self {
        if values.is_empty() || bins == 0 {
            return Histogram::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max <= min {
            return Histogram {
                bins: vec![Bin {
                    lower: min,
                    upper: max,
                    count: values.len(),
                }],
            };
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lower: min + width * i as f64,
                upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
                count,
            })
            .collect();

        Histogram { bins }
    }

    /// Total number of binned values
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
