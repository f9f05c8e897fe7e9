use std::cmp::Ordering;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    Log,
    Linear,
}

impl FromStr for Scale {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> Result<Self> {
        match x {
            "log" => Ok(Scale::Log),
            "linear" => Ok(Scale::Linear),
            _ => bail!("unsupported scale \"{x}\"; must be \"log\" or \"linear\""),
        }
    }
}

/// How to turn a batch of raw ridership numbers into pixel radii.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Sizing {
    pub scale: Scale,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Winsorize both tails by this percentage (2.0 means clamp to the 2nd
    /// and 98th percentiles). Values outside (0, 50) disable clipping.
    pub clip_pct: f64,
}

impl Default for Sizing {
    fn default() -> Self {
        Self {
            scale: Scale::Log,
            min_radius: 1.0,
            max_radius: 10.0,
            clip_pct: 2.0,
        }
    }
}

/// Maps each value in the batch to a radius in [min_radius, max_radius].
/// Missing (or non-finite) values are imputed with the batch median, or 0 if
/// every value is missing. The whole batch matters: percentiles and min/max
/// are computed jointly, so this isn't a per-element transform.
///
/// Assumes min_radius <= max_radius. If that's violated, the affine map at
/// the end still runs and can produce radii outside the interval.
pub fn compute_radii(values: &[Option<f64>], sizing: &Sizing) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let present: Vec<f64> = values
        .iter()
        .filter_map(|x| *x)
        .filter(|x| x.is_finite())
        .collect();
    let fill = median(&present).unwrap_or(0.0);
    let mut vals: Vec<f64> = values
        .iter()
        .map(|x| x.filter(|v| v.is_finite()).unwrap_or(fill))
        .collect();

    if sizing.clip_pct > 0.0 && sizing.clip_pct < 50.0 {
        let mut sorted = vals.clone();
        sorted.sort_by(cmp_f64);
        let lo = percentile(&sorted, sizing.clip_pct / 100.0);
        let hi = percentile(&sorted, 1.0 - sizing.clip_pct / 100.0);
        for v in &mut vals {
            *v = v.clamp(lo, hi);
        }
    }

    let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
    let norm: Vec<f64> = match sizing.scale {
        Scale::Log => {
            let shifted: Vec<f64> = vals.iter().map(|v| (v - min).ln_1p()).collect();
            let max = shifted.iter().copied().fold(0.0_f64, f64::max);
            if max > 0.0 {
                shifted.into_iter().map(|v| v / max).collect()
            } else {
                vec![0.0; vals.len()]
            }
        }
        Scale::Linear => {
            let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let denom = max - min;
            if denom > 0.0 {
                vals.into_iter().map(|v| (v - min) / denom).collect()
            } else {
                // All-equal batches sit at the midpoint on the linear scale,
                // but at 0 on the log scale above. Intentional asymmetry.
                vec![0.5; vals.len()]
            }
        }
    };

    norm.into_iter()
        .map(|n| sizing.min_radius + n * (sizing.max_radius - sizing.min_radius))
        .collect()
}

fn cmp_f64(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// The q-th quantile (q in [0, 1]) of an already-sorted slice, linearly
/// interpolating between adjacent order statistics. Must be non-empty.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(cmp_f64);
    Some(percentile(&sorted, 0.5))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_present(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|x| Some(*x)).collect()
    }

    fn sizing(scale: Scale, clip_pct: f64) -> Sizing {
        Sizing {
            scale,
            min_radius: 1.0,
            max_radius: 10.0,
            clip_pct,
        }
    }

    #[test]
    fn radii_stay_within_bounds() {
        let values = vec![Some(3.0), None, Some(0.0), Some(250.0), Some(f64::NAN), Some(7.5)];
        for scale in [Scale::Log, Scale::Linear] {
            for clip_pct in [0.0, 2.0, 25.0] {
                let radii = compute_radii(&values, &sizing(scale, clip_pct));
                assert_eq!(radii.len(), values.len());
                for r in radii {
                    assert!((1.0..=10.0).contains(&r), "radius {r} out of bounds");
                }
            }
        }
    }

    #[test]
    fn all_equal_log_collapses_to_min() {
        let radii = compute_radii(&all_present(&[5.0, 5.0, 5.0, 5.0]), &sizing(Scale::Log, 2.0));
        assert_eq!(radii, vec![1.0; 4]);
    }

    #[test]
    fn all_equal_linear_collapses_to_midpoint() {
        let radii = compute_radii(
            &all_present(&[5.0, 5.0, 5.0, 5.0]),
            &sizing(Scale::Linear, 2.0),
        );
        assert_eq!(radii, vec![5.5; 4]);
    }

    #[test]
    fn winsorizing_tames_outliers() {
        let values = all_present(&[1.0, 2.0, 3.0, 100.0]);
        let clipped = compute_radii(&values, &sizing(Scale::Linear, 2.0));
        let unclipped = compute_radii(&values, &sizing(Scale::Linear, 0.0));

        // Clamping preserves order, so the outlier itself still claims the
        // maximum radius either way. What shrinks is its influence: the span
        // it dominates contracts from [1, 100] to [1.06, 94.18], so the next
        // value down sits measurably closer to it.
        assert_eq!(clipped[3], 10.0);
        assert_eq!(unclipped[3], 10.0);
        assert!(clipped[2] > unclipped[2]);
    }

    #[test]
    fn missing_imputed_with_batch_median() {
        let radii = compute_radii(
            &[Some(10.0), Some(20.0), None, Some(30.0)],
            &sizing(Scale::Log, 2.0),
        );
        // Median of [10, 20, 30] is 20, so the hole sizes exactly like the
        // literal 20 next to it.
        assert_eq!(radii[2], radii[1]);
    }

    #[test]
    fn all_missing_imputes_zero() {
        let radii = compute_radii(&[None, None, None], &sizing(Scale::Linear, 2.0));
        assert_eq!(radii, vec![5.5; 3]);
        let radii = compute_radii(&[None, None, None], &sizing(Scale::Log, 2.0));
        assert_eq!(radii, vec![1.0; 3]);
    }

    #[test]
    fn empty_batch_yields_empty_output() {
        assert_eq!(compute_radii(&[], &Sizing::default()), Vec::<f64>::new());
    }

    #[test]
    fn out_of_range_clip_pct_disables_clipping() {
        let values = all_present(&[1.0, 2.0, 3.0, 4.0, 5.0, 1000.0]);
        let skip_low = compute_radii(&values, &sizing(Scale::Linear, 0.0));
        let skip_high = compute_radii(&values, &sizing(Scale::Linear, 60.0));
        let clip = compute_radii(&values, &sizing(Scale::Linear, 10.0));
        assert_eq!(skip_low, skip_high);
        assert_ne!(skip_low, clip);
    }

    #[test]
    fn single_element_batch() {
        assert_eq!(
            compute_radii(&[Some(42.0)], &sizing(Scale::Log, 2.0)),
            vec![1.0]
        );
        assert_eq!(
            compute_radii(&[Some(42.0)], &sizing(Scale::Linear, 2.0)),
            vec![5.5]
        );
    }

    #[test]
    fn unknown_scale_fails_to_parse() {
        assert_eq!("log".parse::<Scale>().unwrap(), Scale::Log);
        assert_eq!("linear".parse::<Scale>().unwrap(), Scale::Linear);
        assert!("sqrt".parse::<Scale>().is_err());
        assert!("Log".parse::<Scale>().is_err());
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let sorted = [1.0, 2.0, 3.0, 100.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 1.0), 100.0);
        // rank 0.98 * 3 = 2.94, so 94% of the way from 3 to 100
        let hi = percentile(&sorted, 0.98);
        assert!((hi - 94.18).abs() < 1e-9);
    }

    #[test]
    fn median_averages_middle_pair() {
        assert_eq!(median(&[10.0, 30.0, 20.0]), Some(20.0));
        assert_eq!(median(&[10.0, 20.0, 30.0, 40.0]), Some(25.0));
        assert_eq!(median(&[]), None);
    }
}
