use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Quantile with linear interpolation between closest ranks.
///
/// Non-finite values are ignored; returns `None` for an empty input.
#[must_use]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by_key(|value| OrderedFloat(*value));
    Some(quantile_sorted(&sorted, q))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Five-number summary plus outliers for one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Quartiles with whiskers at the furthest samples within 1.5 IQR.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by_key(|value| OrderedFloat(*value));

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|value| *value >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|value| *value <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|value| *value < low_fence || *value > high_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Maps raw sizes linearly into `[min_size, max_size]`.
///
/// An all-equal input maps every entry to the midpoint.
#[must_use]
pub fn normalize_sizes(sizes: &[f64], size_range: (f64, f64)) -> Vec<f64> {
    let (min_size, max_size) = size_range;
    let finite = sizes.iter().copied().filter(|v| v.is_finite());
    let (low, high) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
        (low.min(value), high.max(value))
    });

    if !low.is_finite() || low == high {
        let midpoint = (min_size + max_size) / 2.0;
        return vec![midpoint; sizes.len()];
    }

    sizes
        .iter()
        .map(|size| {
            let normalized = (size - low) / (high - low);
            normalized * (max_size - min_size) + min_size
        })
        .collect()
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub residual_std: f64,
    pub x_mean: f64,
    pub ss_x: f64,
    pub n: usize,
}

impl LinearFit {
    /// Fits paired finite samples; needs at least two distinct x values.
    #[must_use]
    pub fn from_points(x: &[f64], y: &[f64]) -> Option<Self> {
        let pairs: Vec<(f64, f64)> = x
            .iter()
            .zip(y)
            .map(|(x, y)| (*x, *y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        let n = pairs.len();
        if n < 2 {
            return None;
        }

        let count = n as f64;
        let x_mean = pairs.iter().map(|(x, _)| x).sum::<f64>() / count;
        let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / count;
        let ss_x: f64 = pairs.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
        let ss_y: f64 = pairs.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();
        let sp: f64 = pairs
            .iter()
            .map(|(x, y)| (x - x_mean) * (y - y_mean))
            .sum();
        if ss_x == 0.0 {
            return None;
        }

        let slope = sp / ss_x;
        let intercept = y_mean - slope * x_mean;
        let r = if ss_y == 0.0 { 0.0 } else { sp / (ss_x * ss_y).sqrt() };
        let residual_sum: f64 = pairs
            .iter()
            .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
            .sum();
        let residual_std = if n > 2 {
            (residual_sum / (count - 2.0)).sqrt()
        } else {
            0.0
        };

        Some(Self {
            slope,
            intercept,
            r,
            residual_std,
            x_mean,
            ss_x,
            n,
        })
    }

    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Half-width of the confidence band of the fitted mean at `x`.
    ///
    /// Returns `None` with fewer than three points.
    #[must_use]
    pub fn confidence_half_width(&self, x: f64, ci_level: f64) -> Option<f64> {
        if self.n < 3 {
            return None;
        }
        let dof = (self.n - 2) as f64;
        let t = student_t_quantile((1.0 + ci_level) / 2.0, dof);
        let count = self.n as f64;
        let se = self.residual_std * (1.0 / count + (x - self.x_mean).powi(2) / self.ss_x).sqrt();
        Some(t * se)
    }
}

/// Pearson correlation of paired finite samples.
#[must_use]
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    LinearFit::from_points(x, y).map(|fit| fit.r)
}

/// Inverse CDF of the standard normal distribution (Acklam's rational approximation).
#[must_use]
pub fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.024_25;

    let p = p.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON);
    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - P_LOW {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    }
}

/// Inverse CDF of Student's t distribution.
///
/// Exact for one and two degrees of freedom, Cornish-Fisher expansion above.
#[must_use]
pub fn student_t_quantile(p: f64, dof: f64) -> f64 {
    if dof <= 1.0 {
        return (std::f64::consts::PI * (p - 0.5)).tan();
    }
    if dof <= 2.0 {
        return (2.0 * p - 1.0) / (2.0 * p * (1.0 - p)).sqrt();
    }

    let z = normal_quantile(p);
    let z2 = z * z;
    let g1 = (z2 + 1.0) * z / 4.0;
    let g2 = ((5.0 * z2 + 16.0) * z2 + 3.0) * z / 96.0;
    let g3 = (((3.0 * z2 + 19.0) * z2 + 17.0) * z2 - 15.0) * z / 384.0;
    let g4 = ((((79.0 * z2 + 776.0) * z2 + 1482.0) * z2 - 1920.0) * z2 - 945.0) * z / 92160.0;
    z + g1 / dof + g2 / dof.powi(2) + g3 / dof.powi(3) + g4 / dof.powi(4)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{
        BoxStats, LinearFit, normal_quantile, normalize_sizes, pearson_correlation, quantile,
        student_t_quantile,
    };

    #[test]
    fn quantile_interpolates_between_ranks() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(quantile(&values, 0.5).expect("median"), 2.5);
        assert_relative_eq!(quantile(&values, 0.25).expect("q1"), 1.75);
        assert!(quantile(&[], 0.5).is_none());
    }

    #[test]
    fn box_stats_flags_outliers() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).expect("stats");
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
    }

    #[test]
    fn equal_sizes_map_to_midpoint() {
        assert_eq!(normalize_sizes(&[3.0, 3.0], (20.0, 200.0)), vec![110.0, 110.0]);
        assert_eq!(
            normalize_sizes(&[0.0, 5.0, 10.0], (20.0, 200.0)),
            vec![20.0, 110.0, 200.0]
        );
    }

    #[test]
    fn regression_recovers_exact_line() {
        let fit = LinearFit::from_points(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]).expect("fit");
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.r, 1.0, epsilon = 1e-12);
        assert!(LinearFit::from_points(&[1.0, 1.0], &[2.0, 3.0]).is_none());
        assert_relative_eq!(
            pearson_correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).expect("r"),
            -1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn quantile_functions_match_reference_tables() {
        assert_relative_eq!(normal_quantile(0.975), 1.959_964, epsilon = 1e-5);
        assert_relative_eq!(normal_quantile(0.5), 0.0, epsilon = 1e-12);
        assert_relative_eq!(student_t_quantile(0.975, 10.0), 2.228_139, epsilon = 1e-3);
        assert_relative_eq!(student_t_quantile(0.975, 1.0), 12.706_205, epsilon = 1e-5);
    }
}
