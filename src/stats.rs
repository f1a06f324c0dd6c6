//! Descriptive statistics, confidence intervals, and simple linear
//! regression.
//!
//! Every function discards NaN/Inf values before computing and returns
//! `None` when nothing usable remains. Results are recomputed from the input
//! on each call.
//!
//! # Algorithms
//!
//! - **Sums**: Neumaier compensated summation ([`kahan_sum`]) for O(ε) error
//!   independent of n.
//! - **Variance**: two-pass mean squared deviation from the mean, with
//!   denominator `n − 1` (sample) or `n` (population).
//! - **Quartiles**: nearest rank. `Q1` sits at index `⌊n/4⌋` and `Q3` at
//!   `⌊3n/4⌋` of the sorted data, each averaged with the element below it
//!   when `n` is a multiple of 4.
//! - **Outliers**: Tukey fences `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]`.

use serde::{Deserialize, Serialize};

/// Tukey fence multiplier for outlier detection.
pub const OUTLIER_FENCE: f64 = 1.5;

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Every descriptive statistic of a sample, computed in one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    /// Number of finite values used.
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub mean: f64,
    pub median: f64,
    /// Every value attaining the highest frequency, ascending.
    pub mode: Vec<f64>,
    /// `None` when fewer than two values are available.
    pub sample_variance: Option<f64>,
    pub sample_std_dev: Option<f64>,
    pub population_variance: f64,
    pub population_std_dev: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Values outside the Tukey fences, ascending.
    pub outliers: Vec<f64>,
}

/// Computes every descriptive statistic of `data`.
///
/// # Returns
/// - `None` if `data` holds no finite value.
///
/// # Examples
/// ```
/// use u_calc::stats::describe;
/// let data: Vec<f64> = (1..=10).map(f64::from).collect();
/// let s = describe(&data).unwrap();
/// assert_eq!(s.mean, 5.5);
/// assert_eq!(s.median, 5.5);
/// assert!((s.population_std_dev - 8.25_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn describe(data: &[f64]) -> Option<StatisticsResult> {
    let sorted = finite_sorted(data);
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let sum = kahan_sum(&sorted);
    let mean = sum / n as f64;
    let ss = sum_squared_deviations(&sorted, mean);
    let population_variance = ss / n as f64;
    let sample_variance = (n >= 2).then(|| ss / (n - 1) as f64);
    let (q1, q3) = quartiles_sorted(&sorted);
    let iqr = q3 - q1;
    let (lo, hi) = (q1 - OUTLIER_FENCE * iqr, q3 + OUTLIER_FENCE * iqr);

    Some(StatisticsResult {
        count: n,
        sum,
        min: sorted[0],
        max: sorted[n - 1],
        range: sorted[n - 1] - sorted[0],
        mean,
        median: median_sorted(&sorted),
        mode: mode_sorted(&sorted),
        sample_variance,
        sample_std_dev: sample_variance.map(f64::sqrt),
        population_variance,
        population_std_dev: population_variance.sqrt(),
        q1,
        q3,
        iqr,
        outliers: sorted.iter().copied().filter(|&x| x < lo || x > hi).collect(),
    })
}

/// Finite values of `data`, sorted ascending.
fn finite_sorted(data: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    v.sort_unstable_by(f64::total_cmp);
    v
}

fn finite(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| x.is_finite()).collect()
}

fn sum_squared_deviations(data: &[f64], mean: f64) -> f64 {
    let squares: Vec<f64> = data.iter().map(|&x| (x - mean) * (x - mean)).collect();
    kahan_sum(&squares)
}

// ---------------------------------------------------------------------------
// Individual statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean of the finite values.
///
/// # Returns
/// - `None` if `data` holds no finite value.
///
/// # Examples
/// ```
/// use u_calc::stats::mean;
/// assert_eq!(mean(&[1.0, 2.0, f64::NAN, 3.0]), Some(2.0));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    let v = finite(data);
    if v.is_empty() {
        return None;
    }
    Some(kahan_sum(&v) / v.len() as f64)
}

/// Sample variance (denominator `n − 1`).
///
/// # Returns
/// - `None` if fewer than two finite values are present.
pub fn variance(data: &[f64]) -> Option<f64> {
    let v = finite(data);
    if v.len() < 2 {
        return None;
    }
    let m = kahan_sum(&v) / v.len() as f64;
    Some(sum_squared_deviations(&v, m) / (v.len() - 1) as f64)
}

/// Population variance (denominator `n`).
///
/// # Returns
/// - `None` if `data` holds no finite value.
pub fn population_variance(data: &[f64]) -> Option<f64> {
    let v = finite(data);
    if v.is_empty() {
        return None;
    }
    let m = kahan_sum(&v) / v.len() as f64;
    Some(sum_squared_deviations(&v, m) / v.len() as f64)
}

/// Sample standard deviation, `√variance`.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Population standard deviation, `√population_variance`.
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    population_variance(data).map(f64::sqrt)
}

/// Median: the middle value, or the mean of the two middle values.
///
/// # Examples
/// ```
/// use u_calc::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    let sorted = finite_sorted(data);
    (!sorted.is_empty()).then(|| median_sorted(&sorted))
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Every value attaining the highest frequency, ascending.
///
/// When all values are distinct, every value is a mode.
///
/// # Examples
/// ```
/// use u_calc::stats::mode;
/// assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0, 3.0]), vec![2.0, 3.0]);
/// ```
pub fn mode(data: &[f64]) -> Vec<f64> {
    mode_sorted(&finite_sorted(data))
}

fn mode_sorted(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &x in sorted {
        match runs.last_mut() {
            Some((v, c)) if *v == x => *c += 1,
            _ => runs.push((x, 1)),
        }
    }
    let best = runs.iter().map(|&(_, c)| c).max().unwrap_or(0);
    runs.into_iter().filter(|&(_, c)| c == best).map(|(v, _)| v).collect()
}

/// `(Q1, Q3)` by the nearest-rank rule described in the module docs.
///
/// # Examples
/// ```
/// use u_calc::stats::quartiles;
/// assert_eq!(quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]), Some((2.5, 6.5)));
/// assert_eq!(quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some((2.0, 4.0)));
/// ```
pub fn quartiles(data: &[f64]) -> Option<(f64, f64)> {
    let sorted = finite_sorted(data);
    (!sorted.is_empty()).then(|| quartiles_sorted(&sorted))
}

fn quartiles_sorted(sorted: &[f64]) -> (f64, f64) {
    let n = sorted.len();
    let (i1, i3) = (n / 4, 3 * n / 4);
    if n % 4 == 0 {
        (
            (sorted[i1 - 1] + sorted[i1]) / 2.0,
            (sorted[i3 - 1] + sorted[i3]) / 2.0,
        )
    } else {
        (sorted[i1], sorted[i3])
    }
}

// ---------------------------------------------------------------------------
// Confidence interval
// ---------------------------------------------------------------------------

/// Two-sided z-score for a confidence level given in percent.
///
/// Only 90 %, 95 % and 99 % are tabulated. Every other level falls back to
/// the 95 % value, 1.96.
pub fn z_score_for(confidence_percent: f64) -> f64 {
    const TABLE: [(f64, f64); 3] = [(90.0, 1.645), (95.0, 1.96), (99.0, 2.576)];
    TABLE
        .iter()
        .find(|(level, _)| (level - confidence_percent).abs() < 1e-9)
        .map_or(1.96, |&(_, z)| z)
}

/// Normal-approximation confidence interval for a mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub z: f64,
    /// `σ / √n`.
    pub standard_error: f64,
    /// `z · σ / √n`.
    pub margin: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Confidence interval `mean ± z·σ/√n`, `z` from [`z_score_for`].
///
/// # Returns
/// - `None` if `n = 0`, `std_dev < 0`, or any argument is non-finite.
///
/// # Examples
/// ```
/// use u_calc::stats::confidence_interval;
/// let ci = confidence_interval(100.0, 15.0, 25, 95.0).unwrap();
/// assert!((ci.margin - 5.88).abs() < 1e-12);
/// assert!((ci.lower - 94.12).abs() < 1e-12);
/// ```
pub fn confidence_interval(
    mean: f64,
    std_dev: f64,
    n: usize,
    confidence_percent: f64,
) -> Option<ConfidenceInterval> {
    if n == 0
        || !mean.is_finite()
        || !std_dev.is_finite()
        || std_dev < 0.0
        || !confidence_percent.is_finite()
    {
        return None;
    }
    let z = z_score_for(confidence_percent);
    let standard_error = std_dev / (n as f64).sqrt();
    let margin = z * standard_error;
    Some(ConfidenceInterval {
        mean,
        z,
        standard_error,
        margin,
        lower: mean - margin,
        upper: mean + margin,
    })
}

// ---------------------------------------------------------------------------
// Linear regression
// ---------------------------------------------------------------------------

/// Ordinary least-squares fit `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient. `0` when `y` is constant.
    pub r: f64,
    pub r_squared: f64,
    pub n: usize,
}

impl LinearRegression {
    /// Fitted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a least-squares line through `(x[i], y[i])`.
///
/// # Formula
/// With centred sums `Sxx = Σ(x−x̄)²`, `Syy = Σ(y−ȳ)²`,
/// `Sxy = Σ(x−x̄)(y−ȳ)`:
/// ```text
/// slope     = Sxy / Sxx
/// intercept = ȳ − slope·x̄
/// r         = Sxy / √(Sxx·Syy)
/// ```
/// This equals the `nΣxy − ΣxΣy` closed form without its cancellation when
/// the data sit on a large offset.
///
/// # Returns
/// - `None` if the lengths differ, fewer than two points are given, any
///   value is non-finite, or every `x` is identical.
///
/// # Examples
/// ```
/// use u_calc::stats::linear_regression;
/// let fit = linear_regression(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!(fit.intercept.abs() < 1e-12);
/// assert!((fit.r_squared - 1.0).abs() < 1e-12);
/// ```
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<LinearRegression> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    if !x.iter().chain(y).all(|v| v.is_finite()) {
        return None;
    }
    if x.iter().all(|&v| v == x[0]) {
        return None;
    }
    let nf = n as f64;
    let x_mean = kahan_sum(x) / nf;
    let y_mean = kahan_sum(y) / nf;
    let centred = |f: fn(f64, f64) -> f64| -> f64 {
        let terms: Vec<f64> = x
            .iter()
            .zip(y)
            .map(|(&a, &b)| f(a - x_mean, b - y_mean))
            .collect();
        kahan_sum(&terms)
    };
    let sxy = centred(|dx, dy| dx * dy);
    let sxx = centred(|dx, _| dx * dx);
    let syy = centred(|_, dy| dy * dy);

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    let r = if syy == 0.0 || y.iter().all(|&v| v == y[0]) {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };
    Some(LinearRegression {
        slope,
        intercept,
        r,
        r_squared: r * r,
        n,
    })
}

// ---------------------------------------------------------------------------
// Compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// An improved Kahan summation that also handles an addend larger in
/// magnitude than the running sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-1e6_f64..1e6, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        // --- Variances are non-negative and sample ≥ population ---
        #[test]
        fn variance_ordering(data in finite_vec(2, 100)) {
            let s = describe(&data).unwrap();
            prop_assert!(s.population_variance >= 0.0);
            prop_assert!(s.sample_variance.unwrap() >= s.population_variance);
        }

        // --- Order statistics are ordered ---
        #[test]
        fn order_statistics(data in finite_vec(1, 100)) {
            let s = describe(&data).unwrap();
            prop_assert!(s.min <= s.q1);
            prop_assert!(s.q1 <= s.median);
            prop_assert!(s.median <= s.q3);
            prop_assert!(s.q3 <= s.max);
            prop_assert!(s.min <= s.mean + 1e-9 && s.mean <= s.max + 1e-9);
        }

        // --- Outliers lie outside the fences ---
        #[test]
        fn outliers_outside_fences(data in finite_vec(1, 100)) {
            let s = describe(&data).unwrap();
            for &o in &s.outliers {
                prop_assert!(o < s.q1 - 1.5 * s.iqr || o > s.q3 + 1.5 * s.iqr);
            }
        }

        // --- Every mode attains the maximum frequency ---
        #[test]
        fn modes_have_max_frequency(data in proptest::collection::vec(0_u8..10, 1..60)) {
            let xs: Vec<f64> = data.iter().map(|&d| f64::from(d)).collect();
            let count = |v: f64| xs.iter().filter(|&&x| x == v).count();
            let best = xs.iter().map(|&x| count(x)).max().unwrap();
            let modes = mode(&xs);
            prop_assert!(!modes.is_empty());
            for m in modes {
                prop_assert_eq!(count(m), best);
            }
        }

        // --- Non-finite values are ignored ---
        #[test]
        fn non_finite_discarded(data in finite_vec(1, 50), at in 0_usize..50) {
            let mut dirty = data.clone();
            dirty.insert(at.min(dirty.len()), f64::NAN);
            dirty.push(f64::NEG_INFINITY);
            prop_assert_eq!(describe(&dirty), describe(&data));
        }

        // --- Regression recovers an exact line ---
        #[test]
        fn regression_recovers_line(
            slope in -100.0_f64..100.0,
            intercept in -100.0_f64..100.0,
            n in 2_usize..50,
        ) {
            let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let y: Vec<f64> = x.iter().map(|&xi| slope * xi + intercept).collect();
            let fit = linear_regression(&x, &y).unwrap();
            prop_assert!((fit.slope - slope).abs() < 1e-6 * slope.abs().max(1.0));
            prop_assert!((fit.intercept - intercept).abs() < 1e-6 * intercept.abs().max(1.0) + 1e-6 * slope.abs());
            prop_assert!(fit.r_squared <= 1.0);
        }

        // --- Confidence interval is symmetric about the mean ---
        #[test]
        fn interval_symmetric(
            m in -1e6_f64..1e6,
            sd in 0.0_f64..1e3,
            n in 1_usize..10_000,
            level in prop::sample::select(vec![90.0, 95.0, 99.0, 42.0]),
        ) {
            let ci = confidence_interval(m, sd, n, level).unwrap();
            prop_assert!(((ci.upper - ci.mean) - (ci.mean - ci.lower)).abs() < 1e-6);
            prop_assert!(ci.lower <= ci.upper);
        }
    }
}
