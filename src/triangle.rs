//! Triangle solving from SSS, SAS, ASA, and right-triangle data.
//!
//! Angles are given and returned in degrees. Internally every computation
//! runs in radians.
//!
//! # Algorithms
//!
//! - **SSS**: strict triangle inequality, area by Heron's formula in Kahan's
//!   cancellation-free ordering, each angle from
//!   `atan2(4·area, s₁² + s₂² − opposite²)`, i.e. the Law of Sines over the
//!   Law of Cosines, which stays accurate for needle-thin triangles.
//! - **SAS**: third side by the Law of Cosines in its half-angle form
//!   `c² = (a − b)² + 4ab·sin²(C/2)`. The angle opposite the shorter given
//!   side is always acute, so it is recovered unambiguously and the last
//!   angle follows from the angle sum.
//! - **ASA**: third angle by the angle sum, sides by the Law of Sines.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Absolute tolerance on `x² + y² − z²` for classifying a right triangle.
pub const RIGHT_ANGLE_TOLERANCE: f64 = 1e-3;

/// Relative tolerance for treating two sides as equal.
const SIDE_EQUALITY_TOLERANCE: f64 = 1e-9;

/// Shape classification of a solved triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleKind {
    Equilateral,
    Isosceles,
    Scalene,
    Right,
}

/// A fully solved triangle.
///
/// `sides[i]` is opposite `angles[i]`, so `sides = [a, b, c]` and
/// `angles = [A, B, C]` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleSolution {
    pub sides: [f64; 3],
    pub angles: [f64; 3],
    pub area: f64,
    pub perimeter: f64,
    /// Altitude onto side `a`, `2·area / a`.
    pub height: f64,
    pub kind: TriangleKind,
    /// `false` only when a supplied hypotenuse disagrees with the legs.
    pub valid: bool,
}

impl TriangleSolution {
    fn assemble(sides: [f64; 3], angles: [f64; 3], area: f64, valid: bool) -> Self {
        Self {
            sides,
            angles,
            area,
            perimeter: sides.iter().sum(),
            height: 2.0 * area / sides[0],
            kind: classify(sides),
            valid,
        }
    }

    /// Sum of the three angles in degrees. 180 up to rounding.
    pub fn angle_sum(&self) -> f64 {
        self.angles.iter().sum()
    }
}

/// Classifies a triangle by its sides.
///
/// The right-angle test on the sorted sides runs first, so an isosceles
/// right triangle reports [`TriangleKind::Right`].
///
/// # Examples
/// ```
/// use u_calc::triangle::{classify, TriangleKind};
/// assert_eq!(classify([3.0, 4.0, 5.0]), TriangleKind::Right);
/// assert_eq!(classify([2.0, 2.0, 2.0]), TriangleKind::Equilateral);
/// assert_eq!(classify([2.0, 2.0, 3.0]), TriangleKind::Isosceles);
/// assert_eq!(classify([4.0, 5.0, 6.0]), TriangleKind::Scalene);
/// ```
pub fn classify(sides: [f64; 3]) -> TriangleKind {
    let mut s = sides;
    s.sort_unstable_by(f64::total_cmp);
    if (s[0] * s[0] + s[1] * s[1] - s[2] * s[2]).abs() < RIGHT_ANGLE_TOLERANCE {
        return TriangleKind::Right;
    }
    let eq = |x: f64, y: f64| (x - y).abs() <= SIDE_EQUALITY_TOLERANCE * x.abs().max(y.abs());
    match (eq(s[0], s[1]), eq(s[1], s[2])) {
        (true, true) => TriangleKind::Equilateral,
        (false, false) if !eq(s[0], s[2]) => TriangleKind::Scalene,
        _ => TriangleKind::Isosceles,
    }
}

fn check_side(name: &str, v: f64) -> Result<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "side {name} must be positive and finite, got {v}"
        )));
    }
    Ok(())
}

fn check_angle(name: &str, deg: f64) -> Result<()> {
    if !deg.is_finite() || deg <= 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "angle {name} must be positive and finite, got {deg}"
        )));
    }
    if deg >= 180.0 {
        return Err(CalcError::NoSolution(format!(
            "angle {name} = {deg}° leaves no room for a triangle"
        )));
    }
    Ok(())
}

/// Angle opposite side `opposite`, in degrees.
///
/// `sin = 2·area / (s₁s₂)` and `cos = (s₁² + s₂² − opposite²) / (2s₁s₂)`
/// share a denominator, so their ratio goes straight into `atan2`.
fn angle_opposite(opposite: f64, s1: f64, s2: f64, area: f64) -> f64 {
    let cos_term = (s1 - opposite) * (s1 + opposite) + s2 * s2;
    (4.0 * area).atan2(cos_term).to_degrees()
}

/// Heron's formula with the sides sorted `x ≥ y ≥ z`.
///
/// Reference: Kahan (2014), "Miscalculating Area and Angles of a
/// Needle-like Triangle".
fn heron_area(a: f64, b: f64, c: f64) -> f64 {
    let mut s = [a, b, c];
    s.sort_unstable_by(|p, q| q.total_cmp(p));
    let [x, y, z] = s;
    let product = (x + (y + z)) * (z - (x - y)) * (z + (x - y)) * (x + (y - z));
    0.25 * product.max(0.0).sqrt()
}

/// Solves a triangle from its three sides.
///
/// # Errors
/// - [`CalcError::InvalidInput`] for a non-positive or non-finite side.
/// - [`CalcError::NoSolution`] when the strict triangle inequality fails.
///
/// # Examples
/// ```
/// use u_calc::triangle::{solve_sss, TriangleKind};
/// let t = solve_sss(3.0, 4.0, 5.0).unwrap();
/// assert!((t.angles[2] - 90.0).abs() < 1e-9);
/// assert!((t.area - 6.0).abs() < 1e-12);
/// assert_eq!(t.kind, TriangleKind::Right);
/// ```
pub fn solve_sss(a: f64, b: f64, c: f64) -> Result<TriangleSolution> {
    check_side("a", a)?;
    check_side("b", b)?;
    check_side("c", c)?;
    if a + b <= c || a + c <= b || b + c <= a {
        return Err(CalcError::NoSolution(format!(
            "sides {a}, {b}, {c} violate the triangle inequality"
        )));
    }

    let area = heron_area(a, b, c);
    let angle_a = angle_opposite(a, b, c, area);
    let angle_b = angle_opposite(b, a, c, area);
    let angle_c = angle_opposite(c, a, b, area);

    Ok(TriangleSolution::assemble(
        [a, b, c],
        [angle_a, angle_b, angle_c],
        area,
        true,
    ))
}

/// Solves a triangle from two sides and their included angle `C`.
///
/// # Errors
/// - [`CalcError::InvalidInput`] for a non-positive or non-finite input.
/// - [`CalcError::NoSolution`] when `angle_c ≥ 180°`.
///
/// # Examples
/// ```
/// use u_calc::triangle::solve_sas;
/// let t = solve_sas(3.0, 4.0, 90.0).unwrap();
/// assert!((t.sides[2] - 5.0).abs() < 1e-12);
/// assert!((t.area - 6.0).abs() < 1e-12);
/// ```
pub fn solve_sas(a: f64, b: f64, angle_c: f64) -> Result<TriangleSolution> {
    check_side("a", a)?;
    check_side("b", b)?;
    check_angle("C", angle_c)?;

    let c_rad = angle_c.to_radians();
    // (a − b)² + 4ab·sin²(C/2) avoids cancellation for small C.
    let half_sin = (c_rad / 2.0).sin();
    let c = ((a - b) * (a - b) + 4.0 * a * b * half_sin * half_sin).sqrt();
    let area = 0.5 * a * b * c_rad.sin();

    let (angle_a, angle_b) = if a <= b {
        let angle_a = angle_opposite(a, b, c, area);
        (angle_a, 180.0 - angle_c - angle_a)
    } else {
        let angle_b = angle_opposite(b, a, c, area);
        (180.0 - angle_c - angle_b, angle_b)
    };

    Ok(TriangleSolution::assemble(
        [a, b, c],
        [angle_a, angle_b, angle_c],
        area,
        true,
    ))
}

/// Solves a triangle from angles `A`, `B` and their included side `c`.
///
/// # Errors
/// - [`CalcError::InvalidInput`] for a non-positive or non-finite input.
/// - [`CalcError::NoSolution`] when `A + B ≥ 180°`.
///
/// # Examples
/// ```
/// use u_calc::triangle::solve_asa;
/// let t = solve_asa(30.0, 10.0, 60.0).unwrap();
/// assert!((t.angles[2] - 90.0).abs() < 1e-12);
/// assert!((t.sides[0] - 5.0).abs() < 1e-9);
/// ```
pub fn solve_asa(angle_a: f64, c: f64, angle_b: f64) -> Result<TriangleSolution> {
    check_angle("A", angle_a)?;
    check_side("c", c)?;
    check_angle("B", angle_b)?;
    let angle_c = 180.0 - angle_a - angle_b;
    if angle_c <= 0.0 {
        return Err(CalcError::NoSolution(format!(
            "angles {angle_a}° and {angle_b}° sum to 180° or more"
        )));
    }

    let sin_c = angle_c.to_radians().sin();
    let a = c * angle_a.to_radians().sin() / sin_c;
    let b = c * angle_b.to_radians().sin() / sin_c;

    Ok(TriangleSolution::assemble(
        [a, b, c],
        [angle_a, angle_b, angle_c],
        0.5 * a * b * sin_c,
        true,
    ))
}

/// Solves a right triangle from its legs.
///
/// The hypotenuse is always computed by Pythagoras. When `hypotenuse` is
/// supplied it is compared with the computed value and
/// [`TriangleSolution::valid`] is `false` if they differ by `1e-3` or more.
///
/// # Errors
/// [`CalcError::InvalidInput`] for a non-positive or non-finite input.
///
/// # Examples
/// ```
/// use u_calc::triangle::solve_right;
/// let t = solve_right(3.0, 4.0, Some(5.0)).unwrap();
/// assert!(t.valid);
/// assert!(!solve_right(3.0, 4.0, Some(6.0)).unwrap().valid);
/// ```
pub fn solve_right(leg_a: f64, leg_b: f64, hypotenuse: Option<f64>) -> Result<TriangleSolution> {
    check_side("a", leg_a)?;
    check_side("b", leg_b)?;
    let c = leg_a.hypot(leg_b);
    let valid = match hypotenuse {
        Some(h) => {
            check_side("hypotenuse", h)?;
            (h - c).abs() < RIGHT_ANGLE_TOLERANCE
        }
        None => true,
    };

    let angle_a = leg_a.atan2(leg_b).to_degrees();
    Ok(TriangleSolution::assemble(
        [leg_a, leg_b, c],
        [angle_a, 90.0 - angle_a, 90.0],
        0.5 * leg_a * leg_b,
        valid,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    // --- SSS ---

    #[test]
    fn test_sss_345() {
        let t = solve_sss(3.0, 4.0, 5.0).unwrap();
        assert!(close(t.angles[0], 36.869_897_645_844, 1e-9));
        assert!(close(t.angles[1], 53.130_102_354_156, 1e-9));
        assert!(close(t.angles[2], 90.0, 1e-9));
        assert!(close(t.area, 6.0, 1e-12));
        assert_eq!(t.perimeter, 12.0);
        assert!(close(t.height, 4.0, 1e-12));
        assert_eq!(t.kind, TriangleKind::Right);
        assert!(t.valid);
    }

    #[test]
    fn test_sss_equilateral() {
        let t = solve_sss(2.0, 2.0, 2.0).unwrap();
        for angle in t.angles {
            assert!(close(angle, 60.0, 1e-9));
        }
        assert!(close(t.area, 3.0_f64.sqrt(), 1e-12));
        assert_eq!(t.kind, TriangleKind::Equilateral);
    }

    #[test]
    fn test_sss_degenerate() {
        assert!(matches!(solve_sss(1.0, 2.0, 3.0), Err(CalcError::NoSolution(_))));
        assert!(matches!(solve_sss(1.0, 1.0, 5.0), Err(CalcError::NoSolution(_))));
    }

    #[test]
    fn test_sss_invalid_sides() {
        assert!(matches!(solve_sss(0.0, 1.0, 1.0), Err(CalcError::InvalidInput(_))));
        assert!(matches!(solve_sss(-3.0, 4.0, 5.0), Err(CalcError::InvalidInput(_))));
        assert!(matches!(solve_sss(f64::NAN, 4.0, 5.0), Err(CalcError::InvalidInput(_))));
    }

    // --- SAS ---

    #[test]
    fn test_sas_obtuse_remaining_angle() {
        let t = solve_sas(10.0, 3.0, 30.0).unwrap();
        assert!(t.angles[0] > 90.0, "A = {}", t.angles[0]);
        assert!(close(t.angle_sum(), 180.0, 1e-9));
        let check = solve_sss(t.sides[0], t.sides[1], t.sides[2]).unwrap();
        for i in 0..3 {
            assert!(close(check.angles[i], t.angles[i], 1e-9));
        }
        assert!(close(check.area, t.area, 1e-9));
    }

    #[test]
    fn test_sas_small_included_angle() {
        let t = solve_sas(1.0, 1.0, 1e-7).unwrap();
        let expected = 2.0 * (1e-7_f64.to_radians() / 2.0).sin();
        assert!(t.sides[2] > 0.0);
        assert!((t.sides[2] - expected).abs() < 1e-12 * expected);
        assert!(close(t.angles[0], 90.0 - 0.5e-7, 1e-9));
        assert!(t.area > 0.0);
        let check = solve_sss(1.0, 1.0, t.sides[2]).unwrap();
        assert!(close(check.angles[2], 1e-7, 1e-12));
        assert!(close(check.angles[0], t.angles[0], 1e-9));
        assert!((check.area - t.area).abs() < 1e-9 * t.area);
    }

    #[test]
    fn test_sss_needle_triangle_angles() {
        let t = solve_sss(1.0, 1.0, 1e-9).unwrap();
        assert!(t.angles[2] > 0.0);
        assert!((t.angle_sum() - 180.0).abs() < 1e-9);
        assert!(close(t.angles[2], 1e-9_f64.to_degrees(), 1e-15));
    }

    #[test]
    fn test_sas_invalid() {
        assert!(matches!(solve_sas(1.0, 1.0, 0.0), Err(CalcError::InvalidInput(_))));
        assert!(matches!(solve_sas(1.0, 1.0, 180.0), Err(CalcError::NoSolution(_))));
    }

    // --- ASA ---

    #[test]
    fn test_asa_30_60_90() {
        let t = solve_asa(30.0, 10.0, 60.0).unwrap();
        assert!(close(t.sides[0], 5.0, 1e-9));
        assert!(close(t.sides[1], 75.0_f64.sqrt(), 1e-9));
        assert_eq!(t.kind, TriangleKind::Right);
    }

    #[test]
    fn test_asa_no_third_angle() {
        assert!(matches!(solve_asa(100.0, 1.0, 80.0), Err(CalcError::NoSolution(_))));
        assert!(matches!(solve_asa(100.0, 1.0, 90.0), Err(CalcError::NoSolution(_))));
        assert!(matches!(solve_asa(30.0, 0.0, 60.0), Err(CalcError::InvalidInput(_))));
    }

    // --- right ---

    #[test]
    fn test_right_triangle() {
        let t = solve_right(5.0, 12.0, None).unwrap();
        assert_eq!(t.sides[2], 13.0);
        assert_eq!(t.angles[2], 90.0);
        assert!(close(t.area, 30.0, 1e-12));
        assert_eq!(t.kind, TriangleKind::Right);
        assert!(t.valid);
    }

    #[test]
    fn test_right_hypotenuse_check() {
        assert!(solve_right(3.0, 4.0, Some(5.0005)).unwrap().valid);
        let t = solve_right(3.0, 4.0, Some(6.0)).unwrap();
        assert!(!t.valid);
        assert_eq!(t.sides[2], 5.0);
        assert!(solve_right(3.0, 4.0, Some(-5.0)).is_err());
    }

    // --- classify ---

    #[test]
    fn test_classify_isosceles_right() {
        let leg = 1.0;
        assert_eq!(classify([leg, leg, 2.0_f64.sqrt()]), TriangleKind::Right);
    }

    #[test]
    fn test_classify_isosceles_any_pair() {
        assert_eq!(classify([5.0, 3.0, 5.0]), TriangleKind::Isosceles);
        assert_eq!(classify([3.0, 5.0, 5.0]), TriangleKind::Isosceles);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Three sides satisfying the strict triangle inequality.
    fn valid_sides() -> impl Strategy<Value = (f64, f64, f64)> {
        (0.1_f64..100.0, 0.1_f64..100.0, 0.01_f64..0.99).prop_map(|(a, b, t)| {
            let lo = (a - b).abs();
            (a, b, lo + t * (a + b - lo))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        // --- SSS angles sum to 180° ---
        #[test]
        fn sss_angle_sum((a, b, c) in valid_sides()) {
            let t = solve_sss(a, b, c).unwrap();
            prop_assert!((t.angle_sum() - 180.0).abs() < 1e-9);
            prop_assert!(t.angles.iter().all(|&x| x > 0.0 && x < 180.0));
            prop_assert!(t.area > 0.0);
        }

        // --- Law of Sines holds for SSS solutions ---
        #[test]
        fn sss_law_of_sines((a, b, c) in valid_sides()) {
            let t = solve_sss(a, b, c).unwrap();
            let ratio = |i: usize| t.sides[i] / t.angles[i].to_radians().sin();
            prop_assert!((ratio(0) - ratio(1)).abs() < 1e-6 * ratio(0));
        }

        // --- SAS agrees with SSS on the resulting sides ---
        #[test]
        fn sas_matches_sss(a in 0.5_f64..50.0, b in 0.5_f64..50.0, angle in 1.0_f64..179.0) {
            let t = solve_sas(a, b, angle).unwrap();
            let check = solve_sss(t.sides[0], t.sides[1], t.sides[2]).unwrap();
            for i in 0..3 {
                prop_assert!((check.angles[i] - t.angles[i]).abs() < 1e-6);
            }
            prop_assert!((check.area - t.area).abs() < 1e-6 * t.area.max(1.0));
        }

        // --- ASA preserves the given side and angles ---
        #[test]
        fn asa_angle_sum(angle_a in 1.0_f64..89.0, angle_b in 1.0_f64..89.0, c in 0.1_f64..100.0) {
            let t = solve_asa(angle_a, c, angle_b).unwrap();
            prop_assert_eq!(t.sides[2], c);
            prop_assert!((t.angle_sum() - 180.0).abs() < 1e-9);
        }
    }
}
