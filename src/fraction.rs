//! Exact rational arithmetic on `i64` fractions.
//!
//! A [`Fraction`] is always canonical: the denominator is positive and
//! `gcd(|numerator|, denominator) = 1`. Arithmetic runs in `i128` and fails
//! with [`CalcError::InvalidInput`] when a canonical result does not fit
//! back into `i64`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Continued-fraction terms tried by [`Fraction::from_decimal`].
const MAX_CONTINUED_FRACTION_TERMS: usize = 64;

/// A canonical fraction `numerator / denominator`.
///
/// Serializes as the pair `[numerator, denominator]`; deserialization
/// re-validates and reduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i64, i64)", into = "(i64, i64)")]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

/// A fraction split into a whole part and a proper remainder.
///
/// The sign lives on `whole`; `remainder` is non-negative, so
/// `-7/2` is `-3` and `1/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedNumber {
    pub whole: i64,
    pub remainder: Fraction,
}

fn gcd_i128(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { numerator: 0, denominator: 1 };
    pub const ONE: Fraction = Fraction { numerator: 1, denominator: 1 };

    /// Creates the canonical fraction equal to `numerator / denominator`.
    ///
    /// # Errors
    /// - [`CalcError::DivisionByZero`] if `denominator = 0`.
    /// - [`CalcError::InvalidInput`] if the reduced form does not fit in
    ///   `i64` (e.g. `1 / i64::MIN`).
    ///
    /// # Examples
    /// ```
    /// use u_calc::fraction::Fraction;
    /// let f = Fraction::new(6, -8).unwrap();
    /// assert_eq!((f.numerator(), f.denominator()), (-3, 4));
    /// ```
    pub fn new(numerator: i64, denominator: i64) -> Result<Self> {
        Self::reduce(i128::from(numerator), i128::from(denominator))
    }

    /// Reduces `numerator / denominator`, mapping a zero denominator to
    /// the sentinel `0/1` instead of an error.
    ///
    /// # Examples
    /// ```
    /// use u_calc::fraction::Fraction;
    /// assert_eq!(Fraction::simplify(10, 4).unwrap().to_string(), "5/2");
    /// assert_eq!(Fraction::simplify(3, 0).unwrap(), Fraction::ZERO);
    /// ```
    pub fn simplify(numerator: i64, denominator: i64) -> Result<Self> {
        if denominator == 0 {
            return Ok(Self::ZERO);
        }
        Self::new(numerator, denominator)
    }

    fn reduce(n: i128, d: i128) -> Result<Self> {
        if d == 0 {
            return Err(CalcError::DivisionByZero);
        }
        let g = gcd_i128(n, d);
        let (mut n, mut d) = (n / g, d / g);
        if d < 0 {
            n = -n;
            d = -d;
        }
        match (i64::try_from(n), i64::try_from(d)) {
            (Ok(numerator), Ok(denominator)) => Ok(Self { numerator, denominator }),
            _ => Err(CalcError::InvalidInput(format!(
                "{n}/{d} does not fit in 64-bit integers"
            ))),
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    fn parts(&self) -> (i128, i128) {
        (i128::from(self.numerator), i128::from(self.denominator))
    }

    // -----------------------------------------------------------------------
    // Arithmetic
    // -----------------------------------------------------------------------

    /// Sum over the common denominator `lcm(d₁, d₂)`.
    ///
    /// # Examples
    /// ```
    /// use u_calc::fraction::Fraction;
    /// let a = Fraction::new(1, 6).unwrap();
    /// let b = Fraction::new(1, 4).unwrap();
    /// assert_eq!(a.add(&b).unwrap().to_string(), "5/12");
    /// ```
    pub fn add(&self, other: &Fraction) -> Result<Fraction> {
        self.combine(other, 1)
    }

    /// Difference over the common denominator `lcm(d₁, d₂)`.
    pub fn subtract(&self, other: &Fraction) -> Result<Fraction> {
        self.combine(other, -1)
    }

    fn combine(&self, other: &Fraction, sign: i128) -> Result<Fraction> {
        let (n1, d1) = self.parts();
        let (n2, d2) = other.parts();
        let lcm = d1 / gcd_i128(d1, d2) * d2;
        Self::reduce(n1 * (lcm / d1) + sign * n2 * (lcm / d2), lcm)
    }

    /// Product `n₁n₂ / d₁d₂`.
    pub fn multiply(&self, other: &Fraction) -> Result<Fraction> {
        let (n1, d1) = self.parts();
        let (n2, d2) = other.parts();
        Self::reduce(n1 * n2, d1 * d2)
    }

    /// Quotient `self · (1 / other)`.
    ///
    /// # Errors
    /// [`CalcError::DivisionByZero`] if `other` is zero.
    pub fn divide(&self, other: &Fraction) -> Result<Fraction> {
        if other.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        let (n1, d1) = self.parts();
        let (n2, d2) = other.parts();
        Self::reduce(n1 * d2, d1 * n2)
    }

    /// `1 / self`.
    ///
    /// # Errors
    /// [`CalcError::DivisionByZero`] if `self` is zero.
    pub fn reciprocal(&self) -> Result<Fraction> {
        Self::ONE.divide(self)
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    // -----------------------------------------------------------------------
    // Mixed numbers
    // -----------------------------------------------------------------------

    /// Splits an improper fraction into whole part and proper remainder.
    ///
    /// # Returns
    /// - `None` for a proper fraction (`|n| < d`).
    ///
    /// # Examples
    /// ```
    /// use u_calc::fraction::Fraction;
    /// let m = Fraction::new(-7, 2).unwrap().to_mixed_number().unwrap();
    /// assert_eq!(m.whole, -3);
    /// assert_eq!(m.to_string(), "-3 1/2");
    /// assert!(Fraction::new(1, 2).unwrap().to_mixed_number().is_none());
    /// ```
    pub fn to_mixed_number(&self) -> Option<MixedNumber> {
        if self.numerator.unsigned_abs() < self.denominator.unsigned_abs() {
            return None;
        }
        // Canonical form guarantees gcd(rem, d) = 1.
        let rem = (self.numerator % self.denominator).abs();
        Some(MixedNumber {
            whole: self.numerator / self.denominator,
            remainder: Fraction {
                numerator: rem,
                denominator: if rem == 0 { 1 } else { self.denominator },
            },
        })
    }

    // -----------------------------------------------------------------------
    // Decimal conversion
    // -----------------------------------------------------------------------

    /// Best rational approximation of `x` with denominator at most
    /// `max_denominator`.
    ///
    /// # Algorithm
    /// Expands `x` as a continued fraction until the next convergent's
    /// denominator would exceed the bound, then picks whichever of the last
    /// convergent and the largest admissible semiconvergent lies closer.
    ///
    /// # Errors
    /// [`CalcError::InvalidInput`] if `x` is non-finite or beyond the `i64`
    /// range, or `max_denominator < 1`.
    ///
    /// # Examples
    /// ```
    /// use u_calc::fraction::Fraction;
    /// let pi = Fraction::from_decimal(std::f64::consts::PI, 1000).unwrap();
    /// assert_eq!(pi.to_string(), "355/113");
    /// assert_eq!(Fraction::from_decimal(0.75, 100).unwrap().to_string(), "3/4");
    /// ```
    pub fn from_decimal(x: f64, max_denominator: i64) -> Result<Fraction> {
        if !x.is_finite() || x.abs() >= i64::MAX as f64 {
            return Err(CalcError::InvalidInput(format!(
                "{x} cannot be represented as a 64-bit fraction"
            )));
        }
        if max_denominator < 1 {
            return Err(CalcError::InvalidInput(format!(
                "max denominator must be at least 1, got {max_denominator}"
            )));
        }
        let limit = i128::from(max_denominator);

        // (p0/q0, p1/q1) are the previous two convergents.
        let (mut p0, mut q0, mut p1, mut q1) = (0_i128, 1_i128, 1_i128, 0_i128);
        let mut v = x;
        for _ in 0..MAX_CONTINUED_FRACTION_TERMS {
            let a = v.floor();
            let term = a as i128;
            let q2 = q0 + term * q1;
            if q2 > limit {
                let k = (limit - q0) / q1;
                let semi = Self::reduce(p0 + k * p1, q0 + k * q1)?;
                let conv = Self::reduce(p1, q1)?;
                return Ok(if (semi.to_f64() - x).abs() < (conv.to_f64() - x).abs() {
                    semi
                } else {
                    conv
                });
            }
            (p0, q0, p1, q1) = (p1, q1, p0 + term * p1, q2);
            let frac = v - a;
            if frac <= f64::EPSILON * v.abs().max(1.0) {
                break;
            }
            v = frac.recip();
        }
        Self::reduce(p1, q1)
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let (n1, d1) = self.parts();
        let (n2, d2) = other.parts();
        (n1 * d2).cmp(&(n2 * d1))
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Free-function form of [`Fraction::simplify`].
pub fn simplify(numerator: i64, denominator: i64) -> Result<Fraction> {
    Fraction::simplify(numerator, denominator)
}

impl MixedNumber {
    /// Recombines into an improper fraction.
    pub fn to_fraction(&self) -> Result<Fraction> {
        let (r, d) = self.remainder.parts();
        let magnitude = i128::from(self.whole).abs() * d + r;
        let n = if self.whole < 0 { -magnitude } else { magnitude };
        Fraction::reduce(n, d)
    }
}

// ---------------------------------------------------------------------------
// Formatting / parsing
// ---------------------------------------------------------------------------

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl fmt::Display for MixedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.remainder.is_zero() {
            write!(f, "{}", self.whole)
        } else {
            write!(f, "{} {}", self.whole, self.remainder)
        }
    }
}

impl FromStr for Fraction {
    type Err = CalcError;

    /// Parses `"n/d"`, `"n"` or the mixed form `"w n/d"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CalcError::InvalidInput(format!("cannot parse {s:?} as a fraction"));
        let int = |t: &str| t.trim().parse::<i64>().map_err(|_| invalid());
        let s = s.trim();

        let Some((left, d)) = s.split_once('/') else {
            return Fraction::new(int(s)?, 1);
        };
        let d = int(d)?;
        match left.trim().split_once(char::is_whitespace) {
            None => Fraction::new(int(left)?, d),
            Some((whole, n)) => {
                let negative = whole.starts_with('-');
                let (whole, n) = (int(whole)?, int(n)?);
                if n < 0 || d <= 0 || n >= d {
                    return Err(invalid());
                }
                let magnitude = i128::from(whole).abs() * i128::from(d) + i128::from(n);
                Fraction::reduce(if negative { -magnitude } else { magnitude }, i128::from(d))
            }
        }
    }
}

impl TryFrom<(i64, i64)> for Fraction {
    type Error = CalcError;

    fn try_from((n, d): (i64, i64)) -> Result<Self> {
        Fraction::new(n, d)
    }
}

impl From<Fraction> for (i64, i64) {
    fn from(f: Fraction) -> Self {
        (f.numerator, f.denominator)
    }
}

impl From<i64> for Fraction {
    fn from(n: i64) -> Self {
        Fraction { numerator: n, denominator: 1 }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    // --- construction ---

    #[test]
    fn test_new_canonical() {
        assert_eq!(frac(2, 4), frac(1, 2));
        assert_eq!(frac(3, -6).to_string(), "-1/2");
        assert_eq!(frac(-3, -6).to_string(), "1/2");
        assert_eq!(frac(0, -5), Fraction::ZERO);
    }

    #[test]
    fn test_new_zero_denominator() {
        assert_eq!(Fraction::new(1, 0), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_new_overflow() {
        assert!(matches!(Fraction::new(1, i64::MIN), Err(CalcError::InvalidInput(_))));
        assert_eq!(frac(i64::MIN, 2).numerator(), i64::MIN / 2);
    }

    #[test]
    fn test_simplify_sentinel() {
        assert_eq!(simplify(5, 0).unwrap(), Fraction::ZERO);
        assert_eq!(simplify(12, 18).unwrap(), frac(2, 3));
        assert_eq!(simplify(-12, -18).unwrap(), frac(2, 3));
    }

    // --- arithmetic ---

    #[test]
    fn test_add_subtract() {
        assert_eq!(frac(1, 2).add(&frac(1, 3)).unwrap(), frac(5, 6));
        assert_eq!(frac(1, 2).subtract(&frac(1, 3)).unwrap(), frac(1, 6));
        assert_eq!(frac(1, 4).subtract(&frac(3, 4)).unwrap(), frac(-1, 2));
        assert_eq!(frac(1, 2).add(&frac(-1, 2)).unwrap(), Fraction::ZERO);
    }

    #[test]
    fn test_multiply_divide() {
        assert_eq!(frac(2, 3).multiply(&frac(3, 4)).unwrap(), frac(1, 2));
        assert_eq!(frac(2, 3).divide(&frac(4, 9)).unwrap(), frac(3, 2));
        assert_eq!(frac(2, 3).divide(&Fraction::ZERO), Err(CalcError::DivisionByZero));
        assert_eq!(Fraction::ZERO.reciprocal(), Err(CalcError::DivisionByZero));
        assert_eq!(frac(-2, 5).reciprocal().unwrap(), frac(-5, 2));
    }

    #[test]
    fn test_overflow_is_error() {
        let big = Fraction::from(i64::MAX);
        assert!(matches!(big.add(&big), Err(CalcError::InvalidInput(_))));
        assert!(matches!(big.multiply(&big), Err(CalcError::InvalidInput(_))));
        // Large intermediates that reduce back into range are fine.
        let a = frac(i64::MAX, 3);
        assert_eq!(a.multiply(&frac(3, i64::MAX)).unwrap(), Fraction::ONE);
    }

    #[test]
    fn test_ordering() {
        assert!(frac(1, 3) < frac(1, 2));
        assert!(frac(-1, 2) < frac(-1, 3));
        assert_eq!(frac(2, 4).cmp(&frac(1, 2)), Ordering::Equal);
    }

    // --- mixed numbers ---

    #[test]
    fn test_mixed_number() {
        let m = frac(7, 2).to_mixed_number().unwrap();
        assert_eq!((m.whole, m.remainder), (3, frac(1, 2)));
        assert_eq!(m.to_string(), "3 1/2");
        assert_eq!(m.to_fraction().unwrap(), frac(7, 2));

        let neg = frac(-11, 4).to_mixed_number().unwrap();
        assert_eq!((neg.whole, neg.remainder), (-2, frac(3, 4)));
        assert_eq!(neg.to_fraction().unwrap(), frac(-11, 4));

        let whole = frac(4, 1).to_mixed_number().unwrap();
        assert_eq!(whole.to_string(), "4");
        assert!(frac(-1, 3).to_mixed_number().is_none());
        assert!(Fraction::ZERO.to_mixed_number().is_none());
    }

    // --- parsing ---

    #[test]
    fn test_parse() {
        assert_eq!("3/4".parse::<Fraction>().unwrap(), frac(3, 4));
        assert_eq!(" -6 / 8 ".parse::<Fraction>().unwrap(), frac(-3, 4));
        assert_eq!("5".parse::<Fraction>().unwrap(), frac(5, 1));
        assert_eq!("2 1/3".parse::<Fraction>().unwrap(), frac(7, 3));
        assert_eq!("-2 1/3".parse::<Fraction>().unwrap(), frac(-7, 3));
        assert_eq!("-0 1/3".parse::<Fraction>().unwrap(), frac(-1, 3));
        assert_eq!("1/0".parse::<Fraction>(), Err(CalcError::DivisionByZero));
        assert!("abc".parse::<Fraction>().is_err());
        assert!("1/2/3".parse::<Fraction>().is_err());
        assert!("2 -1/3".parse::<Fraction>().is_err());
    }

    // --- decimals ---

    #[test]
    fn test_from_decimal() {
        assert_eq!(Fraction::from_decimal(0.5, 10).unwrap(), frac(1, 2));
        assert_eq!(Fraction::from_decimal(-0.125, 1000).unwrap(), frac(-1, 8));
        assert_eq!(Fraction::from_decimal(1.0 / 3.0, 100).unwrap(), frac(1, 3));
        assert_eq!(Fraction::from_decimal(std::f64::consts::PI, 100).unwrap(), frac(311, 99));
        assert_eq!(Fraction::from_decimal(std::f64::consts::PI, 1).unwrap(), frac(3, 1));
        assert_eq!(Fraction::from_decimal(4.0, 7).unwrap(), frac(4, 1));
    }

    #[test]
    fn test_from_decimal_invalid() {
        assert!(Fraction::from_decimal(f64::NAN, 10).is_err());
        assert!(Fraction::from_decimal(1e300, 10).is_err());
        assert!(Fraction::from_decimal(0.5, 0).is_err());
    }

    // --- serde ---

    #[test]
    fn test_serde_revalidates() {
        let json = serde_json::to_string(&frac(-3, 4)).unwrap();
        assert_eq!(json, "[-3,4]");
        let back: Fraction = serde_json::from_str("[6,-8]").unwrap();
        assert_eq!(back, frac(-3, 4));
        assert!(serde_json::from_str::<Fraction>("[1,0]").is_err());
    }
}
