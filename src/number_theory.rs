//! Integer number theory: GCD/LCM, Bézout coefficients, primality,
//! factorization, and sieve-based prime utilities.
//!
//! # Algorithms
//!
//! - **GCD**: iterative Euclid. **Extended GCD**: iterative Bézout with the
//!   full quotient/remainder trace kept for step-by-step display.
//! - **Primality**: trial division below 1000, Miller-Rabin above with the
//!   fixed witness set `{2, 3, 5, 7, 11, 13, 17}`.
//!   Reference: Jaeschke (1993), "On strong pseudoprimes to several bases",
//!   *Mathematics of Computation* 61(204). That witness set is
//!   deterministic for `n < 341_550_071_728_321`
//!   ([`MILLER_RABIN_DETERMINISTIC_BOUND`]); above it [`is_prime`] is a
//!   probabilistic test and may in principle accept a strong pseudoprime.
//! - **Sieve**: Eratosthenes, O(n log log n) time, O(n) space.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Witnesses used by the Miller-Rabin branch of [`is_prime`].
pub const MILLER_RABIN_WITNESSES: [u64; 7] = [2, 3, 5, 7, 11, 13, 17];

/// Below this bound [`MILLER_RABIN_WITNESSES`] give a proof of primality.
pub const MILLER_RABIN_DETERMINISTIC_BOUND: u64 = 341_550_071_728_321;

const TRIAL_DIVISION_BOUND: u64 = 1000;

// ---------------------------------------------------------------------------
// GCD / LCM
// ---------------------------------------------------------------------------

/// Greatest common divisor by the iterative Euclidean algorithm.
///
/// The result is non-negative and `gcd(0, 0) = 0`.
///
/// # Examples
/// ```
/// use u_calc::number_theory::gcd;
/// assert_eq!(gcd(48, 18), 6);
/// assert_eq!(gcd(-48, 18), 6);
/// assert_eq!(gcd(0, 0), 0);
/// ```
pub fn gcd(a: i64, b: i64) -> u64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple, `|a·b| / gcd(a, b)`, with `lcm(0, b) = 0`.
///
/// # Errors
/// [`CalcError::InvalidInput`] if the result does not fit in `u64`.
///
/// # Examples
/// ```
/// use u_calc::number_theory::lcm;
/// assert_eq!(lcm(48, 18).unwrap(), 144);
/// assert_eq!(lcm(0, 7).unwrap(), 0);
/// ```
pub fn lcm(a: i64, b: i64) -> Result<u64> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    // Divide before multiplying.
    (a.unsigned_abs() / gcd(a, b))
        .checked_mul(b.unsigned_abs())
        .ok_or_else(|| overflow("lcm"))
}

/// GCD of a list of positive integers (left fold of [`gcd`]).
///
/// # Errors
/// [`CalcError::InvalidInput`] if the list is empty or holds a value ≤ 0.
pub fn gcd_many(values: &[i64]) -> Result<u64> {
    check_positive_list(values)?;
    Ok(values[1..]
        .iter()
        .fold(values[0].unsigned_abs(), |acc, &v| gcd(acc as i64, v)))
}

/// LCM of a list of positive integers (left fold of [`lcm`]).
///
/// # Errors
/// [`CalcError::InvalidInput`] if the list is empty, holds a value ≤ 0, or
/// the result overflows.
pub fn lcm_many(values: &[i64]) -> Result<u64> {
    check_positive_list(values)?;
    values[1..].iter().try_fold(values[0] as u64, |acc, &v| {
        let g = gcd(v, (acc % v as u64) as i64);
        (acc / g).checked_mul(v as u64).ok_or_else(|| overflow("lcm"))
    })
}

fn check_positive_list(values: &[i64]) -> Result<()> {
    if values.is_empty() {
        return Err(CalcError::InvalidInput("at least one number is required".into()));
    }
    if let Some(v) = values.iter().find(|&&v| v <= 0) {
        return Err(CalcError::InvalidInput(format!(
            "all numbers must be positive, got {v}"
        )));
    }
    Ok(())
}

fn overflow(what: &str) -> CalcError {
    CalcError::InvalidInput(format!("{what} overflows a 64-bit integer"))
}

/// One division `dividend = quotient · divisor + remainder` of the
/// Euclidean algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EuclidStep {
    pub dividend: i64,
    pub divisor: i64,
    pub quotient: i64,
    pub remainder: i64,
}

/// Output of [`extended_gcd`]: `a·x + b·y = gcd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedGcd {
    pub gcd: i64,
    pub x: i64,
    pub y: i64,
    /// Quotient/remainder trace, one entry per division.
    pub steps: Vec<EuclidStep>,
}

/// Extended Euclidean algorithm.
///
/// # Algorithm
/// Maintains triples `(r, s, t)` with `a·s + b·t = r` for the current and
/// previous remainder, replacing the pair with `(r', r − q·r')` until the
/// remainder reaches zero. The last non-zero remainder is the GCD and its
/// coefficients are the Bézout pair. The result is normalized so that
/// `gcd ≥ 0`.
///
/// # Errors
/// [`CalcError::InvalidInput`] if either argument is `i64::MIN`, whose
/// magnitude has no `i64` representation.
///
/// # Examples
/// ```
/// use u_calc::number_theory::extended_gcd;
/// let r = extended_gcd(25, 9).unwrap();
/// assert_eq!((r.gcd, r.x, r.y), (1, 4, -11));
/// assert_eq!(25 * r.x + 9 * r.y, 1);
/// ```
pub fn extended_gcd(a: i64, b: i64) -> Result<ExtendedGcd> {
    if a == i64::MIN || b == i64::MIN {
        return Err(CalcError::InvalidInput("i64::MIN is out of range".into()));
    }
    let (mut old_r, mut r) = (a, b);
    let (mut old_s, mut s) = (1_i64, 0_i64);
    let (mut old_t, mut t) = (0_i64, 1_i64);
    let mut steps = Vec::new();

    while r != 0 {
        let q = old_r / r;
        let rem = old_r - q * r;
        steps.push(EuclidStep {
            dividend: old_r,
            divisor: r,
            quotient: q,
            remainder: rem,
        });
        (old_r, r) = (r, rem);
        (old_s, s) = (s, old_s - q * s);
        (old_t, t) = (t, old_t - q * t);
    }

    if old_r < 0 {
        (old_r, old_s, old_t) = (-old_r, -old_s, -old_t);
    }
    Ok(ExtendedGcd {
        gcd: old_r,
        x: old_s,
        y: old_t,
        steps,
    })
}

// ---------------------------------------------------------------------------
// Primality
// ---------------------------------------------------------------------------

/// Primality test.
///
/// Trial division by odd numbers up to `√n` for `n < 1000`, otherwise
/// Miller-Rabin over [`MILLER_RABIN_WITNESSES`]. The answer is exact below
/// [`MILLER_RABIN_DETERMINISTIC_BOUND`] and probabilistic above it.
///
/// # Examples
/// ```
/// use u_calc::number_theory::is_prime;
/// assert!(is_prime(97));
/// assert!(!is_prime(561));
/// assert!(is_prime(1_000_000_007));
/// ```
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    if n < TRIAL_DIVISION_BOUND {
        let mut d = 3;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 2;
        }
        return true;
    }
    miller_rabin(n, &MILLER_RABIN_WITNESSES)
}

/// Strong probable-prime test of odd `n > 2` against each witness.
fn miller_rabin(n: u64, witnesses: &[u64]) -> bool {
    // n − 1 = d · 2^s with d odd
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    'witness: for &a in witnesses {
        let a = a % n;
        if a == 0 {
            continue;
        }
        let mut x = mod_pow(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mod_mul(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[inline]
fn mod_mul(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn mod_pow(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1 % m;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mod_mul(result, base, m);
        }
        base = mod_mul(base, base, m);
        exp >>= 1;
    }
    result
}

// ---------------------------------------------------------------------------
// Factorization
// ---------------------------------------------------------------------------

/// Prime factorization `number = ∏ prime^power`, primes ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeFactorization {
    pub number: u64,
    pub factors: Vec<(u64, u32)>,
}

impl PrimeFactorization {
    /// `true` when the number is itself prime.
    pub fn is_prime(&self) -> bool {
        matches!(self.factors.as_slice(), [(_, 1)])
    }

    /// Number of positive divisors, `∏ (power + 1)`.
    pub fn divisor_count(&self) -> u64 {
        self.factors.iter().map(|&(_, k)| u64::from(k) + 1).product()
    }
}

impl fmt::Display for PrimeFactorization {
    /// Formats as `2^3 × 3^2 × 5`; `1` for the empty product.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_empty() {
            return write!(f, "1");
        }
        for (i, &(p, k)) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, " × ")?;
            }
            if k == 1 {
                write!(f, "{p}")?;
            } else {
                write!(f, "{p}^{k}")?;
            }
        }
        Ok(())
    }
}

/// Factorizes `n` by trial division.
///
/// # Algorithm
/// Strips factors of 2, then divides by increasing odd `d` while
/// `d² ≤ remaining`. Whatever remains above 1 is prime.
///
/// # Complexity
/// Time: O(√n) divisions in the worst case (n prime).
///
/// # Errors
/// [`CalcError::InvalidInput`] for `n = 0`. `factorize(1)` has no factors.
///
/// # Examples
/// ```
/// use u_calc::number_theory::factorize;
/// let f = factorize(360).unwrap();
/// assert_eq!(f.factors, vec![(2, 3), (3, 2), (5, 1)]);
/// assert_eq!(f.to_string(), "2^3 × 3^2 × 5");
/// ```
pub fn factorize(n: u64) -> Result<PrimeFactorization> {
    if n == 0 {
        return Err(CalcError::InvalidInput("cannot factorize 0".into()));
    }
    let mut factors = Vec::new();
    let mut rest = n;

    let twos = rest.trailing_zeros();
    if twos > 0 {
        factors.push((2, twos));
        rest >>= twos;
    }

    let mut d = 3_u64;
    while d <= rest / d {
        let mut k = 0;
        while rest % d == 0 {
            rest /= d;
            k += 1;
        }
        if k > 0 {
            factors.push((d, k));
        }
        d += 2;
    }
    if rest > 1 {
        factors.push((rest, 1));
    }
    Ok(PrimeFactorization { number: n, factors })
}

/// All positive divisors of `n`, ascending.
///
/// # Errors
/// [`CalcError::InvalidInput`] for `n = 0`.
pub fn divisors(n: u64) -> Result<Vec<u64>> {
    let mut out = vec![1_u64];
    for (p, k) in factorize(n)?.factors {
        let current = out.len();
        let mut pk = 1_u64;
        for _ in 0..k {
            pk *= p;
            for i in 0..current {
                out.push(out[i] * pk);
            }
        }
    }
    out.sort_unstable();
    Ok(out)
}

/// Euler's totient φ(n) = n · ∏ (1 − 1/p).
///
/// # Errors
/// [`CalcError::InvalidInput`] for `n = 0`.
pub fn euler_totient(n: u64) -> Result<u64> {
    Ok(factorize(n)?
        .factors
        .iter()
        .fold(n, |acc, &(p, _)| acc / p * (p - 1)))
}

// ---------------------------------------------------------------------------
// Sieve and derived utilities
// ---------------------------------------------------------------------------

/// `flags[i]` is `true` iff `i` is prime, for `0 ≤ i ≤ limit`.
fn prime_flags(limit: u64) -> Vec<bool> {
    let n = limit as usize;
    let mut flags = vec![true; n + 1];
    flags[0] = false;
    if n >= 1 {
        flags[1] = false;
    }
    let mut i = 2;
    while i * i <= n {
        if flags[i] {
            for multiple in (i * i..=n).step_by(i) {
                flags[multiple] = false;
            }
        }
        i += 1;
    }
    flags
}

/// All primes `≤ limit`, ascending.
///
/// # Complexity
/// Time: O(limit · log log limit), Space: O(limit). Callers bound `limit`
/// (see [`EngineLimits`](crate::config::EngineLimits)).
///
/// # Examples
/// ```
/// use u_calc::number_theory::sieve_of_eratosthenes;
/// assert_eq!(sieve_of_eratosthenes(20), vec![2, 3, 5, 7, 11, 13, 17, 19]);
/// assert!(sieve_of_eratosthenes(1).is_empty());
/// ```
pub fn sieve_of_eratosthenes(limit: u64) -> Vec<u64> {
    prime_flags(limit)
        .iter()
        .enumerate()
        .filter_map(|(i, &p)| p.then_some(i as u64))
        .collect()
}

/// Primes in `[lo, hi]`. Empty when `lo > hi`.
pub fn primes_in_range(lo: u64, hi: u64) -> Vec<u64> {
    if lo > hi {
        return Vec::new();
    }
    sieve_of_eratosthenes(hi).into_iter().filter(|&p| p >= lo).collect()
}

/// The `n`-th prime, 1-based (`nth_prime(1) = 2`).
///
/// Sieves up to Rosser's bound `n·(ln n + ln ln n)`, valid for `n ≥ 6`.
///
/// # Errors
/// [`CalcError::InvalidInput`] for `n = 0`.
pub fn nth_prime(n: u64) -> Result<u64> {
    if n == 0 {
        return Err(CalcError::InvalidInput("n must be at least 1".into()));
    }
    let bound = if n < 6 {
        13
    } else {
        let nf = n as f64;
        (nf * (nf.ln() + nf.ln().ln())).ceil() as u64
    };
    sieve_of_eratosthenes(bound)
        .get((n - 1) as usize)
        .copied()
        .ok_or_else(|| CalcError::InvalidInput(format!("prime #{n} is beyond the sieve bound")))
}

/// Expresses `n` as `base^exponent` with the largest possible exponent ≥ 2.
///
/// Returns `None` for `n < 4` and for numbers that are not perfect powers.
///
/// # Examples
/// ```
/// use u_calc::number_theory::perfect_power;
/// assert_eq!(perfect_power(64), Some((2, 6)));
/// assert_eq!(perfect_power(100), Some((10, 2)));
/// assert_eq!(perfect_power(12), None);
/// ```
pub fn perfect_power(n: u64) -> Option<(u64, u32)> {
    if n < 4 {
        return None;
    }
    let max_exp = 63 - n.leading_zeros(); // ⌊log2 n⌋
    (2..=max_exp).rev().find_map(|k| {
        let guess = (n as f64).powf(1.0 / f64::from(k)).round() as u64;
        // Float roots can be off by one either way.
        [guess.saturating_sub(1), guess, guess + 1]
            .into_iter()
            .find(|&b| b >= 2 && b.checked_pow(k) == Some(n))
            .map(|b| (b, k))
    })
}

/// Twin-prime pairs `(p, p + 2)` with `p + 2 ≤ limit`.
pub fn twin_primes(limit: u64) -> Vec<(u64, u64)> {
    sieve_of_eratosthenes(limit)
        .windows(2)
        .filter(|w| w[1] - w[0] == 2)
        .map(|w| (w[0], w[1]))
        .collect()
}

/// All Goldbach decompositions `n = p + q` with primes `p ≤ q`.
///
/// # Errors
/// [`CalcError::InvalidInput`] unless `n` is even and greater than 2.
///
/// # Examples
/// ```
/// use u_calc::number_theory::goldbach;
/// assert_eq!(goldbach(10).unwrap(), vec![(3, 7), (5, 5)]);
/// ```
pub fn goldbach(n: u64) -> Result<Vec<(u64, u64)>> {
    if n <= 2 || n % 2 != 0 {
        return Err(CalcError::InvalidInput(format!(
            "{n} is not an even number greater than 2"
        )));
    }
    let flags = prime_flags(n);
    Ok((2..=n / 2)
        .filter(|&p| flags[p as usize] && flags[(n - p) as usize])
        .map(|p| (p, n - p))
        .collect())
}

// ---------------------------------------------------------------------------
// Linear Diophantine equations
// ---------------------------------------------------------------------------

/// Integer solutions of `a·x + b·y = c`.
///
/// The general solution is `x = x0 + step_x·t`, `y = y0 − step_y·t` for
/// `t ∈ ℤ`, where `step_x = b/g` and `step_y = a/g`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiophantineSolution {
    pub gcd: i64,
    pub x0: i64,
    pub y0: i64,
    pub step_x: i64,
    pub step_y: i64,
}

impl DiophantineSolution {
    /// The solution for parameter `t`, or `None` on overflow.
    pub fn solution_at(&self, t: i64) -> Option<(i64, i64)> {
        let x = self.x0.checked_add(self.step_x.checked_mul(t)?)?;
        let y = self.y0.checked_sub(self.step_y.checked_mul(t)?)?;
        Some((x, y))
    }
}

/// Solves `a·x + b·y = c` over the integers.
///
/// A solution exists iff `gcd(a, b) | c`; the particular solution is the
/// Bézout pair from [`extended_gcd`] scaled by `c / gcd`.
///
/// # Errors
/// - [`CalcError::InvalidInput`] if `a = b = 0` or a value overflows.
/// - [`CalcError::NoSolution`] if `gcd(a, b)` does not divide `c`.
///
/// # Examples
/// ```
/// use u_calc::number_theory::solve_diophantine;
/// let s = solve_diophantine(3, 5, 7).unwrap();
/// let (x, y) = s.solution_at(4).unwrap();
/// assert_eq!(3 * x + 5 * y, 7);
/// ```
pub fn solve_diophantine(a: i64, b: i64, c: i64) -> Result<DiophantineSolution> {
    if a == 0 && b == 0 {
        return Err(CalcError::InvalidInput("a and b cannot both be zero".into()));
    }
    let eg = extended_gcd(a, b)?;
    let g = eg.gcd;
    if c % g != 0 {
        return Err(CalcError::NoSolution(format!(
            "gcd({a}, {b}) = {g} does not divide {c}"
        )));
    }
    let k = c / g;
    let x0 = eg.x.checked_mul(k).ok_or_else(|| overflow("x0"))?;
    let y0 = eg.y.checked_mul(k).ok_or_else(|| overflow("y0"))?;
    Ok(DiophantineSolution {
        gcd: g,
        x0,
        y0,
        step_x: b / g,
        step_y: a / g,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
