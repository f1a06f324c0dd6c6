//! Dense matrix algebra for small calculator-sized matrices.
//!
//! [`Matrix`] is an immutable value: every operation returns a new matrix
//! and never aliases or mutates its operands. Shape errors are reported as
//! [`CalcError::DimensionMismatch`], singular inputs to [`Matrix::inverse`]
//! as [`CalcError::Singular`], so callers can tell the two apart.
//!
//! # Algorithms
//!
//! - **Determinant**: closed form up to 2×2, otherwise Gaussian elimination
//!   with partial pivoting. A pivot below [`SINGULARITY_THRESHOLD`] makes
//!   the determinant exactly `0`.
//! - **Inverse**: closed form up to 2×2, otherwise Gauss-Jordan elimination
//!   on the augmented matrix `[A | I]` with the same pivoting rule.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Pivots with a smaller magnitude are treated as zero.
pub const SINGULARITY_THRESHOLD: f64 = 1e-10;

/// A dense `rows × cols` matrix of `f64`, stored row-major.
///
/// Serializes as a list of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix from row-major data.
    ///
    /// # Errors
    /// - [`CalcError::InvalidInput`] if either dimension is zero or an entry
    ///   is NaN/Inf.
    /// - [`CalcError::DimensionMismatch`] if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        check_dims(rows, cols)?;
        if data.len() != rows * cols {
            return Err(CalcError::DimensionMismatch {
                expected: vec![rows, cols],
                got: vec![data.len()],
            });
        }
        if !data.iter().all(|x| x.is_finite()) {
            return Err(CalcError::InvalidInput("matrix entries must be finite".into()));
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a matrix from a grid of rows.
    ///
    /// # Errors
    /// [`CalcError::DimensionMismatch`] for ragged rows, otherwise as
    /// [`Matrix::new`].
    ///
    /// # Examples
    /// ```
    /// use u_calc::matrix::Matrix;
    /// let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(m.determinant().unwrap(), -2.0);
    /// ```
    pub fn from_rows(grid: Vec<Vec<f64>>) -> Result<Self> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if let Some(bad) = grid.iter().find(|r| r.len() != cols) {
            return Err(CalcError::DimensionMismatch {
                expected: vec![rows, cols],
                got: vec![rows, bad.len()],
            });
        }
        Self::new(rows, cols, grid.into_iter().flatten().collect())
    }

    /// The `rows × cols` zero matrix.
    ///
    /// # Errors
    /// [`CalcError::InvalidInput`] if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        check_dims(rows, cols)?;
        Ok(Self::zeroed(rows, cols))
    }

    /// The `n × n` identity matrix.
    ///
    /// # Errors
    /// [`CalcError::InvalidInput`] if `n = 0`.
    pub fn identity(n: usize) -> Result<Self> {
        check_dims(n, n)?;
        Ok(Self::eye(n))
    }

    fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    fn eye(n: usize) -> Self {
        let mut m = Self::zeroed(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at `(i, j)`, or `None` when out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.rows && j < self.cols).then(|| self.data[i * self.cols + j])
    }

    /// Row `i` as a slice, or `None` when out of bounds.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.rows).then(|| &self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Row-major entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copies the matrix into a grid of rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// Returns `true` if shapes match and every entry differs by at most `tol`.
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tol)
    }

    /// Element-wise sum.
    ///
    /// # Errors
    /// [`CalcError::DimensionMismatch`] unless both shapes are equal.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Element-wise difference.
    ///
    /// # Errors
    /// [`CalcError::DimensionMismatch`] unless both shapes are equal.
    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, |a, b| a - b)
    }

    fn zip_with(&self, other: &Matrix, f: impl Fn(f64, f64) -> f64) -> Result<Matrix> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(CalcError::DimensionMismatch {
                expected: vec![self.rows, self.cols],
                got: vec![other.rows, other.cols],
            });
        }
        let data = self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Matrix product `self · other`.
    ///
    /// # Errors
    /// [`CalcError::DimensionMismatch`] unless `self.cols == other.rows`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(CalcError::DimensionMismatch {
                expected: vec![self.cols, other.cols],
                got: vec![other.rows, other.cols],
            });
        }
        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut out = Matrix::zeroed(m, n);
        for i in 0..m {
            for p in 0..k {
                let a = self.data[i * k + p];
                for j in 0..n {
                    out.data[i * n + j] += a * other.data[p * n + j];
                }
            }
        }
        Ok(out)
    }

    /// Multiplies every entry by `k`.
    pub fn scale(&self, k: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|x| x * k).collect(),
        }
    }

    /// The transpose. Always defined.
    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeroed(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    fn require_square(&self) -> Result<usize> {
        if !self.is_square() {
            return Err(CalcError::DimensionMismatch {
                expected: vec![self.rows, self.rows],
                got: vec![self.rows, self.cols],
            });
        }
        Ok(self.rows)
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> Result<f64> {
        let n = self.require_square()?;
        Ok((0..n).map(|i| self.data[i * n + i]).sum())
    }

    /// Determinant of a square matrix.
    ///
    /// Singular matrices (a pivot below [`SINGULARITY_THRESHOLD`]) report
    /// exactly `0.0`.
    ///
    /// # Errors
    /// [`CalcError::DimensionMismatch`] if the matrix is not square.
    pub fn determinant(&self) -> Result<f64> {
        let n = self.require_square()?;
        let a = &self.data;
        match n {
            1 => return Ok(a[0]),
            2 => return Ok(a[0] * a[3] - a[1] * a[2]),
            _ => {}
        }

        let mut lu = a.clone();
        let mut det = 1.0;
        for k in 0..n {
            let p = pivot_row(&lu, n, n, k, k);
            if lu[p * n + k].abs() < SINGULARITY_THRESHOLD {
                return Ok(0.0);
            }
            if p != k {
                swap_rows(&mut lu, n, k, p);
                det = -det;
            }
            let pivot = lu[k * n + k];
            det *= pivot;
            for i in (k + 1)..n {
                let factor = lu[i * n + k] / pivot;
                for j in k..n {
                    let ukj = lu[k * n + j];
                    lu[i * n + j] -= factor * ukj;
                }
            }
        }
        Ok(det)
    }

    /// Inverse of a square matrix.
    ///
    /// # Errors
    /// - [`CalcError::DimensionMismatch`] if the matrix is not square.
    /// - [`CalcError::Singular`] if a pivot (or the 1×1/2×2 determinant)
    ///   falls below [`SINGULARITY_THRESHOLD`].
    ///
    /// # Examples
    /// ```
    /// use u_calc::matrix::Matrix;
    /// let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// let inv = a.inverse().unwrap();
    /// let expected = Matrix::from_rows(vec![vec![-2.0, 1.0], vec![1.5, -0.5]]).unwrap();
    /// assert!(inv.approx_eq(&expected, 1e-12));
    /// ```
    pub fn inverse(&self) -> Result<Matrix> {
        let n = self.require_square()?;
        let a = &self.data;
        match n {
            1 => {
                if a[0].abs() < SINGULARITY_THRESHOLD {
                    return Err(CalcError::Singular);
                }
                return Matrix::new(1, 1, vec![1.0 / a[0]]);
            }
            2 => {
                let det = a[0] * a[3] - a[1] * a[2];
                if det.abs() < SINGULARITY_THRESHOLD {
                    return Err(CalcError::Singular);
                }
                return Matrix::new(
                    2,
                    2,
                    vec![a[3] / det, -a[1] / det, -a[2] / det, a[0] / det],
                );
            }
            _ => {}
        }

        // Augmented [A | I], 2n columns wide.
        let w = 2 * n;
        let mut aug = vec![0.0; n * w];
        for i in 0..n {
            aug[i * w..i * w + n].copy_from_slice(&a[i * n..(i + 1) * n]);
            aug[i * w + n + i] = 1.0;
        }

        for k in 0..n {
            let p = pivot_row(&aug, n, w, k, k);
            if aug[p * w + k].abs() < SINGULARITY_THRESHOLD {
                return Err(CalcError::Singular);
            }
            swap_rows(&mut aug, w, k, p);

            let pivot = aug[k * w + k];
            for j in 0..w {
                aug[k * w + j] /= pivot;
            }
            for i in 0..n {
                if i == k {
                    continue;
                }
                let factor = aug[i * w + k];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..w {
                    let akj = aug[k * w + j];
                    aug[i * w + j] -= factor * akj;
                }
            }
        }

        let data = (0..n)
            .flat_map(|i| aug[i * w + n..(i + 1) * w].iter().copied())
            .collect();
        Ok(Matrix {
            rows: n,
            cols: n,
            data,
        })
    }

    /// Number of linearly independent rows, using the same pivot threshold
    /// as the determinant.
    pub fn rank(&self) -> usize {
        let (m, n) = (self.rows, self.cols);
        let mut a = self.data.clone();
        let mut rank = 0;
        for c in 0..n {
            if rank == m {
                break;
            }
            let p = pivot_row(&a, m, n, rank, c);
            if a[p * n + c].abs() < SINGULARITY_THRESHOLD {
                continue;
            }
            swap_rows(&mut a, n, rank, p);
            let pivot = a[rank * n + c];
            for i in (rank + 1)..m {
                let factor = a[i * n + c] / pivot;
                for j in c..n {
                    let arj = a[rank * n + j];
                    a[i * n + j] -= factor * arj;
                }
            }
            rank += 1;
        }
        rank
    }

    /// `self` multiplied by itself `exp` times; `power(0)` is the identity.
    ///
    /// # Errors
    /// [`CalcError::DimensionMismatch`] if the matrix is not square.
    pub fn power(&self, exp: u32) -> Result<Matrix> {
        let n = self.require_square()?;
        let mut result = Matrix::eye(n);
        let mut base = self.clone();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.multiply(&base)?;
            }
            e >>= 1;
            if e > 0 {
                base = base.multiply(&base)?;
            }
        }
        Ok(result)
    }
}

/// Row in `from..rows` with the largest `|a[row, col]|`.
fn pivot_row(a: &[f64], rows: usize, width: usize, from: usize, col: usize) -> usize {
    let mut best = from;
    let mut best_val = a[from * width + col].abs();
    for i in (from + 1)..rows {
        let v = a[i * width + col].abs();
        if v > best_val {
            best_val = v;
            best = i;
        }
    }
    best
}

fn swap_rows(a: &mut [f64], width: usize, r1: usize, r2: usize) {
    if r1 != r2 {
        for j in 0..width {
            a.swap(r1 * width + j, r2 * width + j);
        }
    }
}

fn check_dims(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(CalcError::InvalidInput(
            "matrix must have at least one row and one column".into(),
        ));
    }
    Ok(())
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = CalcError;

    fn try_from(grid: Vec<Vec<f64>>) -> Result<Self> {
        Matrix::from_rows(grid)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        m.to_rows()
    }
}
