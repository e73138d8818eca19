//! LU factorization with row pivoting and triangular solves.
//!
//! Factorization overwrites a [`SquareMatrix`] with packed factors:
//! the strictly lower part holds the multipliers of `L`
//! (whose unit diagonal is not stored) and the diagonal and
//! upper part hold `U`, such that `P * A = L * U`.
//!
//! The permutation `P` is described by a pivot buffer:
//! `pivots[k]` is the original row now at logical row `k`.
//!
//! ```
//! use pose_matrix::{LuFactorization, SquareMatrix};
//!
//! let a = SquareMatrix::from_rows(&[[2., 1., 1.], [4., 3., 3.], [8., 7., 9.]]).unwrap();
//! let lu = LuFactorization::new(a).unwrap();
//! let x = lu.solve(&[4., 10., 24.]).unwrap();
//! for (xi, expected) in x.iter().zip([1., 1., 1.]) {
//!     assert!((xi - expected).abs() < 1e-12);
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{MatrixError, SquareMatrix};

/// How the pivot row is chosen at each elimination step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotStrategy {
    /// The row whose entry in the pivot column is the
    /// largest by signed value.
    /// Ties keep the row nearest the diagonal.
    #[default]
    Signed,
    /// The row whose entry in the pivot column is the
    /// largest in absolute value.
    Magnitude,
}

impl PivotStrategy {
    fn select(&self, a: &SquareMatrix, k: usize) -> usize {
        let key = |value: f64| match self {
            PivotStrategy::Signed => value,
            PivotStrategy::Magnitude => value.abs(),
        };
        let mut best = key(a[(k, k)]);
        let mut best_row = k;
        for i in k + 1..a.dimension() {
            let candidate = key(a[(i, k)]);
            if candidate > best {
                best = candidate;
                best_row = i;
            }
        }
        best_row
    }
}

fn check_length(expected: usize, got: usize) -> Result<(), MatrixError> {
    if expected == got {
        Ok(())
    } else {
        Err(MatrixError::DimensionMismatch { expected, got })
    }
}

impl SquareMatrix {
    /// Factorize in place using [`PivotStrategy::default`].
    ///
    /// See [`SquareMatrix::factorize_lu_with`].
    pub fn factorize_lu(&mut self, pivots: &mut [usize]) -> Result<(), MatrixError> {
        self.factorize_lu_with(pivots, PivotStrategy::default())
    }

    /// Factorize in place into packed `L` and `U` factors.
    ///
    /// `pivots` must have length equal to the dimension and
    /// receives the row permutation.
    ///
    /// # Errors
    ///
    /// * [`MatrixError::Unallocated`] for an empty matrix.
    /// * [`MatrixError::DimensionMismatch`] if `pivots` has the wrong length.
    /// * [`MatrixError::SingularPivot`] if a pivot is exactly zero.
    ///
    /// The first two errors leave the matrix untouched.
    /// After a singular pivot the matrix is partially factored
    /// and must be refilled before reuse.
    pub fn factorize_lu_with(
        &mut self,
        pivots: &mut [usize],
        strategy: PivotStrategy,
    ) -> Result<(), MatrixError> {
        let n = self.dimension();
        if n == 0 {
            return Err(MatrixError::Unallocated);
        }
        check_length(n, pivots.len())?;

        pivots.iter_mut().enumerate().for_each(|(k, p)| *p = k);

        for k in 0..n {
            let p = strategy.select(self, k);
            pivots.swap(k, p);
            if p != k {
                log::trace!("swapping rows {k} and {p}");
                self.swap_rows(k, p);
            }

            let pivot = self[(k, k)];
            if pivot == 0.0 {
                log::debug!("singular pivot at row {k}, matrix is now:\n{self}");
                return Err(MatrixError::SingularPivot { index: k });
            }

            let (upper, lower) = self.as_mut_slice().split_at_mut((k + 1) * n);
            let pivot_row = &upper[k * n..];
            for row in lower.chunks_exact_mut(n) {
                let multiplier = row[k] / pivot;
                row[k] = multiplier;
                for (a, u) in row[k + 1..].iter_mut().zip(&pivot_row[k + 1..]) {
                    *a -= multiplier * u;
                }
            }
        }
        Ok(())
    }

    /// Solve `A * x = b` using [`PivotStrategy::default`].
    ///
    /// See [`SquareMatrix::solve_lu_with`].
    pub fn solve_lu(&mut self, b: &[f64], x: &mut [f64]) -> Result<(), MatrixError> {
        self.solve_lu_with(b, x, PivotStrategy::default())
    }

    /// Factorize this matrix and solve `A * x = b`.
    ///
    /// The matrix is overwritten by its factors.
    /// To solve against several right-hand sides,
    /// prefer [`LuFactorization`].
    ///
    /// # Errors
    ///
    /// Any error of [`SquareMatrix::factorize_lu_with`], or
    /// [`MatrixError::DimensionMismatch`] if `b` or `x` has the wrong length.
    /// On error, `x` is not written.
    pub fn solve_lu_with(
        &mut self,
        b: &[f64],
        x: &mut [f64],
        strategy: PivotStrategy,
    ) -> Result<(), MatrixError> {
        let n = self.dimension();
        if n == 0 {
            return Err(MatrixError::Unallocated);
        }
        check_length(n, b.len())?;
        check_length(n, x.len())?;
        let mut pivots = vec![0; n];
        self.factorize_lu_with(&mut pivots, strategy)?;
        substitute(self, &pivots, b, x)
    }
}

/// Solve `A * x = b` given the packed factors of `A`.
///
/// `lu` and `pivots` are the outputs of
/// [`SquareMatrix::factorize_lu`].
/// `b` is permuted, then forward and backward
/// substitution give `x`.
///
/// # Errors
///
/// * [`MatrixError::Unallocated`] for an empty matrix.
/// * [`MatrixError::DimensionMismatch`] if any slice length
///   differs from the dimension.
///
/// # Panics
///
/// If `pivots` holds an entry `>= N`.
pub fn substitute(
    lu: &SquareMatrix,
    pivots: &[usize],
    b: &[f64],
    x: &mut [f64],
) -> Result<(), MatrixError> {
    let n = lu.dimension();
    if n == 0 {
        return Err(MatrixError::Unallocated);
    }
    check_length(n, pivots.len())?;
    check_length(n, b.len())?;
    check_length(n, x.len())?;

    let mut y = pivots.iter().map(|&p| b[p]).collect::<Vec<_>>();

    // L * y = P * b
    for i in 1..n {
        let row = lu.row(i);
        let sum: f64 = row[..i].iter().zip(&y[..i]).map(|(l, y)| l * y).sum();
        y[i] -= sum;
    }

    // U * x = y
    for i in (0..n).rev() {
        let row = lu.row(i);
        let sum: f64 = row[i + 1..].iter().zip(&y[i + 1..]).map(|(u, x)| u * x).sum();
        y[i] = (y[i] - sum) / row[i];
    }

    x.copy_from_slice(&y);
    Ok(())
}

/// A factorized matrix that may be used to solve
/// against many right-hand sides.
#[derive(Debug, Clone)]
pub struct LuFactorization {
    lu: SquareMatrix,
    pivots: Vec<usize>,
}

impl LuFactorization {
    /// Factorize `matrix` using [`PivotStrategy::default`].
    pub fn new(matrix: SquareMatrix) -> Result<Self, MatrixError> {
        Self::with_strategy(matrix, PivotStrategy::default())
    }

    /// Factorize `matrix`.
    ///
    /// # Errors
    ///
    /// See [`SquareMatrix::factorize_lu_with`].
    pub fn with_strategy(
        mut matrix: SquareMatrix,
        strategy: PivotStrategy,
    ) -> Result<Self, MatrixError> {
        let mut pivots = vec![0; matrix.dimension()];
        matrix.factorize_lu_with(&mut pivots, strategy)?;
        Ok(Self { lu: matrix, pivots })
    }

    /// Number of unknowns.
    pub fn dimension(&self) -> usize {
        self.lu.dimension()
    }

    /// The row permutation.
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// The packed factors.
    pub fn factors(&self) -> &SquareMatrix {
        &self.lu
    }

    /// Solve `A * x = b`.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>, MatrixError> {
        let mut x = vec![0.0; self.dimension()];
        self.solve_into(b, &mut x)?;
        Ok(x)
    }

    /// Solve `A * x = b`, writing into `x`.
    pub fn solve_into(&self, b: &[f64], x: &mut [f64]) -> Result<(), MatrixError> {
        substitute(&self.lu, &self.pivots, b, x)
    }

    /// The unit lower triangular factor.
    pub fn lower(&self) -> SquareMatrix {
        let mut l = self.lu.clone();
        for (i, row) in l.rows_mut().enumerate() {
            row[i] = 1.0;
            row[i + 1..].fill(0.0);
        }
        l
    }

    /// The upper triangular factor.
    pub fn upper(&self) -> SquareMatrix {
        let mut u = self.lu.clone();
        for (i, row) in u.rows_mut().enumerate() {
            row[..i].fill(0.0);
        }
        u
    }

    /// Apply the row permutation to `a`, giving `P * a`.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] if `a` has a different dimension.
    pub fn permute_rows(&self, a: &SquareMatrix) -> Result<SquareMatrix, MatrixError> {
        check_length(self.dimension(), a.dimension())?;
        let mut permuted = a.clone();
        for (k, &p) in self.pivots.iter().enumerate() {
            permuted.row_mut(k).copy_from_slice(a.row(p));
        }
        Ok(permuted)
    }
}
