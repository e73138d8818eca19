use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::MatrixError;

/// A dense `N x N` matrix of [`f64`].
///
/// Entries are stored contiguously in row-major order,
/// so that entry `(i, j)` lives at flat index `i * N + j`
/// of [`SquareMatrix::as_slice`].
///
/// A new matrix is empty (dimension 0) and becomes usable
/// through [`SquareMatrix::set_dimension`], which also
/// resets it to the identity.
///
/// # Indexing
///
/// Rows are available as slices, which gives two-level
/// indexing `m[i][j]`. A `(row, column)` tuple indexes
/// a single entry.
///
/// ```
/// let mut m = pose_matrix::SquareMatrix::with_dimension(3).unwrap();
/// m[1][2] = 5.0;
/// assert_eq!(m[(1, 2)], 5.0);
/// assert_eq!(m.as_slice()[5], 5.0);
/// ```
///
/// # Panics
///
/// Indexing a row `i >= N` panics.
/// A column index `j >= N` is a caller error: it is only
/// checked in debug builds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct SquareMatrix {
    data: Vec<f64>,
    nrows: usize,
}

impl SquareMatrix {
    /// An empty (unallocated) matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a matrix of dimension `nrows`, set to the identity.
    ///
    /// # Errors
    ///
    /// See [`SquareMatrix::set_dimension`].
    pub fn with_dimension(nrows: usize) -> Result<Self, MatrixError> {
        let mut matrix = Self::new();
        matrix.set_dimension(nrows)?;
        Ok(matrix)
    }

    /// Build a matrix from its rows.
    ///
    /// An empty input gives an empty matrix.
    ///
    /// # Errors
    ///
    /// [`MatrixError::NotSquare`] if any row length differs
    /// from the number of rows.
    ///
    /// ```
    /// let m = pose_matrix::SquareMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// assert_eq!(m.dimension(), 2);
    /// assert_eq!(m[1][0], 3.0);
    /// assert!(pose_matrix::SquareMatrix::from_rows(&[vec![1.0, 2.0]]).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let nrows = rows.len();
        if nrows == 0 {
            return Ok(Self::new());
        }
        let mut matrix = Self::with_dimension(nrows)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != nrows {
                return Err(MatrixError::NotSquare {
                    row: i,
                    expected: nrows,
                    got: row.len(),
                });
            }
            matrix.row_mut(i).copy_from_slice(row);
        }
        Ok(matrix)
    }

    /// Reallocate to dimension `nrows`.
    ///
    /// Any previous contents are discarded and the
    /// matrix is reset to the identity.
    /// Returns the new dimension.
    ///
    /// # Errors
    ///
    /// * [`MatrixError::ZeroDimension`] if `nrows == 0`.
    /// * [`MatrixError::AllocationFailure`] if the buffer
    ///   cannot be obtained.
    ///
    /// In both cases the matrix is left empty.
    pub fn set_dimension(&mut self, nrows: usize) -> Result<usize, MatrixError> {
        self.free();
        if nrows == 0 {
            return Err(MatrixError::ZeroDimension);
        }
        let total = nrows
            .checked_mul(nrows)
            .ok_or(MatrixError::AllocationFailure { dimension: nrows })?;
        let mut data = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|_| MatrixError::AllocationFailure { dimension: nrows })?;
        data.resize(total, 0.0);
        self.data = data;
        self.nrows = nrows;
        self.identity();
        Ok(self.nrows)
    }

    /// Release the storage. The matrix becomes empty.
    pub fn free(&mut self) {
        self.data = Vec::new();
        self.nrows = 0;
    }

    /// The dimension `N` of this `N x N` matrix.
    pub fn dimension(&self) -> usize {
        self.nrows
    }

    /// `true` if the matrix holds no storage.
    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    /// Set every entry to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value)
    }

    /// Set to the identity matrix.
    pub fn identity(&mut self) {
        for (i, row) in self.rows_mut().enumerate() {
            row.fill(0.0);
            row[i] = 1.0;
        }
    }

    /// Flat index of entry `(row, column)`.
    pub fn flat_index(&self, row: usize, column: usize) -> usize {
        debug_assert!(column < self.nrows, "column {column} >= {}", self.nrows);
        row * self.nrows + column
    }

    /// Value of entry `(row, column)`.
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.data[self.flat_index(row, column)]
    }

    /// Mutable reference to entry `(row, column)`.
    pub fn element_mut(&mut self, row: usize, column: usize) -> &mut f64 {
        let idx = self.flat_index(row, column);
        &mut self.data[idx]
    }

    /// Set entry `(row, column)` to `value`.
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        *self.element_mut(row, column) = value;
    }

    /// Row `row` as a slice of length `N`.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.nrows;
        let end = start + self.nrows;
        &self.data[start..end]
    }

    /// Mutable view of row `row`.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.nrows;
        let end = start + self.nrows;
        &mut self.data[start..end]
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.nrows.max(1))
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut [f64]> + '_ {
        self.data.chunks_exact_mut(self.nrows.max(1))
    }

    /// Exchange the contents of two rows.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let n = self.nrows;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.data.split_at_mut(hi * n);
        head[lo * n..(lo + 1) * n].swap_with_slice(&mut tail[..n]);
    }

    /// Deep copy of `other` into `self`.
    ///
    /// `self` is reallocated to the dimension of `other`
    /// before the entries are copied.
    ///
    /// # Errors
    ///
    /// [`MatrixError::AllocationFailure`] if the buffer
    /// cannot be obtained.
    pub fn assign(&mut self, other: &SquareMatrix) -> Result<(), MatrixError> {
        if other.is_empty() {
            self.free();
            return Ok(());
        }
        self.set_dimension(other.nrows)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// The row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The row-major buffer.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Compute `A * v`.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] if `v.len() != N`.
    pub fn mul_vec(&self, v: &[f64]) -> Result<Vec<f64>, MatrixError> {
        if v.len() != self.nrows {
            return Err(MatrixError::DimensionMismatch {
                expected: self.nrows,
                got: v.len(),
            });
        }
        Ok(self
            .rows()
            .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }
}

impl Index<usize> for SquareMatrix {
    type Output = [f64];

    fn index(&self, row: usize) -> &Self::Output {
        self.row(row)
    }
}

impl IndexMut<usize> for SquareMatrix {
    fn index_mut(&mut self, row: usize) -> &mut Self::Output {
        self.row_mut(row)
    }
}

impl Index<(usize, usize)> for SquareMatrix {
    type Output = f64;

    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        &self.data[self.flat_index(row, column)]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut Self::Output {
        self.element_mut(row, column)
    }
}

impl TryFrom<Vec<Vec<f64>>> for SquareMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<SquareMatrix> for Vec<Vec<f64>> {
    fn from(matrix: SquareMatrix) -> Self {
        matrix.rows().map(|row| row.to_vec()).collect()
    }
}

impl std::fmt::Display for SquareMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SquareMatrix {}x{}", self.nrows, self.nrows)?;
        for (i, row) in self.rows().enumerate() {
            write!(f, "ROW_{i}=")?;
            for value in row {
                write!(f, " {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
