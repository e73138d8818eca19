//! C API to [`pose_matrix`].
//!
//! A host application allocates an [`OpaqueSquareMatrix`],
//! fills in the coefficients, factorizes once and then
//! solves against as many right-hand sides as needed.
//!
//! # Return values
//!
//! Functions returning `i32` return `0` on success.
//! A negative value is an error:
//!
//! * `-1`: the operation failed. A message is available from
//!   [`square_matrix_get_error_message`] for functions taking
//!   a `*mut` handle.
//! * `-2`: the handle is NULL.
//! * `-3`: the matrix has not been factorized.

use libc::c_char;
use pose_matrix::{MatrixError, SquareMatrix};
use std::ffi::CString;

/// ## Not Send/Sync
///
/// This type is meant to be used in an FFI context.
/// We therefore deny Send/Sync:
///
/// ```compile_fail
/// fn is_send<T: Send>()  {}
///
/// is_send::<pose_matrix_capi::OpaqueSquareMatrix>();
/// ```
///
/// ```compile_fail
/// fn is_sync<T: Sync>()  {}
///
/// is_sync::<pose_matrix_capi::OpaqueSquareMatrix>();
/// ```
pub struct OpaqueSquareMatrix {
    matrix: SquareMatrix,
    // Set by a successful factorization and
    // cleared by anything writing to the matrix.
    pivots: Option<Vec<usize>>,
    error: Option<CString>,
    // Rust types containing raw pointers
    // do not get blanket Send/Sync impl.
    // We use a ZST here to prevent those impl
    // for this type.
    deny_send_sync: std::marker::PhantomData<*const ()>,
}

#[repr(i32)]
enum ErrorCode {
    OperationFailed = -1,
    MatrixIsNull = -2,
    NotFactorized = -3,
}

impl OpaqueSquareMatrix {
    fn update_error(&mut self, error: Option<String>) {
        self.error = error.and_then(|e| {
            log::debug!("pose-matrix-capi: {e}");
            CString::new(
                e.chars()
                    .filter(|c| c.is_ascii() && c != &'"' && c != &'\0')
                    .collect::<String>(),
            )
            .ok()
        });
    }

    fn record<T>(&mut self, result: Result<T, MatrixError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.update_error(None);
                Some(value)
            }
            Err(e) => {
                self.update_error(Some(format!("{e}")));
                None
            }
        }
    }

    fn status<T>(&mut self, result: Result<T, MatrixError>) -> i32 {
        match self.record(result) {
            Some(_) => 0,
            None => ErrorCode::OperationFailed as i32,
        }
    }

    fn matrix_mut(&mut self) -> &mut SquareMatrix {
        self.pivots = None;
        &mut self.matrix
    }

    fn check_index(&self, row: usize, column: usize) -> Result<(), String> {
        let n = self.matrix.dimension();
        if row < n && column < n {
            Ok(())
        } else {
            Err(format!(
                "index ({row}, {column}) out of range for a {n}x{n} matrix"
            ))
        }
    }
}

/// Allocate an empty [`OpaqueSquareMatrix`]
///
/// # Panics
///
/// This function will panic if the pointer allocation fails.
///
/// # Safety
///
/// The pointer is returned by leaking a [`Box`].
/// The pointer is managed by rust and is freed by [`square_matrix_deallocate`].
#[no_mangle]
pub extern "C" fn square_matrix_allocate() -> *mut OpaqueSquareMatrix {
    Box::into_raw(Box::new(OpaqueSquareMatrix {
        matrix: SquareMatrix::new(),
        pivots: None,
        error: None,
        deny_send_sync: std::marker::PhantomData,
    }))
}

/// # Safety
///
/// `matrix` must be NULL or a pointer returned by [`square_matrix_allocate`]
/// that has not already been deallocated.
#[no_mangle]
pub unsafe extern "C" fn square_matrix_deallocate(matrix: *mut OpaqueSquareMatrix) {
    if !matrix.is_null() {
        let _ = Box::from_raw(matrix);
    }
}

/// Allocate storage for a `dimension x dimension` matrix,
/// set to the identity.
///
/// Previous contents are discarded.
///
/// # Return values
///
/// The new dimension, or 0 on error.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_set_dimension(
    matrix: *mut OpaqueSquareMatrix,
    dimension: usize,
) -> usize {
    if matrix.is_null() {
        return 0;
    }
    let result = (*matrix).matrix_mut().set_dimension(dimension);
    (*matrix).record(result).unwrap_or(0)
}

/// Release the storage of the matrix.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_free(matrix: *mut OpaqueSquareMatrix) -> i32 {
    if matrix.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    (*matrix).matrix_mut().free();
    0
}

/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_dimension(
    matrix: *const OpaqueSquareMatrix,
    status: *mut i32,
) -> usize {
    *status = 0;
    if matrix.is_null() {
        *status = ErrorCode::MatrixIsNull as i32;
        return 0;
    }
    (*matrix).matrix.dimension()
}

/// Set every entry to `value`.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_fill(matrix: *mut OpaqueSquareMatrix, value: f64) -> i32 {
    if matrix.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    (*matrix).matrix_mut().fill(value);
    0
}

/// Set the matrix to the identity.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_identity(matrix: *mut OpaqueSquareMatrix) -> i32 {
    if matrix.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    (*matrix).matrix_mut().identity();
    0
}

/// Set entry `(row, column)`.
///
/// # Errors
///
/// If `row` or `column` is out of range.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_set(
    matrix: *mut OpaqueSquareMatrix,
    row: usize,
    column: usize,
    value: f64,
) -> i32 {
    if matrix.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    match (*matrix).check_index(row, column) {
        Ok(()) => {
            (*matrix).matrix_mut().set(row, column, value);
            0
        }
        Err(e) => {
            (*matrix).update_error(Some(e));
            ErrorCode::OperationFailed as i32
        }
    }
}

/// Get entry `(row, column)`.
///
/// Returns NaN and sets `status` to -1 if the
/// index is out of range.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_get(
    matrix: *const OpaqueSquareMatrix,
    row: usize,
    column: usize,
    status: *mut i32,
) -> f64 {
    *status = 0;
    if matrix.is_null() {
        *status = ErrorCode::MatrixIsNull as i32;
        return f64::NAN;
    }
    match (*matrix).check_index(row, column) {
        Ok(()) => (*matrix).matrix.get(row, column),
        Err(_) => {
            *status = ErrorCode::OperationFailed as i32;
            f64::NAN
        }
    }
}

/// Pointer to the first element of the row-major buffer.
///
/// The length of the buffer is the square of
/// [`square_matrix_dimension`].
/// Returns NULL for an empty matrix.
///
/// # Safety
///
/// `matrix` must be a valid pointer.
/// The returned pointer is invalidated by any call
/// that reallocates the matrix.
#[no_mangle]
pub unsafe extern "C" fn square_matrix_data(
    matrix: *const OpaqueSquareMatrix,
    status: *mut i32,
) -> *const f64 {
    *status = 0;
    if matrix.is_null() {
        *status = ErrorCode::MatrixIsNull as i32;
        return std::ptr::null();
    }
    let m = &(*matrix).matrix;
    if m.is_empty() {
        std::ptr::null()
    } else {
        m.as_slice().as_ptr()
    }
}

/// Mutable pointer to the first element of the row-major buffer.
///
/// Calling this function discards any factorization.
///
/// # Safety
///
/// See [`square_matrix_data`].
#[no_mangle]
pub unsafe extern "C" fn square_matrix_data_mut(
    matrix: *mut OpaqueSquareMatrix,
    status: *mut i32,
) -> *mut f64 {
    *status = 0;
    if matrix.is_null() {
        *status = ErrorCode::MatrixIsNull as i32;
        return std::ptr::null_mut();
    }
    let m = (*matrix).matrix_mut();
    if m.is_empty() {
        std::ptr::null_mut()
    } else {
        m.as_mut_slice().as_mut_ptr()
    }
}

/// Deep copy `source` into `dest`.
///
/// # Safety
///
/// Both pointers must be valid.
#[no_mangle]
pub unsafe extern "C" fn square_matrix_assign(
    dest: *mut OpaqueSquareMatrix,
    source: *const OpaqueSquareMatrix,
) -> i32 {
    if dest.is_null() || source.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    if std::ptr::eq(dest, source) {
        return 0;
    }
    let source = &(*source).matrix;
    let result = (*dest).matrix_mut().assign(source);
    (*dest).status(result)
}

/// Factorize the matrix in place into packed LU factors.
///
/// After success, [`square_matrix_solve_factored`] may be
/// called any number of times.
/// After failure, the matrix is partially factored and must
/// be refilled before reuse.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_factorize_lu(matrix: *mut OpaqueSquareMatrix) -> i32 {
    if matrix.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    let m = (*matrix).matrix_mut();
    let mut pivots = vec![0; m.dimension()];
    let result = m.factorize_lu(&mut pivots);
    match (*matrix).record(result) {
        Some(()) => {
            (*matrix).pivots = Some(pivots);
            0
        }
        None => ErrorCode::OperationFailed as i32,
    }
}

/// `true` if the matrix holds a valid factorization.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_is_factorized(
    matrix: *const OpaqueSquareMatrix,
    status: *mut i32,
) -> bool {
    *status = 0;
    if matrix.is_null() {
        *status = ErrorCode::MatrixIsNull as i32;
        return false;
    }
    (*matrix).pivots.is_some()
}

/// Pointer to the first element of the row permutation.
///
/// The length of the array is equal to [`square_matrix_dimension`].
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_pivots(
    matrix: *const OpaqueSquareMatrix,
    status: *mut i32,
) -> *const usize {
    *status = 0;
    if matrix.is_null() {
        *status = ErrorCode::MatrixIsNull as i32;
        return std::ptr::null();
    }
    match &(*matrix).pivots {
        Some(pivots) => pivots.as_ptr(),
        None => {
            *status = ErrorCode::NotFactorized as i32;
            std::ptr::null()
        }
    }
}

/// Solve `A * x = b` using the factorization from
/// [`square_matrix_factorize_lu`].
///
/// # Safety
///
/// * `matrix` must be a valid pointer
/// * `b` and `x` must point to arrays of `length` elements.
#[no_mangle]
pub unsafe extern "C" fn square_matrix_solve_factored(
    matrix: *mut OpaqueSquareMatrix,
    b: *const f64,
    x: *mut f64,
    length: usize,
) -> i32 {
    if matrix.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    if b.is_null() || x.is_null() {
        (*matrix).update_error(Some("right-hand side or solution is NULL".to_string()));
        return ErrorCode::OperationFailed as i32;
    }
    let rhs = std::slice::from_raw_parts(b, length).to_vec();
    let solution = std::slice::from_raw_parts_mut(x, length);
    let result = match &(*matrix).pivots {
        Some(pivots) => pose_matrix::substitute(&(*matrix).matrix, pivots, &rhs, solution),
        None => return ErrorCode::NotFactorized as i32,
    };
    (*matrix).status(result)
}

/// Factorize the matrix and solve `A * x = b`.
///
/// If the matrix already holds a factorization, it is
/// reused and the matrix is not factorized again.
/// The factorization is kept, so further right-hand sides
/// may be solved with this function or with
/// [`square_matrix_solve_factored`].
///
/// # Safety
///
/// * `matrix` must be a valid pointer
/// * `b` and `x` must point to arrays of `length` elements.
#[no_mangle]
pub unsafe extern "C" fn square_matrix_solve_lu(
    matrix: *mut OpaqueSquareMatrix,
    b: *const f64,
    x: *mut f64,
    length: usize,
) -> i32 {
    if matrix.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    let n = (*matrix).matrix.dimension();
    if length != n {
        (*matrix).update_error(Some(format!(
            "{}",
            MatrixError::DimensionMismatch {
                expected: n,
                got: length
            }
        )));
        return ErrorCode::OperationFailed as i32;
    }
    // The matrix now holds packed factors, not the coefficients.
    if (*matrix).pivots.is_none() {
        let rv = square_matrix_factorize_lu(matrix);
        if rv != 0 {
            return rv;
        }
    }
    square_matrix_solve_factored(matrix, b, x, length)
}

/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_is_error_state(matrix: *const OpaqueSquareMatrix) -> bool {
    matrix.is_null() || (*matrix).error.is_some()
}

/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn square_matrix_get_error_message(
    matrix: *const OpaqueSquareMatrix,
    status: *mut i32,
) -> *const c_char {
    *status = 0;
    if !matrix.is_null() {
        match &(*matrix).error {
            Some(message) => message.as_ptr(),
            None => std::ptr::null(),
        }
    } else {
        *status = ErrorCode::MatrixIsNull as i32;
        std::ptr::null()
    }
}
