use pose_matrix_capi::*;

#[test]
fn test_errors_with_unallocated_matrix() {
    let matrix = square_matrix_allocate();

    let rv = unsafe { square_matrix_factorize_lu(matrix) };
    assert!(rv < 0);
    assert!(unsafe { square_matrix_is_error_state(matrix) });

    let mut x = [0.0; 1];
    let rv = unsafe { square_matrix_solve_lu(matrix, [1.0].as_ptr(), x.as_mut_ptr(), 1) };
    assert!(rv < 0);

    let rv = unsafe { square_matrix_set(matrix, 0, 0, 1.0) };
    assert!(rv < 0);

    let mut status = 0;
    let _ = unsafe { square_matrix_get(matrix as *const OpaqueSquareMatrix, 0, 0, &mut status) };
    assert!(status < 0);

    unsafe {
        square_matrix_deallocate(matrix);
    }
}

#[test]
fn test_errors_const_api_with_unfactorized_matrix() {
    let matrix = square_matrix_allocate();
    unsafe { square_matrix_set_dimension(matrix, 3) };

    let mut status = 0;
    let pivots = unsafe { square_matrix_pivots(matrix as *const OpaqueSquareMatrix, &mut status) };
    assert!(status < 0);
    assert!(pivots.is_null());

    let mut x = [0.0; 3];
    let rv = unsafe { square_matrix_solve_factored(matrix, [1.0; 3].as_ptr(), x.as_mut_ptr(), 3) };
    assert!(rv < 0);

    unsafe {
        square_matrix_deallocate(matrix);
    }
}

#[test]
fn test_null_rhs() {
    let matrix = square_matrix_allocate();
    unsafe { square_matrix_set_dimension(matrix, 2) };
    let mut x = [0.0; 2];
    let rv = unsafe { square_matrix_solve_lu(matrix, std::ptr::null(), x.as_mut_ptr(), 2) };
    assert!(rv < 0);
    assert!(unsafe { square_matrix_is_error_state(matrix) });
    unsafe {
        square_matrix_deallocate(matrix);
    }
}

#[test]
fn test_deallocate_null() {
    unsafe { square_matrix_deallocate(std::ptr::null_mut()) };
}

#[test]
fn test_null_is_error_state() {
    assert!(unsafe { square_matrix_is_error_state(std::ptr::null()) });
}

// Test that fns expecting *const OpaqueSquareMatrix
// Return an error if the pointer is null
macro_rules! make_test_of_const_api_with_null {
    ($name: ident, $function: ident) => {
        #[test]
        fn $name() {
            let mut status = 0;
            unsafe {
                $function(std::ptr::null() as *const OpaqueSquareMatrix, &mut status);
            }
            assert!(status < 0);
        }
    };
}

make_test_of_const_api_with_null!(test_ub_dimension, square_matrix_dimension);
make_test_of_const_api_with_null!(test_ub_data, square_matrix_data);
make_test_of_const_api_with_null!(test_ub_pivots, square_matrix_pivots);
make_test_of_const_api_with_null!(test_ub_is_factorized, square_matrix_is_factorized);
make_test_of_const_api_with_null!(test_ub_get_error_message, square_matrix_get_error_message);

// Same for fns expecting *mut OpaqueSquareMatrix
// and returning a status code.
macro_rules! make_test_of_mut_api_with_null {
    ($name: ident, $function: ident) => {
        #[test]
        fn $name() {
            let rv = unsafe { $function(std::ptr::null_mut()) };
            assert_eq!(rv, -2);
        }
    };
}

make_test_of_mut_api_with_null!(test_ub_free, square_matrix_free);
make_test_of_mut_api_with_null!(test_ub_identity, square_matrix_identity);
make_test_of_mut_api_with_null!(test_ub_factorize_lu, square_matrix_factorize_lu);

#[test]
fn test_ub_set_dimension() {
    assert_eq!(
        unsafe { square_matrix_set_dimension(std::ptr::null_mut(), 3) },
        0
    );
}

#[test]
fn test_ub_get() {
    let mut status = 0;
    let value = unsafe { square_matrix_get(std::ptr::null(), 0, 0, &mut status) };
    assert_eq!(status, -2);
    assert!(value.is_nan());
}

#[test]
fn test_ub_assign() {
    let matrix = square_matrix_allocate();
    assert_eq!(
        unsafe { square_matrix_assign(matrix, std::ptr::null()) },
        -2
    );
    assert_eq!(
        unsafe { square_matrix_assign(std::ptr::null_mut(), matrix) },
        -2
    );
    unsafe {
        square_matrix_deallocate(matrix);
    }
}

#[test]
fn test_ub_solve() {
    let b = [1.0];
    let mut x = [0.0];
    assert_eq!(
        unsafe { square_matrix_solve_lu(std::ptr::null_mut(), b.as_ptr(), x.as_mut_ptr(), 1) },
        -2
    );
    assert_eq!(
        unsafe {
            square_matrix_solve_factored(std::ptr::null_mut(), b.as_ptr(), x.as_mut_ptr(), 1)
        },
        -2
    );
}
