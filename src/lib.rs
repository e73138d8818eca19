//! # Dense square matrices and LU solves.
//!
//! This crate provides [`SquareMatrix`], an owned `N x N`
//! row-major matrix of [`f64`], together with an LU
//! factorization with row pivoting used to solve
//! `A * x = b`.
//! Pose-space deformers use it to compute interpolation
//! weights from a kernel matrix built out of pose distances.
//!
//! ```
//! use pose_matrix::SquareMatrix;
//!
//! let mut a = SquareMatrix::from_rows(&[[2., 1.], [1., 3.]]).unwrap();
//! let mut x = [0.0; 2];
//! a.solve_lu(&[3., 5.], &mut x).unwrap();
//! assert!((x[0] - 0.8).abs() < 1e-12);
//! assert!((x[1] - 1.4).abs() < 1e-12);
//! ```
//!
//! Systems may also be read from `YAML`, see [`LinearSystem`].

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![cfg_attr(doc_cfg, feature(doc_cfg))]

mod error;
mod lu;
mod square_matrix;
mod system;

pub use error::MatrixError;
pub use lu::{substitute, LuFactorization, PivotStrategy};
pub use square_matrix::SquareMatrix;
pub use system::LinearSystem;

/// Load a [`LinearSystem`] from a YAML string.
///
/// # Errors
///
/// Returns [`MatrixError`] if the input is not valid YAML
/// or does not describe a valid system.
pub fn loads(yaml: &str) -> Result<LinearSystem, MatrixError> {
    LinearSystem::new_from_str(yaml)
}

/// Load a [`LinearSystem`] from a YAML reader.
///
/// # Errors
///
/// See [`loads`].
pub fn load<T: std::io::Read>(reader: T) -> Result<LinearSystem, MatrixError> {
    LinearSystem::new_from_reader(reader)
}

/// Load a [`LinearSystem`] from a JSON string.
///
/// # Errors
///
/// Returns [`MatrixError`] if the input is not valid JSON
/// or does not describe a valid system.
#[cfg(feature = "json")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
pub fn loads_json(json: &str) -> Result<LinearSystem, MatrixError> {
    LinearSystem::new_from_json_str(json)
}

/// Load a [`LinearSystem`] from a JSON reader.
///
/// # Errors
///
/// See [`loads_json`].
#[cfg(feature = "json")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
pub fn load_json<T: std::io::Read>(reader: T) -> Result<LinearSystem, MatrixError> {
    LinearSystem::new_from_json_reader(reader)
}
