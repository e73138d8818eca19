use serde::{Deserialize, Serialize};

use crate::{LuFactorization, MatrixError, PivotStrategy, SquareMatrix};

/// A linear system `A * x = b` with one or more right-hand sides.
///
/// # Examples
///
/// ## In `YAML` input
///
/// ```
/// let yaml = "
/// description: three unknowns, two right-hand sides
/// coefficients:
///   - [2, 1, 1]
///   - [4, 3, 3]
///   - [8, 7, 9]
/// rhs:
///   - [4, 10, 24]
///   - [4, 10, 26]
/// ";
/// let system = pose_matrix::loads(yaml).unwrap();
/// assert_eq!(system.dimension(), 3);
/// let solutions = system.solve().unwrap();
/// assert_eq!(solutions.len(), 2);
/// ```
///
/// The `pivoting` field selects a [`PivotStrategy`]:
///
/// ```
/// let yaml = "
/// coefficients: [[1, 2], [-3, 4]]
/// rhs: [[5, 5]]
/// pivoting: magnitude
/// ";
/// let system = pose_matrix::loads(yaml).unwrap();
/// assert_eq!(system.pivoting(), pose_matrix::PivotStrategy::Magnitude);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearSystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    coefficients: SquareMatrix,
    rhs: Vec<Vec<f64>>,
    #[serde(default)]
    pivoting: PivotStrategy,
}

impl LinearSystem {
    /// Create a new system.
    ///
    /// # Errors
    ///
    /// * [`MatrixError::SystemError`] if `coefficients` is empty
    ///   or there are no right-hand sides.
    /// * [`MatrixError::DimensionMismatch`] if a right-hand side
    ///   does not match the dimension of `coefficients`.
    pub fn new(coefficients: SquareMatrix, rhs: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let system = Self {
            description: None,
            coefficients,
            rhs,
            pivoting: PivotStrategy::default(),
        };
        system.validate()?;
        Ok(system)
    }

    /// Set the pivot strategy used by [`LinearSystem::solve`].
    pub fn with_pivoting(self, pivoting: PivotStrategy) -> Self {
        Self { pivoting, ..self }
    }

    /// Set the description.
    pub fn with_description<S: Into<String>>(self, description: S) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    pub(crate) fn new_from_str(yaml: &str) -> Result<Self, MatrixError> {
        let system: Self = serde_yaml::from_str(yaml)?;
        system.validate()?;
        Ok(system)
    }

    pub(crate) fn new_from_reader<T: std::io::Read>(reader: T) -> Result<Self, MatrixError> {
        let system: Self = serde_yaml::from_reader(reader)?;
        system.validate()?;
        Ok(system)
    }

    #[cfg(feature = "json")]
    pub(crate) fn new_from_json_str(json: &str) -> Result<Self, MatrixError> {
        let system: Self = serde_json::from_str(json)?;
        system.validate()?;
        Ok(system)
    }

    #[cfg(feature = "json")]
    pub(crate) fn new_from_json_reader<T: std::io::Read>(reader: T) -> Result<Self, MatrixError> {
        let system: Self = serde_json::from_reader(reader)?;
        system.validate()?;
        Ok(system)
    }

    fn validate(&self) -> Result<(), MatrixError> {
        if self.coefficients.is_empty() {
            return Err(MatrixError::SystemError(
                "coefficient matrix is empty".to_string(),
            ));
        }
        if self.rhs.is_empty() {
            return Err(MatrixError::SystemError(
                "no right-hand sides given".to_string(),
            ));
        }
        let n = self.dimension();
        match self.rhs.iter().find(|b| b.len() != n) {
            Some(b) => Err(MatrixError::DimensionMismatch {
                expected: n,
                got: b.len(),
            }),
            None => Ok(()),
        }
    }

    /// Free-form description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The coefficient matrix `A`.
    pub fn coefficients(&self) -> &SquareMatrix {
        &self.coefficients
    }

    /// The right-hand sides, one per solve.
    pub fn rhs(&self) -> &[Vec<f64>] {
        &self.rhs
    }

    /// The pivot strategy used by [`LinearSystem::solve`].
    pub fn pivoting(&self) -> PivotStrategy {
        self.pivoting
    }

    /// Number of unknowns.
    pub fn dimension(&self) -> usize {
        self.coefficients.dimension()
    }

    /// Solve for every right-hand side.
    ///
    /// The coefficients are factorized once.
    /// Solutions are returned in the order of [`LinearSystem::rhs`].
    ///
    /// # Errors
    ///
    /// [`MatrixError::SingularPivot`] if the factorization fails.
    pub fn solve(&self) -> Result<Vec<Vec<f64>>, MatrixError> {
        let factorization =
            LuFactorization::with_strategy(self.coefficients.clone(), self.pivoting)?;
        self.rhs.iter().map(|b| factorization.solve(b)).collect()
    }

    /// Return a YAML representation.
    pub fn as_string(&self) -> Result<String, MatrixError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl std::fmt::Display for LinearSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let yaml = self.as_string().map_err(|_| std::fmt::Error)?;
        write!(f, "{yaml}")
    }
}
