use nalgebra::{DMatrix, DVector, Dynamic, SVD};
use num_complex::Complex64;

use crate::{
    error::SolverError,
    power_based::{ApproximationStep, PowerBasedSolver},
    problem::Method,
};

const SVD_MAX_ITERATIONS: usize = 10_000;

/// Solves `(A - shift·I)·x = b` through a singular value decomposition that is
/// computed once and reused for every iteration.
///
/// Singular values at or below `cutoff` count as zero. If there are any, the
/// shift is numerically an eigenvalue of `A` and the step projects onto the
/// null space of the shifted matrix instead of solving, which is where the
/// shift-and-invert iterates would head as the shift approaches the eigenvalue.
#[derive(Clone, Debug)]
pub struct InverseStep {
    svd: SVD<Complex64, Dynamic, Dynamic>,
    cutoff: f64,
    /// Orthonormal columns spanning the null space, if the shift is singular.
    null_space: Option<DMatrix<Complex64>>,
}

impl InverseStep {
    /// Dimension of the numerical null space of `A - shift·I`.
    pub fn nullity(&self) -> usize {
        self.null_space.as_ref().map_or(0, |basis| basis.ncols())
    }
}

impl ApproximationStep for InverseStep {
    const METHOD: Method = Method::Inverse;

    fn from_shifted_matrix(shifted: DMatrix<Complex64>) -> Result<Self, SolverError> {
        if shifted.iter().any(|z| !z.is_finite()) {
            return Err(SolverError::Decomposition(
                "shifted matrix has non-finite entries",
            ));
        }
        let n = shifted.nrows();
        let svd = SVD::try_new(shifted, true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
            .ok_or(SolverError::Decomposition("singular value decomposition did not converge"))?;
        let sigma_max = svd.singular_values.iter().copied().fold(0.0, f64::max);
        let cutoff = n.max(1) as f64 * f64::EPSILON * sigma_max;

        let null_space = null_space_basis(&svd, cutoff)?;
        if let Some(basis) = &null_space {
            log::warn!(
                "{}: shift is an eigenvalue (nullity {} of {}), iterating in the null space",
                Self::METHOD.label(),
                basis.ncols(),
                n
            );
        }
        Ok(Self {
            svd,
            cutoff,
            null_space,
        })
    }

    fn approximate(&self, b: &DVector<Complex64>) -> Result<DVector<Complex64>, SolverError> {
        match &self.null_space {
            Some(basis) => Ok(basis * (basis.adjoint() * b)),
            // Only fails without U or Vᴴ, and both are always computed.
            None => self
                .svd
                .solve(b, self.cutoff)
                .map_err(SolverError::Decomposition),
        }
    }
}

/// Right singular vectors whose singular value is at or below `cutoff`, as columns.
fn null_space_basis(
    svd: &SVD<Complex64, Dynamic, Dynamic>,
    cutoff: f64,
) -> Result<Option<DMatrix<Complex64>>, SolverError> {
    let v_t = svd
        .v_t
        .as_ref()
        .ok_or(SolverError::Decomposition("right singular vectors were not computed"))?;
    let null: Vec<usize> = svd
        .singular_values
        .iter()
        .enumerate()
        .filter(|(_, sigma)| **sigma <= cutoff)
        .map(|(k, _)| k)
        .collect();
    if null.is_empty() {
        return Ok(None);
    }
    // Row k of Vᴴ is the conjugate of the k-th right singular vector.
    let basis = DMatrix::from_fn(v_t.ncols(), null.len(), |i, j| v_t[(null[j], i)].conj());
    Ok(Some(basis))
}

/// Inverse iteration on `A - shift·I`.
///
/// Converges to the eigenvalue of `A` closest to the shift.
pub type InverseSolver = PowerBasedSolver<InverseStep>;
