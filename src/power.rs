use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::{
    error::SolverError,
    power_based::{ApproximationStep, PowerBasedSolver},
    problem::Method,
};

/// Plain multiplication by the shifted matrix.
#[derive(Clone, Debug)]
pub struct PowerStep {
    shifted: DMatrix<Complex64>,
}

impl ApproximationStep for PowerStep {
    const METHOD: Method = Method::Power;

    fn from_shifted_matrix(shifted: DMatrix<Complex64>) -> Result<Self, SolverError> {
        Ok(Self { shifted })
    }

    fn approximate(&self, b: &DVector<Complex64>) -> Result<DVector<Complex64>, SolverError> {
        Ok(&self.shifted * b)
    }
}

/// Power iteration on `A - shift·I`.
///
/// Converges to the eigenvalue of `A` farthest from the shift, i.e. the
/// dominant one when the shift is zero.
pub type PowerSolver = PowerBasedSolver<PowerStep>;
