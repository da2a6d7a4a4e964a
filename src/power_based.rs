use std::time::Instant;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    error::SolverError,
    problem::{Method, ProblemDescriptor},
    result::ResultRecord,
    solver::{EigenSolver, SolverCore},
};

/// The part of a power-family iteration that differs between variants:
/// mapping the current normalized iterate to the next, unnormalized one.
pub trait ApproximationStep: Sized {
    const METHOD: Method;

    /// Prepares the step from `A - shift·I`.
    fn from_shifted_matrix(shifted: DMatrix<Complex64>) -> Result<Self, SolverError>;

    fn approximate(&self, b: &DVector<Complex64>) -> Result<DVector<Complex64>, SolverError>;
}

/// Shared driver of power iteration and inverse iteration.
///
/// Normalization, the Rayleigh quotient, the residual test, timing and all
/// bookkeeping live here, so every step converges under the same rules.
#[derive(Clone, Debug)]
pub struct PowerBasedSolver<S> {
    core: SolverCore,
    shift: Complex64,
    seed: Option<u64>,
    step: S,
}

impl<S: ApproximationStep> PowerBasedSolver<S> {
    /// Copies the matrix and prepares the step from `A - shift·I`.
    pub fn new(problem: &ProblemDescriptor) -> Result<Self, SolverError> {
        let core = SolverCore::new(problem, S::METHOD);
        let shift = problem.parameters.shift;
        let step = {
            puffin::profile_scope!("prepare approximation step");
            S::from_shifted_matrix(shifted_matrix(&core.matrix, shift))?
        };
        Ok(Self {
            core,
            shift,
            seed: problem.parameters.seed,
            step,
        })
    }

    pub fn shift(&self) -> Complex64 {
        self.shift
    }

    pub fn into_result(self) -> ResultRecord {
        self.core.result
    }
}

impl<S: ApproximationStep> EigenSolver for PowerBasedSolver<S> {
    fn solve(&mut self) -> Result<(), SolverError> {
        puffin::profile_function!();
        let SolverCore {
            n,
            max_iterations,
            tolerance,
            ref matrix,
            method,
            ..
        } = self.core;

        let mut b = initial_vector(n, self.seed);
        let mut eigenval = Complex64::new(0.0, 0.0);
        let mut residual_norm = f64::INFINITY;
        let mut iterations = 0;
        let mut converged = false;

        let start = Instant::now();
        while iterations < max_iterations {
            let b_tmp = self.step.approximate(&b)?;
            let norm = b_tmp.norm();
            if norm == 0.0 || !norm.is_finite() {
                log::warn!(
                    "{}: cannot normalize iterate {} (norm = {})",
                    method.label(),
                    iterations,
                    norm
                );
                return Err(SolverError::DegenerateIterate {
                    iteration: iterations,
                    norm,
                });
            }
            b = b_tmp / Complex64::from(norm);

            // Rayleigh quotient against the unshifted matrix.
            let ab = matrix * &b;
            let candidate = b.dotc(&ab) / b.dotc(&b);
            let candidate_residual = (&ab - &b * candidate).norm();
            if !(candidate.is_finite() && candidate_residual.is_finite()) {
                log::warn!(
                    "{}: non-finite estimate at iteration {}",
                    method.label(),
                    iterations
                );
                return Err(SolverError::NonFiniteIterate {
                    iteration: iterations,
                });
            }
            eigenval = candidate;
            residual_norm = candidate_residual;
            iterations += 1;
            log::trace!(
                "{}: iteration {} eigenvalue {} residual {:e}",
                method.label(),
                iterations,
                eigenval,
                residual_norm
            );

            if residual_norm < tolerance {
                converged = true;
                break;
            }
        }
        let elapsed = start.elapsed();

        if converged {
            log::debug!(
                "{}: converged to {} after {} iterations (residual {:e})",
                method.label(),
                eigenval,
                iterations,
                residual_norm
            );
        } else {
            log::debug!(
                "{}: budget of {} iterations exhausted (residual {:e})",
                method.label(),
                max_iterations,
                residual_norm
            );
        }

        self.core.result = ResultRecord {
            method: method.label().to_owned(),
            estimated_eigenvalues: DVector::from_element(1, eigenval),
            estimated_error: residual_norm,
            elapsed,
            iterations,
            converged,
        };
        Ok(())
    }

    fn result(&self) -> &ResultRecord {
        &self.core.result
    }
}

/// `matrix - shift·I`.
pub(crate) fn shifted_matrix(matrix: &DMatrix<Complex64>, shift: Complex64) -> DMatrix<Complex64> {
    let mut shifted = matrix.clone();
    for i in 0..shifted.nrows().min(shifted.ncols()) {
        shifted[(i, i)] -= shift;
    }
    shifted
}

/// Random starting vector with entries in `[-1, 1) + i·[-1, 1)`.
fn initial_vector(n: usize, seed: Option<u64>) -> DVector<Complex64> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    DVector::from_fn(n, |_, _| {
        Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
    })
}
