use std::time::Instant;

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::{
    error::SolverError,
    householder::compute_orthogonal_factor,
    problem::{Method, ProblemDescriptor},
    result::ResultRecord,
    solver::{EigenSolver, SolverCore},
};

/// Unshifted QR algorithm: `A ← Qᴴ·A·Q` until the sub-diagonal vanishes.
///
/// Converges for well separated eigenvalue moduli; close moduli make it crawl
/// and it may stop on the iteration budget instead.
#[derive(Clone, Debug)]
pub struct QrSolver {
    core: SolverCore,
}

impl QrSolver {
    pub fn new(problem: &ProblemDescriptor) -> Self {
        Self {
            core: SolverCore::new(problem, Method::Qr),
        }
    }

    pub fn into_result(self) -> ResultRecord {
        self.core.result
    }
}

impl EigenSolver for QrSolver {
    fn solve(&mut self) -> Result<(), SolverError> {
        puffin::profile_function!();
        let SolverCore {
            max_iterations,
            tolerance,
            method,
            ..
        } = self.core;

        // Work on a copy so that solving twice starts from the same matrix.
        let mut a = self.core.matrix.clone();
        let mut iterations = 0;
        let mut error = tolerance + 1.0;

        let start = Instant::now();
        while iterations < max_iterations && error >= tolerance {
            let q = {
                puffin::profile_scope!("householder qr");
                compute_orthogonal_factor(&a)
            };
            {
                puffin::profile_scope!("similarity transform");
                a = q.adjoint() * &a * &q;
            }
            iterations += 1;
            error = sub_diagonal_norm(&a);
            if !error.is_finite() {
                log::warn!("{}: non-finite matrix at iteration {}", method.label(), iterations);
                return Err(SolverError::NonFiniteIterate {
                    iteration: iterations,
                });
            }
            log::trace!(
                "{}: iteration {} sub-diagonal norm {:e}",
                method.label(),
                iterations,
                error
            );
        }
        let elapsed = start.elapsed();
        let converged = error < tolerance;
        log::debug!(
            "{}: stopped after {} iterations, converged = {} (sub-diagonal norm {:e})",
            method.label(),
            iterations,
            converged,
            error
        );

        self.core.result = ResultRecord {
            method: method.label().to_owned(),
            estimated_eigenvalues: a.diagonal(),
            estimated_error: error,
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

/// `sqrt(Σ |a[i+1, i]|²)`.
pub(crate) fn sub_diagonal_norm(a: &DMatrix<Complex64>) -> f64 {
    let n = a.nrows().min(a.ncols());
    let mut sum = 0.0;
    for i in 0..n.saturating_sub(1) {
        sum += a[(i + 1, i)].norm_sqr();
    }
    sum.sqrt()
}
