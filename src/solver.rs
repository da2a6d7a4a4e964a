use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::{
    error::SolverError,
    inverse::InverseSolver,
    power::PowerSolver,
    problem::{Method, ProblemDescriptor},
    qr::QrSolver,
    result::ResultRecord,
};

/// Common interface of every eigenvalue solver.
pub trait EigenSolver {
    /// Runs the iteration to completion and overwrites the stored result.
    ///
    /// On error the previously stored result is left untouched.
    fn solve(&mut self) -> Result<(), SolverError>;

    /// Result of the last successful `solve()`, or an empty default record.
    fn result(&self) -> &ResultRecord;
}

/// State shared by all solvers: a private copy of the matrix and the budget.
#[derive(Clone, Debug)]
pub(crate) struct SolverCore {
    pub(crate) n: usize,
    pub(crate) max_iterations: usize,
    pub(crate) tolerance: f64,
    pub(crate) matrix: DMatrix<Complex64>,
    pub(crate) method: Method,
    pub(crate) result: ResultRecord,
}

impl SolverCore {
    pub(crate) fn new(problem: &ProblemDescriptor, method: Method) -> Self {
        Self {
            n: problem.matrix.nrows(),
            max_iterations: problem.max_iterations,
            tolerance: problem.tolerance,
            matrix: problem.matrix.clone(),
            method,
            result: ResultRecord::default(),
        }
    }
}

/// One solver of each kind, picked from [`ProblemDescriptor::method`].
#[derive(Clone, Debug)]
pub enum Solver {
    Power(PowerSolver),
    Inverse(InverseSolver),
    Qr(QrSolver),
}

impl Solver {
    /// Builds the solver named by `problem.method`.
    ///
    /// Only the inverse solver can actually fail here, when its decomposition
    /// does not converge.
    pub fn new(problem: &ProblemDescriptor) -> Result<Self, SolverError> {
        Ok(match problem.method {
            Method::Power => Solver::Power(PowerSolver::new(problem)?),
            Method::Inverse => Solver::Inverse(InverseSolver::new(problem)?),
            Method::Qr => Solver::Qr(QrSolver::new(problem)),
        })
    }

    pub fn method(&self) -> Method {
        match self {
            Solver::Power(_) => Method::Power,
            Solver::Inverse(_) => Method::Inverse,
            Solver::Qr(_) => Method::Qr,
        }
    }

    pub fn into_result(self) -> ResultRecord {
        match self {
            Solver::Power(s) => s.into_result(),
            Solver::Inverse(s) => s.into_result(),
            Solver::Qr(s) => s.into_result(),
        }
    }
}

impl EigenSolver for Solver {
    fn solve(&mut self) -> Result<(), SolverError> {
        match self {
            Solver::Power(s) => s.solve(),
            Solver::Inverse(s) => s.solve(),
            Solver::Qr(s) => s.solve(),
        }
    }

    fn result(&self) -> &ResultRecord {
        match self {
            Solver::Power(s) => s.result(),
            Solver::Inverse(s) => s.result(),
            Solver::Qr(s) => s.result(),
        }
    }
}
