use thiserror::Error;

/// Everything that can go wrong inside the crate.
///
/// Non-convergence is not an error; it shows up as `converged == false` in the
/// [`crate::ResultRecord`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The power family produced an iterate whose norm is zero or non-finite,
    /// so it cannot be normalized.
    #[error("degenerate iterate at iteration {iteration} (norm = {norm})")]
    DegenerateIterate { iteration: usize, norm: f64 },

    /// A QR similarity transform produced non-finite entries.
    #[error("non-finite matrix after similarity transform at iteration {iteration}")]
    NonFiniteIterate { iteration: usize },

    /// The shifted matrix of the inverse solver could not be decomposed:
    /// it has non-finite entries or the SVD did not converge.
    #[error("decomposition failed: {0}")]
    Decomposition(&'static str),

    /// A method name that `Method::from_str` does not know.
    #[error("unknown method {0:?}, expected one of QR, POWER, INV")]
    UnknownMethod(String),

    /// Rejected by [`crate::ProblemDescriptor::validate`].
    #[error("invalid problem: {0}")]
    InvalidProblem(String),
}
