#![forbid(unsafe_code)]
#![cfg_attr(not(debug_assertions), deny(warnings))] // Forbid warnings in release builds
#![warn(clippy::all, rust_2018_idioms)]

//! Iterative eigenvalue estimation for dense complex matrices.
//!
//! Three solvers share the [`EigenSolver`] interface:
//!
//! * [`PowerSolver`]: (shifted) power iteration, one eigenvalue.
//! * [`InverseSolver`]: shift-and-invert iteration, one eigenvalue.
//! * [`QrSolver`]: unshifted QR algorithm with a hand written Householder QR,
//!   the whole spectrum.
//!
//! [`Solver::new`] picks one from a [`ProblemDescriptor`].
//!
//! ```
//! use eigen_iter::{EigenSolver, Method, ProblemDescriptor, Solver};
//! use nalgebra::DMatrix;
//!
//! let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 2.0, 3.0]);
//! let problem = ProblemDescriptor::from_real(Method::Qr, &a, 100, 1e-6);
//! let mut solver = Solver::new(&problem)?;
//! solver.solve()?;
//! let result = solver.result();
//! assert!(result.converged);
//! assert_eq!(result.estimated_eigenvalues.len(), 2);
//! # Ok::<(), eigen_iter::SolverError>(())
//! ```

mod error;
mod householder;
mod inverse;
mod power;
mod power_based;
mod problem;
mod qr;
mod result;
mod solver;

pub use error::SolverError;
pub use householder::{compute_orthogonal_factor, householder_qr, Reflector};
pub use inverse::{InverseSolver, InverseStep};
pub use power::{PowerSolver, PowerStep};
pub use power_based::{ApproximationStep, PowerBasedSolver};
pub use problem::{Method, MethodParameters, ProblemDescriptor};
pub use qr::QrSolver;
pub use result::ResultRecord;
pub use solver::{EigenSolver, Solver};

pub use num_complex::Complex64;
