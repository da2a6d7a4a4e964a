use std::{fmt, str::FromStr};

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::error::SolverError;

/// Which iterative algorithm to run.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Unshifted QR algorithm, estimates the whole spectrum.
    Qr,
    /// (Shifted) power iteration, estimates the eigenvalue farthest from the shift.
    Power,
    /// Shift-and-invert iteration, estimates the eigenvalue closest to the shift.
    Inverse,
}

impl Method {
    /// Label stored in [`crate::ResultRecord::method`].
    pub fn label(self) -> &'static str {
        match self {
            Method::Qr => "QR Method",
            Method::Power => "Power Method",
            Method::Inverse => "Inverse Power Method",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Qr => "QR",
            Method::Power => "POWER",
            Method::Inverse => "INV",
        };
        f.write_str(name)
    }
}

impl FromStr for Method {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QR" => Ok(Method::Qr),
            "POWER" => Ok(Method::Power),
            "INV" | "INVERSE" => Ok(Method::Inverse),
            _ => Err(SolverError::UnknownMethod(s.to_owned())),
        }
    }
}

/// Method specific knobs. The QR method ignores all of them.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MethodParameters {
    pub shift: Complex64,
    /// Seed for the random starting vector of the power family.
    /// `None` draws from OS entropy.
    pub seed: Option<u64>,
}

/// Everything a solver needs to know about one eigenvalue problem.
///
/// The upstream reader is expected to hand over a well formed descriptor;
/// [`ProblemDescriptor::validate`] is available for that purpose but the
/// solvers themselves never call it.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemDescriptor {
    pub method: Method,
    pub size: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub matrix: DMatrix<Complex64>,
    pub parameters: MethodParameters,
}

impl ProblemDescriptor {
    pub fn new(
        method: Method,
        matrix: DMatrix<Complex64>,
        max_iterations: usize,
        tolerance: f64,
    ) -> Self {
        Self {
            method,
            size: matrix.nrows(),
            max_iterations,
            tolerance,
            matrix,
            parameters: MethodParameters::default(),
        }
    }

    pub fn with_shift(mut self, shift: Complex64) -> Self {
        self.parameters.shift = shift;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.parameters.seed = Some(seed);
        self
    }

    /// Convenience for real valued input.
    pub fn from_real(
        method: Method,
        matrix: &DMatrix<f64>,
        max_iterations: usize,
        tolerance: f64,
    ) -> Self {
        let matrix = matrix.map(|x| Complex64::new(x, 0.0));
        Self::new(method, matrix, max_iterations, tolerance)
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        let (rows, cols) = self.matrix.shape();
        if rows != cols {
            return Err(SolverError::InvalidProblem(format!(
                "matrix must be square, got {}x{}",
                rows, cols
            )));
        }
        if rows == 0 {
            return Err(SolverError::InvalidProblem("matrix is empty".into()));
        }
        if self.size != rows {
            return Err(SolverError::InvalidProblem(format!(
                "size is {} but the matrix is {}x{}",
                self.size, rows, cols
            )));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidProblem(
                "max_iterations must be positive".into(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::InvalidProblem(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.matrix.iter().any(|z| !z.is_finite()) {
            return Err(SolverError::InvalidProblem(
                "matrix contains non-finite entries".into(),
            ));
        }
        if !self.parameters.shift.is_finite() {
            return Err(SolverError::InvalidProblem("shift is not finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_method_names() {
        assert_eq!("QR".parse::<Method>(), Ok(Method::Qr));
        assert_eq!("power".parse::<Method>(), Ok(Method::Power));
        assert_eq!(" Inv ".parse::<Method>(), Ok(Method::Inverse));
        assert_eq!("inverse".parse::<Method>(), Ok(Method::Inverse));
        assert_eq!(
            "lanczos".parse::<Method>(),
            Err(SolverError::UnknownMethod("lanczos".into()))
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for method in [Method::Qr, Method::Power, Method::Inverse] {
            assert_eq!(method.to_string().parse::<Method>(), Ok(method));
        }
    }

    #[test]
    fn shift_defaults_to_zero() {
        let problem = ProblemDescriptor::new(Method::Power, DMatrix::identity(3, 3), 10, 1e-6);
        assert_eq!(problem.size, 3);
        assert_eq!(problem.parameters.shift, Complex64::new(0.0, 0.0));
        assert_eq!(problem.parameters.seed, None);
    }

    #[test]
    fn validate_accepts_well_formed_problem() {
        let problem = ProblemDescriptor::new(Method::Qr, DMatrix::identity(4, 4), 100, 1e-6)
            .with_shift(Complex64::new(1.0, -2.0));
        assert_eq!(problem.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_malformed_problems() {
        let non_square = ProblemDescriptor::new(Method::Qr, DMatrix::zeros(2, 3), 10, 1e-6);
        assert!(matches!(
            non_square.validate(),
            Err(SolverError::InvalidProblem(_))
        ));

        let mut wrong_size = ProblemDescriptor::new(Method::Qr, DMatrix::identity(2, 2), 10, 1e-6);
        wrong_size.size = 3;
        assert!(wrong_size.validate().is_err());

        let no_iterations = ProblemDescriptor::new(Method::Qr, DMatrix::identity(2, 2), 0, 1e-6);
        assert!(no_iterations.validate().is_err());

        let bad_tolerance = ProblemDescriptor::new(Method::Qr, DMatrix::identity(2, 2), 10, 0.0);
        assert!(bad_tolerance.validate().is_err());

        let mut nan_matrix = DMatrix::<Complex64>::identity(2, 2);
        nan_matrix[(0, 1)] = Complex64::new(f64::NAN, 0.0);
        let nan_problem = ProblemDescriptor::new(Method::Power, nan_matrix, 10, 1e-6);
        assert!(nan_problem.validate().is_err());

        let empty = ProblemDescriptor::new(Method::Power, DMatrix::zeros(0, 0), 10, 1e-6);
        assert!(empty.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn descriptor_survives_json() {
        let matrix = DMatrix::from_row_slice(
            2,
            2,
            &[
                Complex64::new(4.0, 0.5),
                Complex64::new(1.0, -1.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(3.0, 0.25),
            ],
        );
        let problem = ProblemDescriptor::new(Method::Inverse, matrix, 250, 1e-6)
            .with_shift(Complex64::new(1.5, -2.0))
            .with_seed(7);
        let json = serde_json::to_string(&problem).unwrap();
        let back: ProblemDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, problem);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_parameters_fall_back_to_defaults() {
        let parameters: MethodParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(parameters, MethodParameters::default());
    }
}
