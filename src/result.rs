use std::{fmt, time::Duration};

use nalgebra::DVector;
use num_complex::Complex64;

/// Outcome of one `solve()` call.
///
/// The power family reports exactly one eigenvalue, the QR method one per row.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRecord {
    pub method: String,
    pub estimated_eigenvalues: DVector<Complex64>,
    /// Residual norm `‖A·b − λ·b‖` for the power family, sub-diagonal norm for QR.
    pub estimated_error: f64,
    /// Wall clock time spent inside the iteration loop.
    pub elapsed: Duration,
    pub iterations: usize,
    /// Whether the loop stopped on the tolerance test rather than the budget.
    pub converged: bool,
}

impl Default for ResultRecord {
    fn default() -> Self {
        Self {
            method: String::new(),
            estimated_eigenvalues: DVector::zeros(0),
            estimated_error: 0.0,
            elapsed: Duration::ZERO,
            iterations: 0,
            converged: false,
        }
    }
}

impl ResultRecord {
    pub fn elapsed_micros(&self) -> u128 {
        self.elapsed.as_micros()
    }

    /// The first (and for the power family, only) estimate.
    pub fn eigenvalue(&self) -> Option<Complex64> {
        self.estimated_eigenvalues.iter().next().copied()
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Method: {}", self.method)?;
        writeln!(f, "Error: {:e}", self.estimated_error)?;
        writeln!(f, "Execution Time: {} microseconds", self.elapsed_micros())?;
        writeln!(f, "Iterations: {}", self.iterations)?;
        for (i, value) in self.estimated_eigenvalues.iter().enumerate() {
            writeln!(f, "λ{} = {} + i{}", i + 1, value.re, value.im)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty() {
        let record = ResultRecord::default();
        assert_eq!(record.estimated_eigenvalues.len(), 0);
        assert_eq!(record.eigenvalue(), None);
        assert_eq!(record.iterations, 0);
        assert!(!record.converged);
    }

    #[test]
    fn display_lists_every_eigenvalue() {
        let record = ResultRecord {
            method: "QR Method".into(),
            estimated_eigenvalues: DVector::from_vec(vec![
                Complex64::new(5.0, 0.0),
                Complex64::new(2.0, -1.0),
            ]),
            estimated_error: 1e-8,
            elapsed: Duration::from_micros(42),
            iterations: 17,
            converged: true,
        };
        let text = record.to_string();
        assert!(text.contains("Method: QR Method"));
        assert!(text.contains("Execution Time: 42 microseconds"));
        assert!(text.contains("Iterations: 17"));
        assert!(text.contains("λ1 = 5 + i0"));
        assert!(text.contains("λ2 = 2 + i-1"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn record_survives_json() {
        let record = ResultRecord {
            method: "Power Method".into(),
            estimated_eigenvalues: DVector::from_element(1, Complex64::new(5.0, -0.5)),
            estimated_error: 0.125,
            elapsed: Duration::from_micros(1500),
            iterations: 12,
            converged: true,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ResultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
