// Householder QR decomposition of a square complex matrix.
//
// The reflector for column block j maps x = M[j.., j] onto a multiple of the
// first unit vector of that block:
//
//     v = (x - alpha * e1) / |x - alpha * e1|,    alpha = -e^(i*arg(x0)) * |x|
//     H = I - 2 * v * v^H
//
// Taking alpha with the opposite phase of x0 avoids cancellation when forming
// x - alpha * e1, and keeps H * x = alpha * e1 exact for complex x.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

/// An elementary unitary reflector `I - 2·v·vᴴ`, acting on rows/columns
/// `start..` and as the identity elsewhere.
#[derive(Clone, Debug, PartialEq)]
pub struct Reflector {
    start: usize,
    v: DVector<Complex64>,
}

impl Reflector {
    /// Reflector that zeroes everything but the first entry of `x`, which is
    /// embedded at offset `start`.
    ///
    /// Returns `None` if `x` is zero, in which case no reflection is needed.
    pub fn new(x: &DVector<Complex64>, start: usize) -> Option<Self> {
        let x_norm = x.norm();
        if x.is_empty() || x_norm == 0.0 {
            return None;
        }

        let mut v = x.clone();
        v[0] -= Self::alpha(x);
        let v_norm = v.norm();
        if v_norm == 0.0 || !v_norm.is_finite() {
            return None;
        }
        Some(Self {
            start,
            v: v / Complex64::from(v_norm),
        })
    }

    /// The value `H·x` leaves in the leading position of a nonempty `x`.
    pub fn alpha(x: &DVector<Complex64>) -> Complex64 {
        let x0 = x[0];
        let phase = if x0.norm() == 0.0 {
            Complex64::new(1.0, 0.0)
        } else {
            x0 / x0.norm()
        };
        -phase * x.norm()
    }

    /// `m ← H·m`.
    pub fn apply_left(&self, m: &mut DMatrix<Complex64>) {
        let Self { start, v } = self;
        let len = v.len();
        for c in 0..m.ncols() {
            let mut w = Complex64::new(0.0, 0.0);
            for i in 0..len {
                w += v[i].conj() * m[(start + i, c)];
            }
            if w == Complex64::new(0.0, 0.0) {
                continue;
            }
            for i in 0..len {
                m[(start + i, c)] -= 2.0 * v[i] * w;
            }
        }
    }

    /// `m ← m·H`.
    pub fn apply_right(&self, m: &mut DMatrix<Complex64>) {
        let Self { start, v } = self;
        let len = v.len();
        for r in 0..m.nrows() {
            let mut w = Complex64::new(0.0, 0.0);
            for i in 0..len {
                w += m[(r, start + i)] * v[i];
            }
            if w == Complex64::new(0.0, 0.0) {
                continue;
            }
            for i in 0..len {
                m[(r, start + i)] -= 2.0 * w * v[i].conj();
            }
        }
    }
}

/// Householder QR of a square matrix, returning `(Q, R)` with `Q` unitary and
/// `R` upper triangular such that `Q·R = m`.
pub fn householder_qr(m: &DMatrix<Complex64>) -> (DMatrix<Complex64>, DMatrix<Complex64>) {
    puffin::profile_function!();
    let n = m.nrows();
    let mut q = DMatrix::<Complex64>::identity(n, n);
    let mut r = m.clone();

    // Column blocks shrink by one each step; the last 1x1 block needs nothing.
    for j in 0..n.saturating_sub(1) {
        let x = DVector::from_fn(n - j, |i, _| r[(j + i, j)]);
        let reflector = match Reflector::new(&x, j) {
            Some(reflector) => reflector,
            None => continue,
        };

        // Accumulate Q <- Q * H_j and R <- H_j * R.
        reflector.apply_right(&mut q);
        reflector.apply_left(&mut r);

        // Entries below the diagonal are zero up to rounding; make it exact.
        for i in (j + 1)..n {
            r[(i, j)] = Complex64::new(0.0, 0.0);
        }
    }
    (q, r)
}

/// The unitary factor of [`householder_qr`].
pub fn compute_orthogonal_factor(m: &DMatrix<Complex64>) -> DMatrix<Complex64> {
    householder_qr(m).0
}
