//! Natural cubic spline re-sampling.
//!
//! For scarce data a piecewise-linear resample introduces visible kinks in
//! rate-over-conversion curves; a natural cubic spline (zero second
//! derivative at both ends) keeps the resampled series smooth without
//! inventing oscillations at the boundaries.

use crate::domain::Experiment;
use crate::error::KineticError;
use crate::interp::linear::resample_with;

/// A natural cubic spline through `(xs, ys)` knots.
///
/// Construction solves the tridiagonal system for the knot second
/// derivatives once (Thomas algorithm); evaluation is then a binary search
/// plus a cubic polynomial per query.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second_derivatives: Vec<f64>,
}

impl CubicSpline {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, KineticError> {
        let n = xs.len();
        if ys.len() != n {
            return Err(KineticError::MismatchedLengths {
                context: "Cubic spline ordinates",
                expected: n,
                actual: ys.len(),
            });
        }
        if n < 3 {
            return Err(KineticError::InvalidInput(
                "A cubic spline requires at least 3 knots.".into(),
            ));
        }
        for w in xs.windows(2) {
            if !(w[1] > w[0]) {
                return Err(KineticError::InvalidInput(format!(
                    "Spline knots must be strictly increasing; found {} followed by {}.",
                    w[0], w[1]
                )));
            }
        }

        // Solve for second derivatives m_i with natural ends m_0 = m_{n-1} = 0:
        //   h_{i-1}·m_{i-1} + 2(h_{i-1}+h_i)·m_i + h_i·m_{i+1} = 6·(d_i - d_{i-1})
        // where h_i = x_{i+1}-x_i and d_i = (y_{i+1}-y_i)/h_i.
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let d: Vec<f64> = ys
            .windows(2)
            .zip(&h)
            .map(|(w, &hi)| (w[1] - w[0]) / hi)
            .collect();

        let mut second = vec![0.0; n];
        let interior = n - 2;
        let mut diag = vec![0.0; interior];
        let mut rhs = vec![0.0; interior];
        let mut upper = vec![0.0; interior];
        for i in 0..interior {
            diag[i] = 2.0 * (h[i] + h[i + 1]);
            upper[i] = h[i + 1];
            rhs[i] = 6.0 * (d[i + 1] - d[i]);
        }

        // Thomas forward sweep: the sub-diagonal entry of row i is h[i].
        for i in 1..interior {
            let factor = h[i] / diag[i - 1];
            diag[i] -= factor * upper[i - 1];
            rhs[i] -= factor * rhs[i - 1];
        }
        // Back substitution into the interior second derivatives.
        second[interior] = rhs[interior - 1] / diag[interior - 1];
        for i in (1..interior).rev() {
            second[i] = (rhs[i - 1] - upper[i - 1] * second[i + 1]) / diag[i - 1];
        }

        Ok(Self {
            xs,
            ys,
            second_derivatives: second,
        })
    }

    /// Evaluate the spline at `x`, which must lie within the knot range.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        debug_assert!(x >= self.xs[0] && x <= self.xs[n - 1]);

        let hi = self.xs.partition_point(|&v| v < x).max(1).min(n - 1);
        let lo = hi - 1;
        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.second_derivatives[lo]
                + (b * b * b - b) * self.second_derivatives[hi])
                * (h * h)
                / 6.0
    }
}

/// Re-sample every experiment onto one shared conversion grid of
/// `number_of_points` levels through natural cubic splines.
pub fn resample_cubic(
    experiments: &[Experiment],
    number_of_points: usize,
) -> Result<Vec<Experiment>, KineticError> {
    resample_with(experiments, number_of_points, |xs, ys, grid| {
        let spline = CubicSpline::new(xs.to_vec(), ys.to_vec())?;
        Ok(grid.iter().map(|&x| spline.evaluate(x)).collect())
    })
}
