//! Ordinary least squares for small regression problems.
//!
//! The Friedman method repeatedly fits `y = intercept + slope·x` with one
//! observation per experiment (typically 3-6 points). We solve the normal
//! problem through nalgebra's SVD, which stays robust even when the
//! observations are nearly collinear (e.g. heating rates that are close
//! together produce nearly identical 1/T values).

use nalgebra::{DMatrix, DVector};

use crate::error::KineticError;

/// Slope and intercept of an ordinary least-squares line fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Solve a least-squares problem `X·β ≈ y` via SVD.
///
/// Returns `None` when the system is too ill-conditioned to solve or the
/// solution is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    let beta = svd.solve(y, 1e-12).ok()?;
    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}

/// Fit `y = intercept + slope·x` by ordinary least squares.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit, KineticError> {
    if x.is_empty() {
        return Err(KineticError::EmptySeries {
            context: "linear regression",
        });
    }
    if y.len() != x.len() {
        return Err(KineticError::MismatchedLengths {
            context: "Linear regression observations",
            expected: x.len(),
            actual: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(KineticError::InvalidInput(
            "Linear regression requires at least 2 observations.".into(),
        ));
    }

    let n = x.len();
    let mut design = DMatrix::<f64>::zeros(n, 2);
    for (i, &xi) in x.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = xi;
    }
    let rhs = DVector::from_row_slice(y);

    let beta = solve_least_squares(&design, &rhs).ok_or_else(|| {
        KineticError::InvalidInput(
            "Linear regression is ill-conditioned (observations may be collinear).".into(),
        )
    })?;

    Ok(LinearFit {
        intercept: beta[0],
        slope: beta[1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_fit_recovers_exact_line() {
        // y = 2 + 3x
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [2.0, 5.0, 8.0, 11.0];
        let fit = linear_fit(&x, &y).unwrap();
        assert_relative_eq!(fit.intercept, 2.0, max_relative = 1e-10);
        assert_relative_eq!(fit.slope, 3.0, max_relative = 1e-10);
    }

    #[test]
    fn linear_fit_minimizes_residuals_on_noisy_data() {
        // Perturbations around y = 1 + 2x; expected coefficients computed by hand.
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.1, 2.9, 5.1, 6.9];
        let fit = linear_fit(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 1.96, max_relative = 1e-6);
        assert_relative_eq!(fit.intercept, 1.06, max_relative = 1e-6);
    }

    #[test]
    fn linear_fit_rejects_single_observation() {
        let err = linear_fit(&[1.0], &[2.0]).unwrap_err();
        assert!(matches!(err, KineticError::InvalidInput(_)));
    }
}
