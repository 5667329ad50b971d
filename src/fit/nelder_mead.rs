//! Nelder-Mead implementation of the [`Minimizer`] contract, backed by the
//! `argmin` crate.
//!
//! Bounds are handled by penalty: any probe outside the box evaluates to
//! +inf, which the simplex immediately contracts away from. That keeps the
//! adapter independent of solver-specific constraint support.

use argmin::core::{CostFunction, Error, Executor, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;

use crate::error::KineticError;
use crate::fit::{MinimizeOutcome, Minimizer, MinimizerDiagnostics, Objective};

/// Nelder-Mead minimizer with a perturbation-based initial simplex.
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadMinimizer {
    /// Iteration budget.
    pub max_iters: u64,
    /// Standard-deviation tolerance on the simplex objective values.
    pub sd_tolerance: f64,
    /// Relative perturbation applied per dimension to seed the simplex.
    pub simplex_perturbation: f64,
}

impl Default for NelderMeadMinimizer {
    fn default() -> Self {
        Self {
            max_iters: 1_000,
            sd_tolerance: 1e-10,
            simplex_perturbation: 0.05,
        }
    }
}

struct PenalizedObjective<'a> {
    objective: Objective<'a>,
    bounds: Option<&'a [(f64, f64)]>,
}

impl CostFunction for PenalizedObjective<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, Error> {
        if let Some(bounds) = self.bounds {
            let outside = params
                .iter()
                .zip(bounds)
                .any(|(&p, &(lo, hi))| p < lo || p > hi);
            if outside {
                return Ok(f64::INFINITY);
            }
        }
        Ok((self.objective)(params)?)
    }
}

impl NelderMeadMinimizer {
    /// Seed simplex: the initial guess plus one vertex per dimension,
    /// perturbed along that axis.
    fn initial_simplex(&self, initial_guess: &[f64]) -> Vec<Vec<f64>> {
        let mut vertices = Vec::with_capacity(initial_guess.len() + 1);
        vertices.push(initial_guess.to_vec());
        for i in 0..initial_guess.len() {
            let perturbation = if initial_guess[i] == 0.0 {
                1e-3
            } else {
                self.simplex_perturbation * initial_guess[i].abs()
            };
            let mut vertex = initial_guess.to_vec();
            vertex[i] += perturbation;
            vertices.push(vertex);
        }
        vertices
    }
}

impl Minimizer for NelderMeadMinimizer {
    fn minimize(
        &self,
        objective: Objective<'_>,
        initial_guess: &[f64],
        bounds: Option<&[(f64, f64)]>,
    ) -> Result<MinimizeOutcome, KineticError> {
        if initial_guess.is_empty() {
            return Err(KineticError::InvalidInput(
                "The initial guess must contain at least one parameter.".into(),
            ));
        }
        if let Some(bounds) = bounds {
            if bounds.len() != initial_guess.len() {
                return Err(KineticError::MismatchedLengths {
                    context: "Minimizer bounds",
                    expected: initial_guess.len(),
                    actual: bounds.len(),
                });
            }
        }

        let solver: NelderMead<Vec<f64>, f64> = NelderMead::new(self.initial_simplex(initial_guess))
            .with_sd_tolerance(self.sd_tolerance)
            .map_err(|e| KineticError::Minimizer {
                message: e.to_string(),
            })?;

        let problem = PenalizedObjective { objective, bounds };
        let result = Executor::new(problem, solver)
            .configure(|state| state.max_iters(self.max_iters))
            .run()
            .map_err(|e| KineticError::Minimizer {
                message: e.to_string(),
            })?;

        let state = result.state;
        let best_parameters = state.best_param.clone().ok_or_else(|| {
            KineticError::Minimizer {
                message: "The solver terminated without producing a best parameter vector.".into(),
            }
        })?;

        let converged = matches!(
            state.termination_status,
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        );

        Ok(MinimizeOutcome {
            best_parameters,
            best_objective: state.best_cost,
            diagnostics: MinimizerDiagnostics {
                iterations: state.iter,
                converged,
                message: format!("{:?}", state.termination_status),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn minimizes_a_simple_quadratic() {
        let objective =
            |x: &[f64]| -> Result<f64, KineticError> { Ok((x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2)) };
        let minimizer = NelderMeadMinimizer::default();
        let outcome = minimizer
            .minimize(&objective, &[0.5, 0.5], None)
            .unwrap();

        assert_relative_eq!(outcome.best_parameters[0], 3.0, epsilon = 1e-3);
        assert_relative_eq!(outcome.best_parameters[1], -1.0, epsilon = 1e-3);
        assert!(outcome.best_objective < 1e-6);
        assert!(outcome.diagnostics.converged);
    }

    #[test]
    fn bounds_keep_the_solution_inside_the_box() {
        // Unconstrained minimum at 3, box capped at 2.
        let objective = |x: &[f64]| -> Result<f64, KineticError> { Ok((x[0] - 3.0).powi(2)) };
        let minimizer = NelderMeadMinimizer::default();
        let outcome = minimizer
            .minimize(&objective, &[1.0], Some(&[(0.0, 2.0)]))
            .unwrap();

        assert!(outcome.best_parameters[0] <= 2.0);
        assert_relative_eq!(outcome.best_parameters[0], 2.0, epsilon = 1e-2);
    }

    #[test]
    fn objective_errors_surface_as_minimizer_failures() {
        let objective = |_: &[f64]| -> Result<f64, KineticError> {
            Err(KineticError::InvalidInput("objective exploded".into()))
        };
        let minimizer = NelderMeadMinimizer::default();
        let err = minimizer.minimize(&objective, &[1.0], None).unwrap_err();
        match err {
            KineticError::Minimizer { message } => {
                assert!(message.contains("objective exploded"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
