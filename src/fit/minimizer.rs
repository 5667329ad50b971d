//! The minimization contract between the core and external optimizers.

use serde::{Deserialize, Serialize};

use crate::error::KineticError;

/// Objective shape accepted by a [`Minimizer`].
///
/// Objectives are `Sync` so population-based or multi-start strategies may
/// probe them from worker threads; the core guarantees its cost functions
/// are pure, so concurrent evaluation is always safe.
pub type Objective<'a> = &'a (dyn Fn(&[f64]) -> Result<f64, KineticError> + Sync);

/// Solver diagnostics, surfaced verbatim to the caller.
///
/// A non-converged outcome is still an outcome: the driver never masks it as
/// success, and never retries on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimizerDiagnostics {
    pub iterations: u64,
    pub converged: bool,
    pub message: String,
}

/// Result of one minimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimizeOutcome {
    pub best_parameters: Vec<f64>,
    pub best_objective: f64,
    pub diagnostics: MinimizerDiagnostics,
}

/// An external minimization capability.
///
/// Given an objective, an initial guess and optional per-parameter bounds,
/// return the best parameter vector found together with its objective value
/// and diagnostics. Implementations must be deterministic for the same
/// inputs or document that they are not.
pub trait Minimizer {
    fn minimize(
        &self,
        objective: Objective<'_>,
        initial_guess: &[f64],
        bounds: Option<&[(f64, f64)]>,
    ) -> Result<MinimizeOutcome, KineticError>;
}
