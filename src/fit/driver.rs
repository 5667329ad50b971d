//! Fit orchestration: wire a cost function to a minimizer.

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cost::{cost, CostKind, ModelInputs};
use crate::error::KineticError;
use crate::fit::{MinimizeOutcome, Minimizer, MinimizerDiagnostics};

/// One fitting problem: which residual to minimize, over which model and
/// experimental data.
#[derive(Debug, Clone, Copy)]
pub struct FitProblem<'a> {
    pub cost_kind: CostKind,
    pub inputs: ModelInputs<'a>,
    pub experimental_rate: &'a [f64],
}

impl FitProblem<'_> {
    /// The objective closure handed to the minimizer. Pure and `Sync`: any
    /// number of threads may probe it concurrently.
    pub fn objective(&self) -> impl Fn(&[f64]) -> Result<f64, KineticError> + Sync {
        move |params: &[f64]| {
            cost(
                &self.cost_kind,
                params,
                self.experimental_rate,
                &self.inputs,
            )
        }
    }
}

/// Outcome of a fit, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitOutcome {
    pub parameters: Vec<f64>,
    pub objective: f64,
    pub diagnostics: MinimizerDiagnostics,
    /// Index of the winning start (0 for single-start fits).
    pub start_index: usize,
}

impl FitOutcome {
    fn from_minimize(outcome: MinimizeOutcome, start_index: usize) -> Self {
        Self {
            parameters: outcome.best_parameters,
            objective: outcome.best_objective,
            diagnostics: outcome.diagnostics,
            start_index,
        }
    }
}

/// Run a single minimization from one initial guess.
pub fn fit(
    problem: &FitProblem<'_>,
    minimizer: &dyn Minimizer,
    initial_guess: &[f64],
    bounds: Option<&[(f64, f64)]>,
) -> Result<FitOutcome, KineticError> {
    let layout = problem.inputs.composition.param_layout();
    layout.check(initial_guess)?;

    info!(
        "fitting {} over {} samples ({} parameters)",
        problem.cost_kind.display_name(),
        problem.experimental_rate.len(),
        initial_guess.len()
    );

    let objective = problem.objective();
    let outcome = minimizer.minimize(&objective, initial_guess, bounds)?;
    if !outcome.diagnostics.converged {
        warn!(
            "minimizer did not converge: {} (after {} iterations)",
            outcome.diagnostics.message, outcome.diagnostics.iterations
        );
    }
    Ok(FitOutcome::from_minimize(outcome, 0))
}

/// Advisory progress sink for multi-start fits, invoked once per completed
/// start with `(start_index, objective_value, best_parameters)`. Purely
/// informational; it cannot cancel the fit.
pub type FitProgressSink<'a> = &'a (dyn Fn(usize, f64, &[f64]) + Sync);

/// Run one minimization per initial guess in parallel and keep the best.
///
/// Starts are evaluated concurrently (the cost functions are pure), and the
/// winner is selected deterministically: lowest objective, ties broken by
/// the lower start index. Individual failed starts are logged and skipped;
/// the call only fails when every start fails, in which case the first
/// start's error is returned.
pub fn fit_multi_start(
    problem: &FitProblem<'_>,
    minimizer: &(dyn Minimizer + Sync),
    initial_guesses: &[Vec<f64>],
    bounds: Option<&[(f64, f64)]>,
    progress: Option<FitProgressSink<'_>>,
) -> Result<FitOutcome, KineticError> {
    if initial_guesses.is_empty() {
        return Err(KineticError::InvalidInput(
            "Multi-start fitting requires at least one initial guess.".into(),
        ));
    }
    let layout = problem.inputs.composition.param_layout();
    for guess in initial_guesses {
        layout.check(guess)?;
    }

    info!(
        "multi-start fit: {} starts of {} over {} samples",
        initial_guesses.len(),
        problem.cost_kind.display_name(),
        problem.experimental_rate.len()
    );

    let objective = problem.objective();
    let outcomes: Vec<Result<MinimizeOutcome, KineticError>> = initial_guesses
        .par_iter()
        .enumerate()
        .map(|(index, guess)| {
            let outcome = minimizer.minimize(&objective, guess, bounds);
            if let (Some(report), Ok(outcome)) = (progress, &outcome) {
                report(index, outcome.best_objective, &outcome.best_parameters);
            }
            outcome
        })
        .collect();

    let mut best: Option<FitOutcome> = None;
    let mut first_error = None;
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(outcome) => {
                debug!(
                    "start {index}: objective = {} ({} iterations)",
                    outcome.best_objective, outcome.diagnostics.iterations
                );
                let candidate = FitOutcome::from_minimize(outcome, index);
                let better = match &best {
                    None => true,
                    Some(current) => candidate.objective < current.objective,
                };
                if better {
                    best = Some(candidate);
                }
            }
            Err(error) => {
                warn!("start {index} failed: {error}");
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
    }

    best.ok_or_else(|| first_error.expect("no outcome implies at least one error"))
}
