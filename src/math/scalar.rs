//! Deterministic one-dimensional minimization.
//!
//! The Vyazovkin objectives are smooth, single-minimum functions of the
//! activation energy, so a derivative-free bracket-then-golden-section search
//! is enough and is fully deterministic given the same inputs.
//!
//! The search runs in two stages:
//!
//! 1. bracket the minimum by stepping away from the start point with
//!    geometrically growing steps until the middle of three points is lowest
//! 2. shrink the bracket by golden-section until it is smaller than the
//!    requested tolerance

use crate::error::KineticError;

/// Inverse golden ratio, the section factor of the shrink stage.
const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// Options for [`minimize_scalar`].
#[derive(Debug, Clone, Copy)]
pub struct ScalarMinimizeOptions {
    /// Initial bracketing step away from the start point.
    pub initial_step: f64,
    /// Absolute bracket width at which the search stops.
    pub tolerance: f64,
    /// Iteration budget shared by both stages.
    pub max_iters: u64,
}

impl ScalarMinimizeOptions {
    /// Options scaled to a start point: the first step is a fraction of its
    /// magnitude so the search behaves the same for values around 1 and
    /// around 1e5.
    pub fn scaled_to(start: f64) -> Self {
        let magnitude = start.abs().max(1.0);
        Self {
            initial_step: 0.05 * magnitude,
            tolerance: 1e-8 * magnitude,
            max_iters: 500,
        }
    }
}

/// Result of a successful scalar minimization.
#[derive(Debug, Clone, Copy)]
pub struct ScalarMinimum {
    pub x: f64,
    pub value: f64,
    pub iterations: u64,
}

/// Minimize `f` starting from `start`.
///
/// `context` describes the caller for the diagnostics of a
/// [`KineticError::ConvergenceFailure`].
pub fn minimize_scalar(
    f: impl Fn(f64) -> f64,
    start: f64,
    options: ScalarMinimizeOptions,
    context: &str,
) -> Result<ScalarMinimum, KineticError> {
    let mut iterations: u64 = 0;

    // Stage 1: bracket. Walk downhill from the start with growing steps until
    // f turns back up.
    let mut step = options.initial_step;
    let mut a = start;
    let mut b = a + step;
    let mut fb = f(b);
    if fb > f(a) {
        // Downhill is the other way.
        step = -step;
        std::mem::swap(&mut a, &mut b);
        fb = f(b);
    }

    // Invariant: f(b) <= f(a) and the walk continues from a through b.
    let (mut lo, mut hi);
    loop {
        iterations += 1;
        if iterations > options.max_iters {
            return Err(KineticError::ConvergenceFailure {
                context: context.to_string(),
                iterations,
                message: format!(
                    "Could not bracket a minimum: the objective still decreases at x = {b} \
                     (f = {fb})."
                ),
            });
        }
        step *= 2.0;
        let c = b + step;
        let fc = f(c);
        if fc >= fb {
            // a and c now straddle the minimum near b.
            lo = a.min(c);
            hi = a.max(c);
            break;
        }
        a = b;
        (b, fb) = (c, fc);
    }

    // Stage 2: golden-section shrink on [lo, hi].
    let mut x1 = hi - INV_PHI * (hi - lo);
    let mut x2 = lo + INV_PHI * (hi - lo);
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    while hi - lo > options.tolerance {
        iterations += 1;
        if iterations > options.max_iters {
            return Err(KineticError::ConvergenceFailure {
                context: context.to_string(),
                iterations,
                message: format!(
                    "Bracket [{lo}, {hi}] did not shrink below tolerance {}.",
                    options.tolerance
                ),
            });
        }
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - INV_PHI * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + INV_PHI * (hi - lo);
            f2 = f(x2);
        }
    }

    let (x, value) = if f1 < f2 { (x1, f1) } else { (x2, f2) };
    Ok(ScalarMinimum {
        x,
        value,
        iterations,
    })
}
