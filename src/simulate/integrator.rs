//! Explicit forward-Euler integration of the extent of reaction.
//!
//! Given a time grid, a temperature profile and a composed model, the
//! integrator advances the extent step by step:
//!
//! 1. evaluate every active law at the current state
//! 2. pick the driving rate (coupled global rate if a coupling law is
//!    active, else the vitrification rate if only vitrification is active,
//!    else the chemical rate)
//! 3. `extent[i+1] = extent[i] + driving_rate[i]·Δt`
//!
//! Overshooting extent 1 means the reaction completed before the end of the
//! grid: the remaining extent entries are clamped to 1, the remaining rate
//! and Tg entries to 0, and the run terminates normally.
//!
//! Why forward Euler? The driving rates are cheap to evaluate, experimental
//! grids are dense (thousands of samples per scan), and keeping the update
//! explicit makes the step cost a single law sweep, which matters when a
//! minimizer calls `simulate` thousands of times.

use log::debug;

use crate::domain::SimulationTrace;
use crate::error::KineticError;
use crate::laws::Composition;

/// Integrate a composed kinetic model over a time/temperature grid.
///
/// `params` is the fitted parameter vector in layout order (rate, then
/// vitrification, then coupling); `tg_params` are the fixed Tg-law
/// parameters. `initial_extent` must lie in `[0, 1)`.
pub fn simulate(
    time: &[f64],
    temperature: &[f64],
    composition: &Composition,
    params: &[f64],
    tg_params: &[f64],
    initial_extent: f64,
) -> Result<SimulationTrace, KineticError> {
    let n = time.len();
    if n == 0 {
        return Err(KineticError::InvalidInput(
            "The time grid must contain at least one sample.".into(),
        ));
    }
    if temperature.len() != n {
        return Err(KineticError::MismatchedLengths {
            context: "Temperature profile",
            expected: n,
            actual: temperature.len(),
        });
    }
    if !(0.0..1.0).contains(&initial_extent) {
        return Err(KineticError::InvalidInput(format!(
            "Initial extent must lie in [0, 1); got {initial_extent}."
        )));
    }

    let layout = composition.param_layout();
    layout.check(params)?;

    let rate_law = composition.rate_law();
    let vitrification_law = composition.vitrification_law();
    let tg_law = composition.tg_law();
    let coupling_law = composition.coupling_law();

    let mut extent = vec![0.0; n];
    let mut global_rate = vec![0.0; n];
    let mut chemical_rate = rate_law.map(|_| vec![0.0; n]);
    let mut vitrification_rate = vitrification_law.map(|_| vec![0.0; n]);
    let mut tg = tg_law.map(|_| vec![0.0; n]);

    extent[0] = initial_extent;

    // Evaluate every active law at step i, filling the trace arrays and
    // returning the driving rate.
    let evaluate_step = |i: usize,
                             extent_i: f64,
                             temperature_i: f64,
                             chemical_rate: &mut Option<Vec<f64>>,
                             vitrification_rate: &mut Option<Vec<f64>>,
                             tg: &mut Option<Vec<f64>>|
     -> Result<f64, KineticError> {
        let kc = match rate_law {
            Some(law) => {
                let k = law.rate(extent_i, temperature_i, layout.rate_slice(params))?;
                chemical_rate.as_mut().expect("rate array allocated")[i] = k;
                Some(k)
            }
            None => None,
        };
        let tg_i = match tg_law {
            Some(law) => {
                let g = law.tg(extent_i, tg_params)?;
                tg.as_mut().expect("tg array allocated")[i] = g;
                Some(g)
            }
            None => None,
        };
        let kv = match vitrification_law {
            Some(law) => {
                let g = tg_i.expect("composition guarantees a Tg law");
                let k = law.rate(temperature_i, g, layout.vitrification_slice(params))?;
                vitrification_rate.as_mut().expect("vitrification array allocated")[i] = k;
                Some(k)
            }
            None => None,
        };
        match coupling_law {
            Some(law) => law.combine(
                kc.expect("composition guarantees a rate law"),
                kv.expect("composition guarantees a vitrification law"),
                layout.coupling_slice(params),
            ),
            // Without coupling, vitrification (when present alone) drives the
            // extent; otherwise the chemical rate does.
            None => Ok(kv.or(kc).expect("composition always carries a driving law")),
        }
    };

    global_rate[0] = evaluate_step(
        0,
        extent[0],
        temperature[0],
        &mut chemical_rate,
        &mut vitrification_rate,
        &mut tg,
    )?;

    for i in 0..n - 1 {
        let dt = time[i + 1] - time[i];
        if dt <= 0.0 {
            return Err(KineticError::InvalidInput(format!(
                "Time must be strictly increasing; step {i} has Δt = {dt}."
            )));
        }

        let candidate = extent[i] + global_rate[i] * dt;
        if candidate > 1.0 {
            // Reaction complete before the end of the grid: clamp and stop.
            debug!("reaction complete at step {} of {}", i + 1, n);
            for value in &mut extent[i + 1..] {
                *value = 1.0;
            }
            // Rate and Tg entries past completion stay 0 from allocation.
            break;
        }

        extent[i + 1] = candidate;
        global_rate[i + 1] = evaluate_step(
            i + 1,
            extent[i + 1],
            temperature[i + 1],
            &mut chemical_rate,
            &mut vitrification_rate,
            &mut tg,
        )?;
    }

    Ok(SimulationTrace {
        extent,
        global_rate,
        chemical_rate,
        vitrification_rate,
        tg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::laws::{CouplingLaw, RateLaw, TgLaw, VitrificationLaw};
    use crate::math::linspace;
    use approx::assert_relative_eq;

    const NTH_ORDER: Composition = Composition::RateOnly {
        rate: RateLaw::NthOrder,
    };

    #[test]
    fn first_order_isothermal_matches_analytic_solution() {
        // dα/dt = k(1-α) with constant T has the solution α = 1 - exp(-kt).
        let params = [1e10, 70_000.0, 1.0];
        let k = crate::laws::arrhenius_rate_constant(400.0, params[0], params[1]);

        let n = 20_000;
        let time = linspace(0.0, 3.0 / k, n);
        let temperature = vec![400.0; n];

        let trace = simulate(&time, &temperature, &NTH_ORDER, &params, &[], 0.0).unwrap();

        for (i, &t) in time.iter().enumerate().step_by(1_000) {
            let analytic = 1.0 - (-k * t).exp();
            assert_relative_eq!(trace.extent[i], analytic, epsilon = 2e-3);
        }
    }

    #[test]
    fn extent_is_monotone_and_bounded() {
        let params = [1e10, 70_000.0, 1.0];
        let n = 5_000;
        let time = linspace(0.0, 1_800.0, n);
        let temperature = linspace(293.0, 593.0, n);

        let trace = simulate(&time, &temperature, &NTH_ORDER, &params, &[], 0.0).unwrap();

        for w in trace.extent.windows(2) {
            assert!(w[1] >= w[0]);
        }
        for &a in &trace.extent {
            assert!((0.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn completion_clamps_remaining_extent_and_zeroes_rates() {
        // A huge pre-exponential factor drives the reaction to completion
        // within a few steps.
        let params = [1e15, 70_000.0, 1.0];
        let n = 200;
        let time = linspace(0.0, 1_800.0, n);
        let temperature = vec![450.0; n];

        let trace = simulate(&time, &temperature, &NTH_ORDER, &params, &[], 0.0).unwrap();

        let completed_at = trace
            .extent
            .iter()
            .position(|&a| a == 1.0)
            .expect("reaction should complete before the grid ends");
        for i in completed_at..n {
            assert_eq!(trace.extent[i], 1.0);
            assert_eq!(trace.global_rate[i], 0.0);
        }
    }

    #[test]
    fn coupled_composition_fills_every_trace_array() {
        let composition = Composition::Coupled {
            rate: RateLaw::NthOrder,
            vitrification: VitrificationLaw::Wlf,
            tg: TgLaw::DiBenedetto,
            coupling: CouplingLaw::HarmonicMean,
        };
        // Rate params, then vitrification params (layout order).
        let params = [1e10, 70_000.0, 1.0, 30.64, 42.61, 51.6];
        let tg_params = [173.15, 373.15, 0.4];

        let n = 2_000;
        let time = linspace(0.0, 1_800.0, n);
        let temperature = vec![293.15; n];

        let trace = simulate(
            &time,
            &temperature,
            &composition,
            &params,
            &tg_params,
            1e-3,
        )
        .unwrap();

        let chemical = trace.chemical_rate.as_ref().unwrap();
        let vitrification = trace.vitrification_rate.as_ref().unwrap();
        let tg = trace.tg.as_ref().unwrap();
        assert_eq!(chemical.len(), n);
        assert_eq!(vitrification.len(), n);
        assert_eq!(tg.len(), n);

        // The harmonic mean can never exceed either contributor.
        for i in 0..n {
            assert!(trace.global_rate[i] <= chemical[i] + 1e-15);
            assert!(trace.global_rate[i] <= vitrification[i] + 1e-15);
        }
    }

    #[test]
    fn vitrification_only_composition_drives_extent_with_kv() {
        let composition = Composition::VitrificationOnly {
            vitrification: VitrificationLaw::WlfNoReactionBelowTg,
            tg: TgLaw::DiBenedetto,
        };
        let params = [1e-4, 1.0, 51.6];
        let tg_params = [173.15, 373.15, 0.4];

        let n = 500;
        let time = linspace(0.0, 100.0, n);
        let temperature = vec![320.0; n];

        let trace = simulate(
            &time,
            &temperature,
            &composition,
            &params,
            &tg_params,
            0.0,
        )
        .unwrap();

        assert!(trace.chemical_rate.is_none());
        let kv = trace.vitrification_rate.as_ref().unwrap();
        for i in 0..n {
            assert_eq!(trace.global_rate[i], kv[i]);
        }
        assert!(trace.extent[n - 1] > 0.0);
    }

    #[test]
    fn autocatalytic_from_zero_extent_fails_fast() {
        let composition = Composition::RateOnly {
            rate: RateLaw::Autocatalytic,
        };
        let params = [1e10, 70_000.0, 0.45, 1.0];
        let time = linspace(0.0, 10.0, 10);
        let temperature = vec![400.0; 10];

        let err = simulate(&time, &temperature, &composition, &params, &[], 0.0).unwrap_err();
        assert!(matches!(err, KineticError::AutocatalyticExtent { .. }));
    }

    #[test]
    fn wrong_parameter_vector_length_is_rejected_before_integration() {
        let time = linspace(0.0, 10.0, 10);
        let temperature = vec![400.0; 10];
        let err = simulate(&time, &temperature, &NTH_ORDER, &[1.0], &[], 0.0).unwrap_err();
        assert!(matches!(err, KineticError::ParameterVectorLength { .. }));
    }
}
