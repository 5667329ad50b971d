//! Advanced Vyazovkin method.
//!
//! The plain Vyazovkin method integrates from the start of each experiment,
//! which biases the estimate when the activation energy varies with
//! conversion. The advanced variant instead evaluates the temperature
//! integral `J` over the interval *between consecutive analysis points*, so
//! each estimate only sees its own slice of the reaction.
//!
//! This only works when the intervals do not collapse or overlap, which
//! imposes three pre-flight conditions on the analysis grid:
//!
//! - the grid step must exceed the coarsest step between experimental
//!   conversion samples (no sample may be integrated twice)
//! - the first point must leave room for the leading interval
//! - the last point must stay within what the data and the step allow
//!
//! Violating any of them produces an error naming the offending limit.

use std::time::Instant;

use log::{debug, info};

use crate::domain::{Experiment, IsoMethod, IsoconversionalResult};
use crate::error::KineticError;
use crate::isoconv::vyazovkin::vyazovkin_objective;
use crate::isoconv::{check_boundaries, report_progress, IsoOptions, IsoProgress, ProgressSink};
use crate::math::{find_closest, linspace, minimize_scalar, ScalarMinimizeOptions};

/// Per-experiment sample indices bracketing each integration interval.
///
/// `indices[k]` holds `number_of_points + 1` entries for experiment k: the
/// index of the leading interval's start, then the index nearest each
/// analysis point. Interval `i` of experiment `k` covers samples
/// `indices[k][i] .. indices[k][i+1]`.
fn interval_indices(
    experiments: &[Experiment],
    grid: &[f64],
) -> Result<Vec<Vec<usize>>, KineticError> {
    for exp in experiments {
        if exp.len() < 2 {
            return Err(KineticError::InvalidInput(
                "Interval-based analysis requires at least 2 samples per experiment.".into(),
            ));
        }
    }

    // Coarsest first step across the (interpolated, hence uniform)
    // experimental conversion grids.
    let max_experimental_step = experiments
        .iter()
        .map(|e| e.extent()[1] - e.extent()[0])
        .fold(f64::MIN, f64::max);

    let analysis_step = grid[1] - grid[0];

    let minimum_allowed = experiments
        .iter()
        .map(|e| e.extent()[0])
        .fold(f64::MIN, f64::max)
        + max_experimental_step;

    let data_max = experiments
        .iter()
        .map(|e| *e.extent().last().expect("validated non-empty"))
        .fold(f64::MAX, f64::min);
    let maximum_allowed = data_max.min(grid[0] + analysis_step * grid.len() as f64);

    if grid[0] < minimum_allowed {
        return Err(KineticError::AnalysisMinTooLow {
            current: grid[0],
            minimum_allowed,
        });
    }
    if grid[grid.len() - 1] > maximum_allowed {
        return Err(KineticError::AnalysisMaxTooHigh {
            current: grid[grid.len() - 1],
            maximum_allowed,
            points: grid.len(),
        });
    }
    if analysis_step < max_experimental_step {
        return Err(KineticError::AnalysisStepTooSmall {
            current: analysis_step,
            minimum: max_experimental_step,
        });
    }

    // The leading interval starts one analysis step before the first point.
    let start_value = grid[0] - analysis_step;

    let mut indices = Vec::with_capacity(experiments.len());
    for exp in experiments {
        let extent = exp.extent();
        let mut per_experiment = Vec::with_capacity(grid.len() + 1);
        per_experiment.push(find_closest(start_value, extent, "conversion series")?.0);
        for &target in grid {
            per_experiment.push(find_closest(target, extent, "conversion series")?.0);
        }
        indices.push(per_experiment);
    }
    Ok(indices)
}

/// Estimate activation energy over a conversion grid with the advanced
/// Vyazovkin method.
///
/// Besides the activation energies, the result carries the mean interval-end
/// time and temperature across experiments for each analysis point, which is
/// what downstream predictions (e.g. cure time at a new temperature) need.
pub fn advanced_vyazovkin(
    experiments: &[Experiment],
    options: &IsoOptions,
    mut progress: ProgressSink<'_>,
) -> Result<IsoconversionalResult, KineticError> {
    check_boundaries(options, experiments)?;
    if options.number_of_points < 2 {
        return Err(KineticError::InvalidInput(
            "The advanced Vyazovkin method requires at least 2 analysis points.".into(),
        ));
    }

    let started = Instant::now();
    info!(
        "advanced Vyazovkin analysis: {} experiments, {} conversion points in {}..{}",
        experiments.len(),
        options.number_of_points,
        options.min_conversion,
        options.max_conversion
    );

    let conversion = linspace(
        options.min_conversion,
        options.max_conversion,
        options.number_of_points,
    );
    let indices = interval_indices(experiments, &conversion)?;

    let mut activation_energy = Vec::with_capacity(conversion.len());
    let mut mean_time = Vec::with_capacity(conversion.len());
    let mut mean_temperature = Vec::with_capacity(conversion.len());
    let mut guess = options.initial_guess;

    for (point, &target) in conversion.iter().enumerate() {
        let mut times = Vec::with_capacity(experiments.len());
        let mut temperatures = Vec::with_capacity(experiments.len());
        let mut time_end_sum = 0.0;
        let mut temperature_end_sum = 0.0;

        for (k, exp) in experiments.iter().enumerate() {
            let (start, end) = (indices[k][point], indices[k][point + 1]);
            let samples = end.saturating_sub(start);
            if samples < 2 {
                return Err(KineticError::DegenerateInterval {
                    interval: point,
                    experiment: k,
                    samples,
                });
            }
            let time = &exp.time()[start..end];
            let temperature = &exp.temperature()[start..end];
            time_end_sum += time[time.len() - 1];
            temperature_end_sum += temperature[temperature.len() - 1];
            times.push(time);
            temperatures.push(temperature);
        }

        let minimum = minimize_scalar(
            |ea| vyazovkin_objective(ea, &times, &temperatures),
            guess,
            ScalarMinimizeOptions::scaled_to(guess),
            &format!("minimizing the advanced Vyazovkin objective at conversion {target}"),
        )?;
        debug!(
            "conversion {target}: Ea = {} ({} iterations)",
            minimum.x, minimum.iterations
        );

        activation_energy.push(minimum.x);
        mean_time.push(time_end_sum / experiments.len() as f64);
        mean_temperature.push(temperature_end_sum / experiments.len() as f64);
        guess = minimum.x;

        report_progress(
            &mut progress,
            IsoProgress {
                completed: point + 1,
                total: conversion.len(),
                conversion: target,
                activation_energy: minimum.x,
            },
        )?;
    }

    info!(
        "advanced Vyazovkin analysis finished in {:.3}s",
        started.elapsed().as_secs_f64()
    );

    Ok(IsoconversionalResult {
        method: IsoMethod::AdvancedVyazovkin,
        conversion,
        activation_energy,
        intercept: None,
        mean_time: Some(mean_time),
        mean_temperature: Some(mean_temperature),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isoconv::test_data;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_activation_energy_from_analytic_data() {
        let ea = 80_000.0;
        let experiments =
            test_data::isothermal_first_order(ea, &[340.0, 360.0, 380.0], 2_000);
        let result =
            advanced_vyazovkin(&experiments, &test_data::options(0.05, 0.95, 20), None).unwrap();

        assert_eq!(result.conversion.len(), 20);
        for &estimated in &result.activation_energy {
            assert_relative_eq!(estimated, ea, max_relative = 1e-2);
        }

        let mean_temperature = result.mean_temperature.as_ref().unwrap();
        for &t in mean_temperature {
            assert_relative_eq!(t, (340.0 + 360.0 + 380.0) / 3.0, max_relative = 1e-12);
        }
        assert_eq!(result.mean_time.as_ref().unwrap().len(), 20);
    }

    #[test]
    fn grid_finer_than_the_data_is_rejected() {
        // 2000 analysis points over 0.1..0.9 gives a step of ~4e-4, below
        // the experimental step of ~5e-4.
        let experiments = test_data::isothermal_first_order(80_000.0, &[340.0, 360.0], 2_000);
        let err = advanced_vyazovkin(&experiments, &test_data::options(0.1, 0.9, 2_000), None)
            .unwrap_err();
        assert!(matches!(err, KineticError::AnalysisStepTooSmall { .. }));
    }

    #[test]
    fn first_point_too_close_to_the_data_start_is_rejected() {
        let experiments = test_data::isothermal_first_order(80_000.0, &[340.0, 360.0], 2_000);
        // min_conversion equals the first experimental sample: no room for
        // the leading interval.
        let err = advanced_vyazovkin(&experiments, &test_data::options(1e-3, 0.9, 10), None)
            .unwrap_err();
        assert!(matches!(err, KineticError::AnalysisMinTooLow { .. }));
    }

    #[test]
    fn out_of_data_grid_is_rejected_before_any_interval_work() {
        let experiments = test_data::isothermal_first_order(80_000.0, &[340.0, 360.0], 2_000);
        let err = advanced_vyazovkin(&experiments, &test_data::options(0.1, 0.99999, 10), None)
            .unwrap_err();
        assert!(matches!(err, KineticError::ConversionAboveData { .. }));
    }
}
