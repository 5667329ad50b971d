//! Vyazovkin integral isoconversional method.
//!
//! For a target conversion α, each experiment is truncated at its sample
//! nearest α and the activation energy is the minimizer of
//!
//! ```text
//! F(Ea) = Σ_i Σ_{k≠i} J_i(Ea) / J_k(Ea)
//! ```
//!
//! where `J_i(Ea) = Σ exp(-Ea/(R·T̄))·Δt` is a trapezoidal temperature
//! integral over experiment i's truncated series (T̄ is the midpoint
//! temperature of each consecutive sample pair). At the true activation
//! energy all `J_i` coincide up to the (unknown) conversion integral, making
//! every ratio 1 and F minimal.

use std::time::Instant;

use log::{debug, info};

use crate::domain::{Experiment, IsoMethod, IsoconversionalResult};
use crate::error::KineticError;
use crate::isoconv::{
    check_boundaries, report_progress, IsoOptions, IsoProgress, ProgressSink, GAS_CONSTANT,
};
use crate::math::{find_closest, linspace, minimize_scalar, ScalarMinimizeOptions};

/// Trapezoidal temperature integral `J(Ea)` over one (time, temperature)
/// series.
pub(crate) fn integral_j(ea: f64, time: &[f64], temperature: &[f64]) -> f64 {
    let mut sum = 0.0;
    for i in 0..time.len() - 1 {
        let mid_temperature = (temperature[i] + temperature[i + 1]) / 2.0;
        sum += (-ea / (GAS_CONSTANT * mid_temperature)).exp() * (time[i + 1] - time[i]);
    }
    sum
}

/// The Vyazovkin objective `F(Ea)` over per-experiment series.
pub(crate) fn vyazovkin_objective(ea: f64, times: &[&[f64]], temperatures: &[&[f64]]) -> f64 {
    let js: Vec<f64> = times
        .iter()
        .zip(temperatures)
        .map(|(t, temp)| integral_j(ea, t, temp))
        .collect();

    let mut sum = 0.0;
    for i in 0..js.len() {
        for k in 0..js.len() {
            if i != k {
                sum += js[i] / js[k];
            }
        }
    }
    sum
}

/// Estimate activation energy over a conversion grid with the Vyazovkin
/// method.
///
/// Each point's minimization is warm-started from the previous point's
/// solution; the first point starts from `options.initial_guess`.
pub fn vyazovkin(
    experiments: &[Experiment],
    options: &IsoOptions,
    mut progress: ProgressSink<'_>,
) -> Result<IsoconversionalResult, KineticError> {
    check_boundaries(options, experiments)?;

    let started = Instant::now();
    info!(
        "Vyazovkin analysis: {} experiments, {} conversion points in {}..{}",
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
    let mut activation_energy = Vec::with_capacity(conversion.len());
    let mut guess = options.initial_guess;

    for (point, &target) in conversion.iter().enumerate() {
        // Truncate every experiment at the sample nearest the target.
        let mut times = Vec::with_capacity(experiments.len());
        let mut temperatures = Vec::with_capacity(experiments.len());
        for (k, exp) in experiments.iter().enumerate() {
            let (index, _) = find_closest(target, exp.extent(), "conversion series")?;
            if index < 1 {
                return Err(KineticError::DegenerateInterval {
                    interval: point,
                    experiment: k,
                    samples: index + 1,
                });
            }
            times.push(&exp.time()[..=index]);
            temperatures.push(&exp.temperature()[..=index]);
        }

        let minimum = minimize_scalar(
            |ea| vyazovkin_objective(ea, &times, &temperatures),
            guess,
            ScalarMinimizeOptions::scaled_to(guess),
            &format!("minimizing the Vyazovkin objective at conversion {target}"),
        )?;
        debug!(
            "conversion {target}: Ea = {} ({} iterations)",
            minimum.x, minimum.iterations
        );

        activation_energy.push(minimum.x);
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
        "Vyazovkin analysis finished in {:.3}s",
        started.elapsed().as_secs_f64()
    );

    Ok(IsoconversionalResult {
        method: IsoMethod::Vyazovkin,
        conversion,
        activation_energy,
        intercept: None,
        mean_time: None,
        mean_temperature: None,
    })
}
