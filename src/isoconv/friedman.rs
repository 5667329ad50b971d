//! Friedman differential isoconversional method.
//!
//! At a fixed conversion α the rate satisfies
//! `ln(dα/dt) = ln(A·f(α)) - Ea/(R·T)`, so regressing ln(rate) against 1/T
//! across experiments yields `Ea = -slope·R` — closed form, no iterative
//! minimization. The regression intercept `ln(A·f(α))` is reported as a
//! diagnostic.

use std::time::Instant;

use log::{debug, info};

use crate::domain::{Experiment, IsoMethod, IsoconversionalResult};
use crate::error::KineticError;
use crate::isoconv::{
    check_boundaries, report_progress, IsoOptions, IsoProgress, ProgressSink, GAS_CONSTANT,
};
use crate::math::{find_closest, linear_fit, linspace};

/// Estimate activation energy over a conversion grid with the Friedman
/// method.
///
/// Every experiment must carry a rate series; `options.initial_guess` is
/// ignored (nothing is minimized).
pub fn friedman(
    experiments: &[Experiment],
    options: &IsoOptions,
    mut progress: ProgressSink<'_>,
) -> Result<IsoconversionalResult, KineticError> {
    check_boundaries(options, experiments)?;
    for (k, exp) in experiments.iter().enumerate() {
        if exp.rate().is_none() {
            return Err(KineticError::MissingRateSeries {
                method: "Friedman",
                experiment: k,
            });
        }
    }

    let started = Instant::now();
    info!(
        "Friedman analysis: {} experiments, {} conversion points in {}..{}",
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
    let mut intercept = Vec::with_capacity(conversion.len());

    for (point, &target) in conversion.iter().enumerate() {
        let mut inverse_temperature = Vec::with_capacity(experiments.len());
        let mut log_rate = Vec::with_capacity(experiments.len());

        for (k, exp) in experiments.iter().enumerate() {
            let (index, _) = find_closest(target, exp.extent(), "conversion series")?;
            let rate = exp.rate().expect("checked above")[index];
            if rate <= 0.0 {
                return Err(KineticError::NonPositiveRate {
                    rate,
                    conversion: target,
                    experiment: k,
                });
            }
            inverse_temperature.push(1.0 / exp.temperature()[index]);
            log_rate.push(rate.ln());
        }

        let fit = linear_fit(&inverse_temperature, &log_rate)?;
        let ea = -fit.slope * GAS_CONSTANT;
        debug!("conversion {target}: Ea = {ea}, intercept = {}", fit.intercept);

        activation_energy.push(ea);
        intercept.push(fit.intercept);

        report_progress(
            &mut progress,
            IsoProgress {
                completed: point + 1,
                total: conversion.len(),
                conversion: target,
                activation_energy: ea,
            },
        )?;
    }

    info!(
        "Friedman analysis finished in {:.3}s",
        started.elapsed().as_secs_f64()
    );

    Ok(IsoconversionalResult {
        method: IsoMethod::Friedman,
        conversion,
        activation_energy,
        intercept: Some(intercept),
        mean_time: None,
        mean_temperature: None,
    })
}
