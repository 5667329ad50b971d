//! Isoconversional analysis: activation energy as a function of conversion.
//!
//! Three methods are available, all operating on experiments re-sampled onto
//! compatible conversion grids (see [`crate::interp`]):
//!
//! - [`vyazovkin`]: integral method, truncates each experiment at the target
//!   conversion and minimizes the cross-experiment integral ratio sum
//! - [`advanced_vyazovkin`]: integral method over intervals between
//!   consecutive analysis points, accounting for activation energy that
//!   varies with conversion
//! - [`friedman`]: differential method, closed-form linear regression of
//!   ln(rate) against 1/T per conversion level
//!
//! Each method walks a conversion grid and reports progress once per
//! completed point; the progress callback can cancel the run between points
//! (cooperative, never mid-point).

pub mod advanced;
pub mod friedman;
pub mod vyazovkin;

pub use advanced::*;
pub use friedman::*;
pub use vyazovkin::*;

use std::ops::ControlFlow;

use crate::domain::{Experiment, IsoMethod, IsoconversionalResult};
use crate::error::KineticError;

/// Universal gas constant in J/(mol·K), rounded to the value conventionally
/// used in the isoconversional literature. Deliberately distinct from
/// [`crate::laws::GAS_CONSTANT`].
pub(crate) const GAS_CONSTANT: f64 = 8.314;

/// Options shared by every isoconversional method.
#[derive(Debug, Clone, Copy)]
pub struct IsoOptions {
    /// Lowest conversion at which the activation energy is computed.
    pub min_conversion: f64,
    /// Highest conversion at which the activation energy is computed.
    pub max_conversion: f64,
    /// Number of conversion levels in the analysis grid.
    pub number_of_points: usize,
    /// Starting activation energy for the first point's minimization
    /// (ignored by the closed-form Friedman method). Subsequent points are
    /// warm-started from the previous solution.
    pub initial_guess: f64,
}

/// Progress report emitted once per completed conversion point.
#[derive(Debug, Clone, Copy)]
pub struct IsoProgress {
    pub completed: usize,
    pub total: usize,
    pub conversion: f64,
    pub activation_energy: f64,
}

/// Advisory progress callback; returning `ControlFlow::Break` cancels the
/// analysis before the next point starts.
pub type ProgressSink<'a> = Option<&'a mut dyn FnMut(IsoProgress) -> ControlFlow<()>>;

/// Run the selected isoconversional method.
pub fn isoconversional_analysis(
    method: IsoMethod,
    experiments: &[Experiment],
    options: &IsoOptions,
    progress: ProgressSink<'_>,
) -> Result<IsoconversionalResult, KineticError> {
    match method {
        IsoMethod::Vyazovkin => vyazovkin(experiments, options, progress),
        IsoMethod::AdvancedVyazovkin => advanced_vyazovkin(experiments, options, progress),
        IsoMethod::Friedman => friedman(experiments, options, progress),
    }
}

/// Validate the analysis options against the experiments.
///
/// Every requested conversion must lie inside each experiment's conversion
/// range; a request outside the data cannot be satisfied by any method.
pub(crate) fn check_boundaries(
    options: &IsoOptions,
    experiments: &[Experiment],
) -> Result<(), KineticError> {
    if experiments.is_empty() {
        return Err(KineticError::EmptySeries {
            context: "isoconversional analysis experiments",
        });
    }
    if options.number_of_points == 0 {
        return Err(KineticError::InvalidInput(
            "The analysis grid must contain at least one point.".into(),
        ));
    }
    if !(options.min_conversion.is_finite()
        && options.max_conversion.is_finite()
        && options.min_conversion <= options.max_conversion)
    {
        return Err(KineticError::InvalidInput(format!(
            "Invalid conversion range {}..{}.",
            options.min_conversion, options.max_conversion
        )));
    }

    for (k, exp) in experiments.iter().enumerate() {
        let extent = exp.extent();
        // Extent is non-decreasing by construction, so the range is
        // first..last.
        let (data_min, data_max) = (extent[0], extent[extent.len() - 1]);
        if options.min_conversion < data_min {
            return Err(KineticError::ConversionBelowData {
                requested: options.min_conversion,
                data_min,
                experiment: k,
            });
        }
        if options.max_conversion > data_max {
            return Err(KineticError::ConversionAboveData {
                requested: options.max_conversion,
                data_max,
                experiment: k,
            });
        }
    }
    Ok(())
}

/// Report one completed point, honoring a cancellation request.
pub(crate) fn report_progress(
    progress: &mut ProgressSink<'_>,
    update: IsoProgress,
) -> Result<(), KineticError> {
    if let Some(sink) = progress {
        if sink(update).is_break() {
            return Err(KineticError::Cancelled {
                completed: update.completed,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_data {
    use super::*;

    /// Build isothermal first-order experiments with a known activation
    /// energy.
    ///
    /// For `dα/dt = k·(1-α)` at constant temperature, the time to reach a
    /// conversion is `t(α) = -ln(1-α)/k` with `k = exp(-Ea/(R·T))` (unit
    /// pre-exponential factor). These series are analytic, so every method
    /// should recover `Ea` almost exactly.
    pub fn isothermal_first_order(
        ea: f64,
        temperatures: &[f64],
        n: usize,
    ) -> Vec<Experiment> {
        let conversion = crate::math::linspace(1e-3, 0.999, n);
        temperatures
            .iter()
            .map(|&t| {
                let k = (-ea / (GAS_CONSTANT * t)).exp();
                let time: Vec<f64> = conversion.iter().map(|&a| -(1.0 - a).ln() / k).collect();
                let rate: Vec<f64> = conversion.iter().map(|&a| k * (1.0 - a)).collect();
                Experiment::new(time, vec![t; n], Some(rate), conversion.clone()).unwrap()
            })
            .collect()
    }

    pub fn options(min: f64, max: f64, points: usize) -> IsoOptions {
        IsoOptions {
            min_conversion: min,
            max_conversion: max,
            number_of_points: points,
            initial_guess: 50_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_reject_targets_below_the_data() {
        let experiments = test_data::isothermal_first_order(80_000.0, &[350.0, 370.0], 100);
        let err = check_boundaries(&test_data::options(1e-5, 0.9, 10), &experiments).unwrap_err();
        assert!(matches!(err, KineticError::ConversionBelowData { .. }));
    }

    #[test]
    fn boundaries_reject_targets_above_the_data() {
        let experiments = test_data::isothermal_first_order(80_000.0, &[350.0, 370.0], 100);
        let err =
            check_boundaries(&test_data::options(0.1, 0.9999, 10), &experiments).unwrap_err();
        assert!(matches!(err, KineticError::ConversionAboveData { .. }));
    }

    #[test]
    fn dispatch_routes_to_the_requested_method() {
        let experiments = test_data::isothermal_first_order(80_000.0, &[340.0, 360.0], 500);
        let options = test_data::options(0.1, 0.9, 5);

        let friedman =
            isoconversional_analysis(IsoMethod::Friedman, &experiments, &options, None).unwrap();
        assert_eq!(friedman.method, IsoMethod::Friedman);
        assert!(friedman.intercept.is_some());

        let vyazovkin =
            isoconversional_analysis(IsoMethod::Vyazovkin, &experiments, &options, None).unwrap();
        assert_eq!(vyazovkin.method, IsoMethod::Vyazovkin);
        assert!(vyazovkin.intercept.is_none());
    }

    #[test]
    fn boundary_errors_name_the_violated_limit() {
        let experiments = test_data::isothermal_first_order(80_000.0, &[350.0], 100);
        let err = check_boundaries(&test_data::options(1e-5, 0.9, 10), &experiments).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("0.00001") || message.contains("1e-5"), "{message}");
        assert!(message.contains("minimum"), "{message}");
    }
}
