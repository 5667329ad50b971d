//! Pointwise model prediction over experimental state.
//!
//! Unlike the integrator, which marches its own extent forward in time, the
//! cost functions evaluate the composed model directly at the *measured*
//! (extent, temperature) samples. This keeps each cost evaluation a single
//! sweep over the data with no accumulated integration error.

use crate::error::KineticError;
use crate::laws::Composition;

/// Experimental state and fixed inputs the composed model is evaluated on.
///
/// `extent` and `temperature` are borrowed from the caller's experiment and
/// must be aligned 1:1. `tg_params` are the fixed Tg-law parameters (not
/// fitted, hence not part of the parameter vector).
#[derive(Debug, Clone, Copy)]
pub struct ModelInputs<'a> {
    pub composition: &'a Composition,
    pub extent: &'a [f64],
    pub temperature: &'a [f64],
    pub tg_params: &'a [f64],
}

/// Predict the global rate at every experimental sample.
///
/// The parameter vector is sliced positionally through the composition's
/// [`crate::laws::ParamLayout`]: rate parameters first, then vitrification,
/// then coupling.
pub fn predict_global_rate(
    params: &[f64],
    inputs: &ModelInputs<'_>,
) -> Result<Vec<f64>, KineticError> {
    if inputs.temperature.len() != inputs.extent.len() {
        return Err(KineticError::MismatchedLengths {
            context: "Model temperature series",
            expected: inputs.extent.len(),
            actual: inputs.temperature.len(),
        });
    }

    let layout = inputs.composition.param_layout();
    layout.check(params)?;

    match *inputs.composition {
        Composition::RateOnly { rate } | Composition::RateWithTg { rate, .. } => {
            rate.rate_series(inputs.extent, inputs.temperature, layout.rate_slice(params))
        }
        Composition::VitrificationOnly { vitrification, tg } => {
            let tg_series = tg.tg_series(inputs.extent, inputs.tg_params)?;
            vitrification.rate_series(
                inputs.temperature,
                &tg_series,
                layout.vitrification_slice(params),
            )
        }
        Composition::Coupled {
            rate,
            vitrification,
            tg,
            coupling,
        } => {
            let chemical =
                rate.rate_series(inputs.extent, inputs.temperature, layout.rate_slice(params))?;
            let tg_series = tg.tg_series(inputs.extent, inputs.tg_params)?;
            let vitrified = vitrification.rate_series(
                inputs.temperature,
                &tg_series,
                layout.vitrification_slice(params),
            )?;
            coupling.combine_series(&chemical, &vitrified, layout.coupling_slice(params))
        }
    }
}
