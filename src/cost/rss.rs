//! Residual reductions and the cost-function entry point.
//!
//! Five reductions are available. All of them consume a predicted rate
//! series aligned 1:1 with the experimental rate series:
//!
//! | kind | reduction |
//! |---|---|
//! | standard | `Σ diff²` |
//! | mean | `Σ diff² / n` |
//! | relative | `Σ (diff/exp)²`, error if any experimental value is 0 |
//! | small-extent amplified | amplify diff where extent < limit, then mean-square |
//! | small-rate zones | amplify diff where exp rate < max/fraction, then mean-square |
//!
//! The amplified variants exist because early-reaction and tail samples have
//! tiny absolute rates: a plain RSS lets the exotherm peak dominate the fit
//! and the optimizer happily ignores the onset. Scaling those residuals up
//! keeps the small-rate regions from being sacrificed.

use crate::cost::{predict_global_rate, ModelInputs};
use crate::error::KineticError;

/// Residual reduction selector, carrying the reduction's own knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostKind {
    /// Residual sum of squares.
    Standard,
    /// Mean residual sum of squares.
    Mean,
    /// Relative residual sum of squares.
    Relative,
    /// Mean RSS with residuals amplified where extent < `extent_limit`.
    SmallExtentAmplified {
        extent_limit: f64,
        amplification_factor: f64,
    },
    /// Mean RSS with residuals amplified where the experimental rate is below
    /// `max(experimental_rate) / fraction_to_amplify`.
    SmallRateZoneAmplified {
        fraction_to_amplify: f64,
        amplification_factor: f64,
    },
}

impl CostKind {
    /// Human-readable label for reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            CostKind::Standard => "standard RSS",
            CostKind::Mean => "mean RSS",
            CostKind::Relative => "relative RSS",
            CostKind::SmallExtentAmplified { .. } => "small-extent-amplified RSS",
            CostKind::SmallRateZoneAmplified { .. } => "small-rate-zone-amplified RSS",
        }
    }
}

/// Score a candidate parameter vector against an experimental rate series.
///
/// Composes the model over the experimental state, then applies the selected
/// reduction. Pure: same inputs, same output, no retained state.
pub fn cost(
    kind: &CostKind,
    params: &[f64],
    experimental_rate: &[f64],
    inputs: &ModelInputs<'_>,
) -> Result<f64, KineticError> {
    if experimental_rate.len() != inputs.extent.len() {
        return Err(KineticError::MismatchedLengths {
            context: "Experimental rate series",
            expected: inputs.extent.len(),
            actual: experimental_rate.len(),
        });
    }

    let model_rate = predict_global_rate(params, inputs)?;

    match *kind {
        CostKind::Standard => Ok(rss_standard(&model_rate, experimental_rate)),
        CostKind::Mean => Ok(rss_mean(&model_rate, experimental_rate)),
        CostKind::Relative => rss_relative(&model_rate, experimental_rate),
        CostKind::SmallExtentAmplified {
            extent_limit,
            amplification_factor,
        } => Ok(rss_small_extent_amplified(
            &model_rate,
            experimental_rate,
            inputs.extent,
            extent_limit,
            amplification_factor,
        )),
        CostKind::SmallRateZoneAmplified {
            fraction_to_amplify,
            amplification_factor,
        } => Ok(rss_small_rate_zones_amplified(
            &model_rate,
            experimental_rate,
            fraction_to_amplify,
            amplification_factor,
        )),
    }
}

/// `Σ (model - exp)²`.
pub fn rss_standard(model_rate: &[f64], experimental_rate: &[f64]) -> f64 {
    model_rate
        .iter()
        .zip(experimental_rate)
        .map(|(&m, &e)| (m - e) * (m - e))
        .sum()
}

/// `Σ (model - exp)² / n`.
pub fn rss_mean(model_rate: &[f64], experimental_rate: &[f64]) -> f64 {
    rss_standard(model_rate, experimental_rate) / model_rate.len() as f64
}

/// `Σ ((model - exp)/exp)²`. Fails on an experimental value of exactly 0.
pub fn rss_relative(
    model_rate: &[f64],
    experimental_rate: &[f64],
) -> Result<f64, KineticError> {
    let mut sum = 0.0;
    for (i, (&m, &e)) in model_rate.iter().zip(experimental_rate).enumerate() {
        if e == 0.0 {
            return Err(KineticError::ZeroExperimentalRate { index: i });
        }
        let rel = (m - e) / e;
        sum += rel * rel;
    }
    Ok(sum)
}

/// Mean RSS with residuals multiplied by `amplification_factor` wherever the
/// extent is below `extent_limit`.
pub fn rss_small_extent_amplified(
    model_rate: &[f64],
    experimental_rate: &[f64],
    extent: &[f64],
    extent_limit: f64,
    amplification_factor: f64,
) -> f64 {
    let sum: f64 = model_rate
        .iter()
        .zip(experimental_rate)
        .zip(extent)
        .map(|((&m, &e), &a)| {
            let mut diff = m - e;
            if a < extent_limit {
                diff *= amplification_factor;
            }
            diff * diff
        })
        .sum();
    sum / model_rate.len() as f64
}

/// Mean RSS with residuals multiplied by `amplification_factor` wherever the
/// experimental rate is below `max(experimental_rate) / fraction_to_amplify`.
pub fn rss_small_rate_zones_amplified(
    model_rate: &[f64],
    experimental_rate: &[f64],
    fraction_to_amplify: f64,
    amplification_factor: f64,
) -> f64 {
    let max_rate = experimental_rate.iter().copied().fold(f64::MIN, f64::max);
    let threshold = max_rate / fraction_to_amplify;

    let sum: f64 = model_rate
        .iter()
        .zip(experimental_rate)
        .map(|(&m, &e)| {
            let mut diff = m - e;
            if e < threshold {
                diff *= amplification_factor;
            }
            diff * diff
        })
        .sum();
    sum / model_rate.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::laws::{Composition, RateLaw};
    use crate::math::linspace;
    use crate::simulate::simulate;
    use approx::assert_relative_eq;

    // Fixture: model 2t²+t+1 against a "true" series t²+t+1 at t = [0, 1, 2].
    // Diffs are 0, 1, 4.
    const MODEL: [f64; 3] = [1.0, 4.0, 11.0];
    const TRUE: [f64; 3] = [1.0, 3.0, 7.0];

    #[test]
    fn standard_rss_sums_squared_diffs() {
        assert_relative_eq!(rss_standard(&MODEL, &TRUE), 17.0);
    }

    #[test]
    fn mean_rss_divides_by_sample_count() {
        assert_relative_eq!(rss_mean(&MODEL, &TRUE), 17.0 / 3.0);
    }

    #[test]
    fn perfect_fit_scores_exactly_zero() {
        assert_eq!(rss_standard(&TRUE, &TRUE), 0.0);
        assert_eq!(rss_mean(&TRUE, &TRUE), 0.0);
        assert_eq!(rss_relative(&TRUE, &TRUE).unwrap(), 0.0);
    }

    #[test]
    fn relative_rss_sums_squared_relative_errors() {
        // Three equal relative errors of 0.1.
        let model = [0.9, 1.8, 3.6];
        let experimental = [1.0, 2.0, 4.0];
        assert_relative_eq!(
            rss_relative(&model, &experimental).unwrap(),
            0.03,
            max_relative = 1e-12
        );
    }

    #[test]
    fn relative_rss_fails_on_zero_experimental_value() {
        let err = rss_relative(&[1.0, 2.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            KineticError::ZeroExperimentalRate { index: 1 }
        ));
    }

    #[test]
    fn small_extent_amplification_scales_early_residuals() {
        let model = [0.9, 0.9, 0.9];
        let experimental = [1.0, 1.0, 1.0];
        let extent = [0.1, 0.5, 0.9];
        // First residual is doubled: ((0.2)² + (0.1)² + (0.1)²) / 3 = 0.02.
        let rss = rss_small_extent_amplified(&model, &experimental, &extent, 0.3, 2.0);
        assert_relative_eq!(rss, 0.02, max_relative = 1e-12);
    }

    #[test]
    fn small_rate_zones_amplify_below_the_threshold() {
        let experimental = [0.1, 1.0, 2.0];
        let model = [0.2, 1.1, 2.1];
        // Threshold = 2.0/4 = 0.5, so only the first residual is doubled:
        // ((0.2)² + (0.1)² + (0.1)²) / 3 = 0.02.
        let rss = rss_small_rate_zones_amplified(&model, &experimental, 4.0, 2.0);
        assert_relative_eq!(rss, 0.02, max_relative = 1e-12);
    }

    #[test]
    fn true_parameters_score_zero_against_their_own_simulation() {
        // Simulate a single heating rate with known parameters, then score
        // those same parameters against the simulated rate.
        let composition = Composition::RateOnly {
            rate: RateLaw::NthOrder,
        };
        let params = [1e10, 70_000.0, 1.0];
        let n = 2_000;
        let time = linspace(0.0, 1_800.0, n);
        let temperature = linspace(293.0, 443.0, n);

        let trace = simulate(&time, &temperature, &composition, &params, &[], 0.0).unwrap();

        let inputs = ModelInputs {
            composition: &composition,
            extent: &trace.extent,
            temperature: &temperature,
            tg_params: &[],
        };
        let chemical = trace.chemical_rate.as_ref().unwrap();
        let value = cost(&CostKind::Standard, &params, chemical, &inputs).unwrap();
        assert!(value.abs() < 1e-20, "perfect fit should score ~0, got {value}");
    }
}
