//! Linear re-sampling of experiments over conversion.

use crate::domain::Experiment;
use crate::error::KineticError;
use crate::math::linspace;

/// Conversion range shared by every experiment: the highest first sample to
/// the lowest last sample. Interpolating inside this range never requires
/// extrapolation for any experiment.
pub fn interpolation_limits(experiments: &[Experiment]) -> Result<(f64, f64), KineticError> {
    if experiments.is_empty() {
        return Err(KineticError::EmptySeries {
            context: "interpolation limits",
        });
    }
    let mut minimum = f64::MIN;
    let mut maximum = f64::MAX;
    for exp in experiments {
        let extent = exp.extent();
        minimum = minimum.max(extent[0]);
        maximum = maximum.min(extent[extent.len() - 1]);
    }
    if minimum >= maximum {
        return Err(KineticError::InvalidInput(format!(
            "Experiments share no conversion range (computed limits {minimum}..{maximum})."
        )));
    }
    Ok((minimum, maximum))
}

/// Keep only samples where conversion strictly increases.
///
/// Interpolating over conversion needs a strictly increasing abscissa, but
/// measured conversions plateau (and dither) near the start and end of a
/// scan. Sample `i` survives when `conversion[i] < conversion[i+1]`; the
/// last sample always survives.
pub fn strictly_increasing_indices(conversion: &[f64]) -> Vec<usize> {
    let mut keep: Vec<usize> = (0..conversion.len().saturating_sub(1))
        .filter(|&i| conversion[i] < conversion[i + 1])
        .collect();
    if !conversion.is_empty() {
        keep.push(conversion.len() - 1);
    }
    keep
}

/// Piecewise-linear interpolation of `ys` (sampled at strictly increasing
/// `xs`) at `x`. `x` must lie within `[xs[0], xs[last]]`.
pub fn lerp_series(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(x >= xs[0] && x <= xs[xs.len() - 1]);

    // First knot >= x; x lies in the segment ending there.
    let hi = xs.partition_point(|&v| v < x).max(1).min(xs.len() - 1);
    let lo = hi - 1;
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + t * (ys[hi] - ys[lo])
}

/// Re-sample every experiment onto one shared conversion grid of
/// `number_of_points` levels by linear interpolation.
///
/// Time, temperature and (when present) rate are interpolated as functions
/// of conversion; the returned experiments all share the same extent series.
pub fn resample_linear(
    experiments: &[Experiment],
    number_of_points: usize,
) -> Result<Vec<Experiment>, KineticError> {
    resample_with(experiments, number_of_points, |xs, ys, grid| {
        Ok(grid.iter().map(|&x| lerp_series(xs, ys, x)).collect())
    })
}

/// Shared scaffolding for linear and cubic re-sampling: compute the common
/// grid, drop non-increasing conversion segments, and rebuild experiments
/// through the supplied 1-D interpolator.
pub(crate) fn resample_with(
    experiments: &[Experiment],
    number_of_points: usize,
    interpolate: impl Fn(&[f64], &[f64], &[f64]) -> Result<Vec<f64>, KineticError>,
) -> Result<Vec<Experiment>, KineticError> {
    if number_of_points < 2 {
        return Err(KineticError::InvalidInput(
            "Re-sampling requires at least 2 points.".into(),
        ));
    }
    let (minimum, maximum) = interpolation_limits(experiments)?;
    let grid = linspace(minimum, maximum, number_of_points);

    let mut resampled = Vec::with_capacity(experiments.len());
    for exp in experiments {
        let keep = strictly_increasing_indices(exp.extent());
        if keep.len() < 2 {
            return Err(KineticError::InvalidInput(
                "An experiment has fewer than 2 strictly increasing conversion samples.".into(),
            ));
        }
        let pick = |series: &[f64]| keep.iter().map(|&i| series[i]).collect::<Vec<f64>>();

        let conversion = pick(exp.extent());
        let time = interpolate(&conversion, &pick(exp.time()), &grid)?;
        let temperature = interpolate(&conversion, &pick(exp.temperature()), &grid)?;
        let rate = match exp.rate() {
            Some(rate) => Some(interpolate(&conversion, &pick(rate), &grid)?),
            None => None,
        };

        resampled.push(Experiment::new(time, temperature, rate, grid.clone())?);
    }
    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_experiment(slope: f64, n: usize) -> Experiment {
        // conversion = t/n-ish, temperature linear in conversion.
        let time: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let extent: Vec<f64> = (0..n).map(|i| i as f64 / (n as f64 - 1.0)).collect();
        let temperature: Vec<f64> = extent.iter().map(|&a| 300.0 + slope * a).collect();
        let rate: Vec<f64> = extent.iter().map(|&a| 1.0 + a).collect();
        Experiment::new(time, temperature, Some(rate), extent).unwrap()
    }

    #[test]
    fn lerp_recovers_linear_data_exactly() {
        let xs = [0.0, 1.0, 2.0, 4.0];
        let ys = [1.0, 3.0, 5.0, 9.0]; // y = 1 + 2x
        for x in [0.0, 0.5, 1.7, 3.9, 4.0] {
            assert_relative_eq!(lerp_series(&xs, &ys, x), 1.0 + 2.0 * x, max_relative = 1e-12);
        }
    }

    #[test]
    fn strictly_increasing_filter_drops_plateaus() {
        let conversion = [0.0, 0.0, 0.1, 0.2, 0.2, 0.3, 0.3];
        let keep = strictly_increasing_indices(&conversion);
        // Samples kept: those strictly below their successor, plus the last.
        assert_eq!(keep, vec![1, 2, 4, 6]);
        let filtered: Vec<f64> = keep.iter().map(|&i| conversion[i]).collect();
        for w in filtered.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn resample_produces_a_shared_conversion_grid() {
        let experiments = vec![linear_experiment(100.0, 50), linear_experiment(200.0, 80)];
        let resampled = resample_linear(&experiments, 25).unwrap();

        assert_eq!(resampled.len(), 2);
        assert_eq!(resampled[0].extent(), resampled[1].extent());
        assert_eq!(resampled[0].len(), 25);

        // Temperature was linear in conversion, so it must be recovered
        // exactly on the new grid.
        for exp_idx in 0..2 {
            let slope = if exp_idx == 0 { 100.0 } else { 200.0 };
            let exp = &resampled[exp_idx];
            for (a, t) in exp.extent().iter().zip(exp.temperature()) {
                assert_relative_eq!(*t, 300.0 + slope * a, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn limits_use_the_shared_range() {
        let a = Experiment::new(
            vec![0.0, 1.0, 2.0],
            vec![300.0; 3],
            None,
            vec![0.1, 0.5, 0.9],
        )
        .unwrap();
        let b = Experiment::new(
            vec![0.0, 1.0, 2.0],
            vec![300.0; 3],
            None,
            vec![0.2, 0.5, 0.8],
        )
        .unwrap();
        let (lo, hi) = interpolation_limits(&[a, b]).unwrap();
        assert_relative_eq!(lo, 0.2);
        assert_relative_eq!(hi, 0.8);
    }
}
