//! Shared domain types.
//!
//! Result types are kept serializable so they can be exported to JSON/CSV and
//! reloaded later for plotting or comparisons; the heavy in-memory types
//! (`Experiment`, `SimulationTrace`) are plain owned arrays.

use serde::{Deserialize, Serialize};

use crate::error::KineticError;

/// One heating program's worth of experimental data.
///
/// Invariants, checked once at construction and relied upon everywhere else:
///
/// - all series have the same length
/// - `time` is strictly increasing
/// - `extent` is non-decreasing and stays within `[0, 1]`
///
/// The rate series is optional because integral isoconversional methods
/// (Vyazovkin and its advanced variant) never look at it; the Friedman method
/// rejects experiments without one.
///
/// Fields are private so a constructed `Experiment` can never violate its
/// invariants; the crate only ever borrows from it.
#[derive(Debug, Clone)]
pub struct Experiment {
    time: Vec<f64>,
    temperature: Vec<f64>,
    rate: Option<Vec<f64>>,
    extent: Vec<f64>,
}

impl Experiment {
    pub fn new(
        time: Vec<f64>,
        temperature: Vec<f64>,
        rate: Option<Vec<f64>>,
        extent: Vec<f64>,
    ) -> Result<Self, KineticError> {
        let n = time.len();
        if n == 0 {
            return Err(KineticError::InvalidInput(
                "An experiment must contain at least one sample.".into(),
            ));
        }
        if temperature.len() != n {
            return Err(KineticError::MismatchedLengths {
                context: "Experiment temperature series",
                expected: n,
                actual: temperature.len(),
            });
        }
        if extent.len() != n {
            return Err(KineticError::MismatchedLengths {
                context: "Experiment extent series",
                expected: n,
                actual: extent.len(),
            });
        }
        if let Some(rate) = &rate {
            if rate.len() != n {
                return Err(KineticError::MismatchedLengths {
                    context: "Experiment rate series",
                    expected: n,
                    actual: rate.len(),
                });
            }
        }
        for w in time.windows(2) {
            if !(w[1] > w[0]) {
                return Err(KineticError::InvalidInput(format!(
                    "Time must be strictly increasing; found {} followed by {}.",
                    w[0], w[1]
                )));
            }
        }
        for (i, &a) in extent.iter().enumerate() {
            if !(0.0..=1.0).contains(&a) {
                return Err(KineticError::InvalidInput(format!(
                    "Extent must stay within [0, 1]; sample {i} is {a}."
                )));
            }
        }
        for w in extent.windows(2) {
            if w[1] < w[0] {
                return Err(KineticError::InvalidInput(format!(
                    "Extent must be non-decreasing; found {} followed by {}.",
                    w[0], w[1]
                )));
            }
        }

        Ok(Self {
            time,
            temperature,
            rate,
            extent,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn rate(&self) -> Option<&[f64]> {
        self.rate.as_deref()
    }

    pub fn extent(&self) -> &[f64] {
        &self.extent
    }
}

/// Per-step arrays produced by one integrator run.
///
/// `extent` and `global_rate` are always present; `global_rate` is the rate
/// that actually drove the extent update (coupled rate, vitrification rate,
/// or chemical rate, depending on the composition). The remaining arrays are
/// present only when the corresponding law is active.
///
/// Traces are created fresh per call and carry no cross-call state.
#[derive(Debug, Clone)]
pub struct SimulationTrace {
    pub extent: Vec<f64>,
    pub global_rate: Vec<f64>,
    pub chemical_rate: Option<Vec<f64>>,
    pub vitrification_rate: Option<Vec<f64>>,
    pub tg: Option<Vec<f64>>,
}

/// Isoconversional method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsoMethod {
    Vyazovkin,
    AdvancedVyazovkin,
    Friedman,
}

impl IsoMethod {
    /// Human-readable label for reports.
    pub fn display_name(self) -> &'static str {
        match self {
            IsoMethod::Vyazovkin => "Vyazovkin",
            IsoMethod::AdvancedVyazovkin => "advanced Vyazovkin",
            IsoMethod::Friedman => "Friedman",
        }
    }
}

/// Activation energy as a function of conversion.
///
/// `conversion` and `activation_energy` are parallel arrays over the analysis
/// grid. The auxiliary arrays depend on the method:
///
/// - Friedman fills `intercept` (the regression intercept per point)
/// - advanced Vyazovkin fills `mean_time` / `mean_temperature` (averages of
///   the interval-end samples across experiments)
///
/// Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsoconversionalResult {
    pub method: IsoMethod,
    pub conversion: Vec<f64>,
    pub activation_energy: Vec<f64>,
    pub intercept: Option<Vec<f64>>,
    pub mean_time: Option<Vec<f64>>,
    pub mean_temperature: Option<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            vec![0.0, 1.0, 2.0],
            vec![300.0, 310.0, 320.0],
            vec![0.0, 0.4, 0.9],
        )
    }

    #[test]
    fn experiment_accepts_valid_series() {
        let (t, temp, ext) = grids();
        let exp = Experiment::new(t, temp, Some(vec![0.1, 0.2, 0.1]), ext).unwrap();
        assert_eq!(exp.len(), 3);
        assert!(exp.rate().is_some());
    }

    #[test]
    fn experiment_rejects_non_increasing_time() {
        let (_, temp, ext) = grids();
        let err = Experiment::new(vec![0.0, 2.0, 2.0], temp, None, ext).unwrap_err();
        assert!(matches!(err, KineticError::InvalidInput(_)));
    }

    #[test]
    fn experiment_rejects_extent_outside_unit_interval() {
        let (t, temp, _) = grids();
        let err = Experiment::new(t, temp, None, vec![0.0, 0.5, 1.2]).unwrap_err();
        assert!(matches!(err, KineticError::InvalidInput(_)));
    }

    #[test]
    fn experiment_rejects_decreasing_extent() {
        let (t, temp, _) = grids();
        let err = Experiment::new(t, temp, None, vec![0.0, 0.5, 0.4]).unwrap_err();
        assert!(matches!(err, KineticError::InvalidInput(_)));
    }

    #[test]
    fn experiment_rejects_mismatched_rate_length() {
        let (t, temp, ext) = grids();
        let err = Experiment::new(t, temp, Some(vec![0.1]), ext).unwrap_err();
        assert!(matches!(err, KineticError::MismatchedLengths { .. }));
    }
}
