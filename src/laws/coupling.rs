//! Coupling laws combining chemical and vitrification rates.
//!
//! The harmonic mean `1/(1/kc + 1/kv)` is undefined when either contributor
//! is exactly 0. Physically a zero contributor means that branch is fully
//! rate-limiting, so both coupling variants short-circuit to 0 in that case
//! instead of propagating an infinity.

use crate::error::KineticError;

/// Closed registry of coupling laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouplingLaw {
    /// `dα/dt = 1 / (1/kc + 1/kv)`.
    HarmonicMean,
    /// `dα/dt = kc·kv`.
    Product,
}

impl CouplingLaw {
    /// Human-readable label for errors and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            CouplingLaw::HarmonicMean => "harmonic mean",
            CouplingLaw::Product => "product",
        }
    }

    /// Number of fitted parameters this law consumes from the parameter
    /// vector. Both built-in couplings are parameter-free.
    pub fn param_len(self) -> usize {
        match self {
            CouplingLaw::HarmonicMean | CouplingLaw::Product => 0,
        }
    }

    /// Combine a chemical rate and a vitrification rate.
    pub fn combine(
        self,
        chemical_rate: f64,
        vitrification_rate: f64,
        params: &[f64],
    ) -> Result<f64, KineticError> {
        if params.len() != self.param_len() {
            return Err(KineticError::ParameterCount {
                law: self.display_name(),
                expected: self.param_len(),
                actual: params.len(),
            });
        }
        match self {
            CouplingLaw::HarmonicMean => {
                if chemical_rate == 0.0 || vitrification_rate == 0.0 {
                    Ok(0.0)
                } else {
                    Ok(1.0 / (1.0 / chemical_rate + 1.0 / vitrification_rate))
                }
            }
            CouplingLaw::Product => Ok(chemical_rate * vitrification_rate),
        }
    }

    /// Combine aligned chemical/vitrification rate series.
    pub fn combine_series(
        self,
        chemical_rate: &[f64],
        vitrification_rate: &[f64],
        params: &[f64],
    ) -> Result<Vec<f64>, KineticError> {
        if vitrification_rate.len() != chemical_rate.len() {
            return Err(KineticError::MismatchedLengths {
                context: "Coupling law vitrification series",
                expected: chemical_rate.len(),
                actual: vitrification_rate.len(),
            });
        }
        chemical_rate
            .iter()
            .zip(vitrification_rate)
            .map(|(&kc, &kv)| self.combine(kc, kv, params))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn harmonic_mean_of_equal_rates_halves_them() {
        let r = CouplingLaw::HarmonicMean.combine(2.0, 2.0, &[]).unwrap();
        assert_relative_eq!(r, 1.0);
    }

    #[test]
    fn harmonic_mean_is_dominated_by_the_slower_branch() {
        let r = CouplingLaw::HarmonicMean.combine(1e-6, 10.0, &[]).unwrap();
        assert!(r < 1e-6);
    }

    #[test]
    fn zero_contributor_short_circuits_to_zero() {
        assert_eq!(CouplingLaw::HarmonicMean.combine(0.0, 5.0, &[]).unwrap(), 0.0);
        assert_eq!(CouplingLaw::HarmonicMean.combine(5.0, 0.0, &[]).unwrap(), 0.0);
    }

    #[test]
    fn product_multiplies_contributors() {
        let r = CouplingLaw::Product.combine(2.0, 3.0, &[]).unwrap();
        assert_relative_eq!(r, 6.0);
    }
}
