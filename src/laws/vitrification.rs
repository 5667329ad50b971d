//! Vitrification (diffusion-limited) rate laws.
//!
//! Both variants are WLF-shaped; they differ in what happens below the glass
//! transition. That policy is part of a law's identity, not a flag: a
//! composition picks one variant or the other.

use crate::error::KineticError;

/// Closed registry of vitrification laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitrificationLaw {
    /// WLF-shaped term `kv = Ad·exp(C1·(T-Tg) / (C2 + |T-Tg|))`, params
    /// `(Ad, C1, C2)`. Produces a (small) nonzero rate below Tg.
    Wlf,
    /// Same expression as [`VitrificationLaw::Wlf`] for `T > Tg`, but exactly
    /// 0 at and below Tg: no reaction in the glassy state.
    WlfNoReactionBelowTg,
}

impl VitrificationLaw {
    /// Human-readable label for errors and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            VitrificationLaw::Wlf => "WLF",
            VitrificationLaw::WlfNoReactionBelowTg => "WLF (no reaction below Tg)",
        }
    }

    /// Number of fitted parameters this law consumes from the parameter
    /// vector.
    pub fn param_len(self) -> usize {
        match self {
            VitrificationLaw::Wlf | VitrificationLaw::WlfNoReactionBelowTg => 3,
        }
    }

    /// Evaluate the vitrification rate at a single (temperature, Tg) state.
    pub fn rate(self, temperature: f64, tg: f64, params: &[f64]) -> Result<f64, KineticError> {
        let &[ad, c1, c2] = params else {
            return Err(KineticError::ParameterCount {
                law: self.display_name(),
                expected: self.param_len(),
                actual: params.len(),
            });
        };
        let dt = temperature - tg;
        match self {
            VitrificationLaw::Wlf => Ok(ad * (c1 * dt / (c2 + dt.abs())).exp()),
            VitrificationLaw::WlfNoReactionBelowTg => {
                if temperature > tg {
                    Ok(ad * (c1 * dt / (c2 + dt.abs())).exp())
                } else {
                    Ok(0.0)
                }
            }
        }
    }

    /// Evaluate the vitrification rate over aligned temperature/Tg series.
    pub fn rate_series(
        self,
        temperature: &[f64],
        tg: &[f64],
        params: &[f64],
    ) -> Result<Vec<f64>, KineticError> {
        if tg.len() != temperature.len() {
            return Err(KineticError::MismatchedLengths {
                context: "Vitrification law Tg series",
                expected: temperature.len(),
                actual: tg.len(),
            });
        }
        temperature
            .iter()
            .zip(tg)
            .map(|(&t, &g)| self.rate(t, g, params))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // WLF constants from the Wisanrakkit & Gillham amine/epoxy system.
    const PARAMS: [f64; 3] = [30.64, 42.61, 51.6];

    #[test]
    fn wlf_variants_agree_above_tg() {
        let a = VitrificationLaw::Wlf.rate(420.0, 380.0, &PARAMS).unwrap();
        let b = VitrificationLaw::WlfNoReactionBelowTg
            .rate(420.0, 380.0, &PARAMS)
            .unwrap();
        assert_relative_eq!(a, b);
        assert!(a > 0.0);
    }

    #[test]
    fn clamped_variant_is_zero_below_tg() {
        let a = VitrificationLaw::Wlf.rate(350.0, 380.0, &PARAMS).unwrap();
        let b = VitrificationLaw::WlfNoReactionBelowTg
            .rate(350.0, 380.0, &PARAMS)
            .unwrap();
        assert!(a > 0.0, "plain WLF stays nonzero below Tg");
        assert_eq!(b, 0.0);
    }
}
