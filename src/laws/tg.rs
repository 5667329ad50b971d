//! Glass-transition temperature laws.

use crate::error::KineticError;

/// Closed registry of Tg laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TgLaw {
    /// DiBenedetto equation,
    /// `Tg = Tg0 + (Tg∞ - Tg0)·λα / (1 - (1-λ)α)`,
    /// params `(Tg0, Tg∞, λ)` with λ the ratio of isobaric heat-capacity
    /// changes of the fully reacted and unreacted material.
    DiBenedetto,
}

impl TgLaw {
    /// Human-readable label for errors and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            TgLaw::DiBenedetto => "DiBenedetto",
        }
    }

    /// Number of parameters this law consumes. Tg parameters are fixed model
    /// inputs, not part of the fitted parameter vector.
    pub fn param_len(self) -> usize {
        match self {
            TgLaw::DiBenedetto => 3,
        }
    }

    /// Evaluate Tg at a single extent.
    pub fn tg(self, extent: f64, params: &[f64]) -> Result<f64, KineticError> {
        let &[tg_0, tg_inf, coeff] = params else {
            return Err(KineticError::ParameterCount {
                law: self.display_name(),
                expected: self.param_len(),
                actual: params.len(),
            });
        };
        Ok(tg_0 + (tg_inf - tg_0) * (coeff * extent) / (1.0 - (1.0 - coeff) * extent))
    }

    /// Evaluate Tg over an extent series.
    pub fn tg_series(self, extent: &[f64], params: &[f64]) -> Result<Vec<f64>, KineticError> {
        extent.iter().map(|&a| self.tg(a, params)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PARAMS: [f64; 3] = [173.15, 373.15, 0.4];

    #[test]
    fn dibenedetto_interpolates_between_limits() {
        let tg0 = TgLaw::DiBenedetto.tg(0.0, &PARAMS).unwrap();
        let tg1 = TgLaw::DiBenedetto.tg(1.0, &PARAMS).unwrap();
        assert_relative_eq!(tg0, 173.15);
        assert_relative_eq!(tg1, 373.15, max_relative = 1e-12);

        let mid = TgLaw::DiBenedetto.tg(0.5, &PARAMS).unwrap();
        assert!(mid > tg0 && mid < tg1);
    }

    #[test]
    fn dibenedetto_is_monotone_in_extent() {
        let series = TgLaw::DiBenedetto
            .tg_series(&[0.0, 0.2, 0.4, 0.6, 0.8, 1.0], &PARAMS)
            .unwrap();
        for w in series.windows(2) {
            assert!(w[1] > w[0]);
        }
    }
}
