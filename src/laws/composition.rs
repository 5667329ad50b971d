//! Model composition and parameter-vector layout.
//!
//! Law categories depend on each other: a vitrification law needs a Tg law to
//! supply its Tg input, and a coupling law needs both a chemical rate and a
//! vitrification rate to combine. `Composition` encodes the valid
//! combinations as a sum type, so an invalid request (e.g. coupling without
//! vitrification) cannot be constructed at all — there is nothing to validate
//! mid-loop.

use std::ops::Range;

use crate::error::KineticError;
use crate::laws::{CouplingLaw, RateLaw, TgLaw, VitrificationLaw};

/// A valid combination of kinetic laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    /// Purely chemical kinetics.
    RateOnly { rate: RateLaw },
    /// Chemical kinetics with Tg tracked alongside (Tg does not feed back
    /// into the rate without a vitrification law).
    RateWithTg { rate: RateLaw, tg: TgLaw },
    /// Diffusion-limited kinetics only: the vitrification rate drives the
    /// extent update directly.
    VitrificationOnly {
        vitrification: VitrificationLaw,
        tg: TgLaw,
    },
    /// Full model: chemical and vitrification rates combined by a coupling
    /// law into the global rate.
    Coupled {
        rate: RateLaw,
        vitrification: VitrificationLaw,
        tg: TgLaw,
        coupling: CouplingLaw,
    },
}

impl Composition {
    pub fn rate_law(&self) -> Option<RateLaw> {
        match *self {
            Composition::RateOnly { rate }
            | Composition::RateWithTg { rate, .. }
            | Composition::Coupled { rate, .. } => Some(rate),
            Composition::VitrificationOnly { .. } => None,
        }
    }

    pub fn vitrification_law(&self) -> Option<VitrificationLaw> {
        match *self {
            Composition::VitrificationOnly { vitrification, .. }
            | Composition::Coupled { vitrification, .. } => Some(vitrification),
            _ => None,
        }
    }

    pub fn tg_law(&self) -> Option<TgLaw> {
        match *self {
            Composition::RateWithTg { tg, .. }
            | Composition::VitrificationOnly { tg, .. }
            | Composition::Coupled { tg, .. } => Some(tg),
            Composition::RateOnly { .. } => None,
        }
    }

    pub fn coupling_law(&self) -> Option<CouplingLaw> {
        match *self {
            Composition::Coupled { coupling, .. } => Some(coupling),
            _ => None,
        }
    }

    /// Compute the positional layout of the fitted parameter vector.
    ///
    /// The ordering contract is fixed: rate-law parameters first, then
    /// vitrification-law parameters, then coupling-law parameters. Tg
    /// parameters are not fitted and never appear in the vector.
    pub fn param_layout(&self) -> ParamLayout {
        let r = self.rate_law().map_or(0, RateLaw::param_len);
        let v = self.vitrification_law().map_or(0, VitrificationLaw::param_len);
        let c = self.coupling_law().map_or(0, CouplingLaw::param_len);
        ParamLayout {
            rate: 0..r,
            vitrification: r..r + v,
            coupling: r + v..r + v + c,
        }
    }
}

/// Positional slices of the fitted parameter vector, computed once per
/// composition. All call sites slice through this struct rather than
/// recomputing offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamLayout {
    pub rate: Range<usize>,
    pub vitrification: Range<usize>,
    pub coupling: Range<usize>,
}

impl ParamLayout {
    /// Total fitted parameter count.
    pub fn total(&self) -> usize {
        self.coupling.end
    }

    /// Check a candidate parameter vector against this layout.
    pub fn check(&self, params: &[f64]) -> Result<(), KineticError> {
        if params.len() != self.total() {
            return Err(KineticError::ParameterVectorLength {
                expected: self.total(),
                actual: params.len(),
            });
        }
        Ok(())
    }

    pub fn rate_slice<'a>(&self, params: &'a [f64]) -> &'a [f64] {
        &params[self.rate.clone()]
    }

    pub fn vitrification_slice<'a>(&self, params: &'a [f64]) -> &'a [f64] {
        &params[self.vitrification.clone()]
    }

    pub fn coupling_slice<'a>(&self, params: &'a [f64]) -> &'a [f64] {
        &params[self.coupling.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_only_layout_is_just_the_rate_slice() {
        let layout = Composition::RateOnly {
            rate: RateLaw::Kamal,
        }
        .param_layout();
        assert_eq!(layout.total(), 6);
        assert_eq!(layout.rate, 0..6);
        assert!(layout.vitrification.is_empty());
        assert!(layout.coupling.is_empty());
    }

    #[test]
    fn coupled_layout_orders_rate_then_vitrification_then_coupling() {
        let layout = Composition::Coupled {
            rate: RateLaw::NthOrder,
            vitrification: VitrificationLaw::Wlf,
            tg: TgLaw::DiBenedetto,
            coupling: CouplingLaw::HarmonicMean,
        }
        .param_layout();
        assert_eq!(layout.rate, 0..3);
        assert_eq!(layout.vitrification, 3..6);
        assert_eq!(layout.coupling, 6..6);
        assert_eq!(layout.total(), 6);

        let params: Vec<f64> = (0..6).map(f64::from).collect();
        assert_eq!(layout.rate_slice(&params), &[0.0, 1.0, 2.0]);
        assert_eq!(layout.vitrification_slice(&params), &[3.0, 4.0, 5.0]);
        assert!(layout.coupling_slice(&params).is_empty());
    }

    #[test]
    fn layout_check_rejects_wrong_vector_length() {
        let layout = Composition::RateOnly {
            rate: RateLaw::NthOrder,
        }
        .param_layout();
        let err = layout.check(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            KineticError::ParameterVectorLength {
                expected: 3,
                actual: 2
            }
        ));
    }
}
