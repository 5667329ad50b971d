//! Kinetic law registry and model composition.
//!
//! A global reaction model is assembled from up to four law categories:
//!
//! - rate laws: purely chemical kinetics, `dα/dt = f(α, T)`
//! - vitrification laws: diffusion/glass-transition-limited rate terms
//! - tg laws: glass-transition temperature as a function of extent
//! - coupling laws: combine chemical and vitrification rates
//!
//! Laws are closed enums so the simulator and cost functions can compose them
//! with an ordinary `match`, and each variant exposes its fixed parameter
//! arity via `param_len()`. All laws are pure functions of their inputs.

pub mod composition;
pub mod coupling;
pub mod rate;
pub mod tg;
pub mod vitrification;

pub use composition::*;
pub use coupling::*;
pub use rate::*;
pub use tg::*;
pub use vitrification::*;

/// Universal gas constant in J/(mol·K), as used inside the Arrhenius term of
/// the rate laws. The isoconversional module uses the rounded literature
/// value 8.314 instead; the two must not be mixed.
pub const GAS_CONSTANT: f64 = 8.31446261815324;

/// Arrhenius rate constant `k = A·exp(-Ea/(R·T))`.
pub fn arrhenius_rate_constant(temperature: f64, a: f64, ea: f64) -> f64 {
    a * (-ea / (GAS_CONSTANT * temperature)).exp()
}
