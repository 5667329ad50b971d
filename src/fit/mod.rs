//! Optimization driver.
//!
//! Responsibilities:
//!
//! - define the [`Minimizer`] contract the core expects from any external
//!   optimization capability
//! - adapt the `argmin` Nelder-Mead solver to that contract
//! - orchestrate fits: build the objective from a cost kind + model inputs,
//!   run one or many starts, select the best outcome deterministically
//!
//! The specific search algorithm is deliberately opaque to the rest of the
//! crate; everything downstream only sees `MinimizeOutcome`.

pub mod driver;
pub mod minimizer;
pub mod nelder_mead;

pub use driver::*;
pub use minimizer::*;
pub use nelder_mead::*;
