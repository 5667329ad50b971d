//! `kinfit` — kinetic model fitting and isoconversional analysis for
//! thermal-analysis data.
//!
//! The crate is a pure computational core, organized so that:
//!
//! - laws compose into models without per-law special cases (`laws`)
//! - the simulator, cost functions and analysis engines stay stateless and
//!   re-entrant, so any minimizer may probe them concurrently (`simulate`,
//!   `cost`, `isoconv`)
//! - the optimization algorithm itself stays behind a small trait (`fit`)
//!
//! Data acquisition, file formats and presentation live with the caller;
//! this crate only consumes validated numeric series and returns owned
//! results.

pub mod cost;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod interp;
pub mod isoconv;
pub mod laws;
pub mod math;
pub mod simulate;
