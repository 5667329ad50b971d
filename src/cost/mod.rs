//! Cost functions scoring a candidate parameter set against experimental
//! rate data.
//!
//! Responsibilities:
//!
//! - compose the active laws into a predicted rate series over the
//!   experimental (extent, temperature) state (`model`)
//! - reduce the residual between predicted and experimental rates into a
//!   scalar (`rss`)
//!
//! Everything here is a pure function of its inputs, so a minimizer may
//! re-evaluate any point, in any order, from any thread.

pub mod model;
pub mod rss;

pub use model::*;
pub use rss::*;
