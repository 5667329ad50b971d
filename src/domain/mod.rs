//! Domain types shared across the crate.
//!
//! This module defines:
//!
//! - validated experimental trajectories (`Experiment`)
//! - simulator output (`SimulationTrace`)
//! - isoconversional output (`IsoMethod`, `IsoconversionalResult`)

pub mod types;

pub use types::*;
