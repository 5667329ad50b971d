//! Kinetic simulation: time-marching integration of a composed model.

pub mod integrator;

pub use integrator::*;
