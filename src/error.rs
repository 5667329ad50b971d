//! Crate-wide error type.
//!
//! Three families of failures exist:
//!
//! - configuration errors (wrong parameter-vector length, missing rate
//!   series, invalid grids) — the request itself is malformed
//! - numerical precondition violations (autocatalytic extent at 0, relative
//!   residual against a zero rate, conversion targets outside the data) —
//!   the request is well-formed but the math is undefined for these inputs
//! - convergence failures — a minimizer ran out of budget; its diagnostics
//!   are carried verbatim so the caller can decide what to do
//!
//! Every variant carries enough context (law, bound, index) to diagnose the
//! failure without re-running. Nothing here is retried internally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KineticError {
    /// A single law received the wrong number of parameters.
    #[error("The {law} law takes {expected} parameter(s) but {actual} were supplied.")]
    ParameterCount {
        law: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The fitted parameter vector does not match the composition's layout.
    #[error(
        "The parameter vector has length {actual} but the active laws consume \
         {expected} fitted parameter(s) (rate, then vitrification, then coupling)."
    )]
    ParameterVectorLength { expected: usize, actual: usize },

    /// Two arrays that must be sampled on the same grid differ in length.
    #[error("{context}: expected {expected} samples, got {actual}.")]
    MismatchedLengths {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Catch-all for malformed inputs (empty grids, non-finite options, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Friedman analysis was requested on experiments without rate data.
    #[error("Experiment {experiment} has no rate series, which the {method} method requires.")]
    MissingRateSeries {
        method: &'static str,
        experiment: usize,
    },

    /// An autocatalytic rate law was evaluated at extent <= 0.
    ///
    /// The rate would be exactly 0 there and could never recover, so the
    /// simulation would silently freeze instead of reacting.
    #[error(
        "Autocatalytic rate law evaluated at extent {extent} (sample {index}): \
         extent must be strictly positive, otherwise the rate is 0 forever and \
         no reaction can occur."
    )]
    AutocatalyticExtent { extent: f64, index: usize },

    /// The relative residual divides by an experimental rate of 0.
    #[error("Relative residual is undefined: experimental rate at sample {index} is 0.")]
    ZeroExperimentalRate { index: usize },

    /// Friedman regression needs ln(rate), so rates must be positive.
    #[error(
        "Cannot take ln of rate {rate} at conversion {conversion} in experiment \
         {experiment}; the Friedman regression requires strictly positive rates."
    )]
    NonPositiveRate {
        rate: f64,
        conversion: f64,
        experiment: usize,
    },

    /// A target conversion lies below the range covered by an experiment.
    #[error(
        "The minimum conversion to analyze ({requested}) is lower than the \
         minimum in experiment {experiment} ({data_min}). Increase the minimum \
         conversion."
    )]
    ConversionBelowData {
        requested: f64,
        data_min: f64,
        experiment: usize,
    },

    /// A target conversion lies above the range covered by an experiment.
    #[error(
        "The maximum conversion to analyze ({requested}) is higher than the \
         maximum in experiment {experiment} ({data_max}). Lower the maximum \
         conversion."
    )]
    ConversionAboveData {
        requested: f64,
        data_max: f64,
        experiment: usize,
    },

    /// The first analysis point sits too close to the start of the data for
    /// interval-based integration.
    #[error(
        "The minimum conversion of the analysis grid is too low: current \
         minimum = {current}, minimum allowed = {minimum_allowed}. Increase the \
         minimum conversion to analyze."
    )]
    AnalysisMinTooLow { current: f64, minimum_allowed: f64 },

    /// The last analysis point exceeds what the data can support for the
    /// requested number of points.
    #[error(
        "The maximum conversion of the analysis grid is too high: current \
         maximum = {current}, maximum allowed for {points} points = \
         {maximum_allowed}. Decrease the maximum conversion to analyze."
    )]
    AnalysisMaxTooHigh {
        current: f64,
        maximum_allowed: f64,
        points: usize,
    },

    /// The analysis grid is finer than the experimental conversion grid, so
    /// integration intervals would overlap or collapse.
    #[error(
        "The step between analysis points ({current}) is smaller than the \
         coarsest step between experimental conversions ({minimum}). Reduce the \
         number of analysis points."
    )]
    AnalysisStepTooSmall { current: f64, minimum: f64 },

    /// A nearest-value search was attempted on an empty series.
    #[error("Cannot search for a value in an empty series ({context}).")]
    EmptySeries { context: &'static str },

    /// An integration interval contains too few samples for a trapezoidal sum.
    #[error(
        "Integration interval {interval} of experiment {experiment} contains \
         {samples} sample(s); at least 2 are required."
    )]
    DegenerateInterval {
        interval: usize,
        experiment: usize,
        samples: usize,
    },

    /// The in-core scalar search failed to bracket or converge.
    #[error(
        "Scalar minimization failed while {context} after {iterations} \
         iteration(s): {message}"
    )]
    ConvergenceFailure {
        context: String,
        iterations: u64,
        message: String,
    },

    /// The external minimizer reported a failure; its message is verbatim.
    #[error("Minimizer failure: {message}")]
    Minimizer { message: String },

    /// The caller's progress callback requested a stop between points.
    #[error("Analysis cancelled by the caller after {completed} point(s).")]
    Cancelled { completed: usize },
}
