//! Nearest-value search in sorted series.

use crate::error::KineticError;

/// Find the sample closest to `target` in an ascending-sorted series.
///
/// Returns `(index, value)`. When two samples are equally close, the smaller
/// one wins, so repeated searches are deterministic.
///
/// Searching an empty series is a precondition violation, not a soft miss.
pub fn find_closest(
    target: f64,
    sorted: &[f64],
    context: &'static str,
) -> Result<(usize, f64), KineticError> {
    if sorted.is_empty() {
        return Err(KineticError::EmptySeries { context });
    }

    // Index of the first element >= target.
    let insert = sorted.partition_point(|&v| v < target);

    if insert == 0 {
        return Ok((0, sorted[0]));
    }
    if insert == sorted.len() {
        return Ok((sorted.len() - 1, sorted[sorted.len() - 1]));
    }

    let (prev, next) = (sorted[insert - 1], sorted[insert]);
    if next - target < target - prev {
        Ok((insert, next))
    } else {
        Ok((insert - 1, prev))
    }
}
