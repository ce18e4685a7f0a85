//! Continuation policy shared by the Ralph Loop and the score loop
//!
//! Works on plain `f64` so the same rule applies to dope levels (0-5) and to
//! aggregate PMF scores (0-10).

/// Whether another refinement pass is warranted
///
/// Stops once the iteration budget is spent or the level has reached the
/// threshold, whichever comes first.
pub fn should_continue(level: f64, iteration_index: u32, max_iterations: u32, threshold: f64) -> bool {
    if iteration_index >= max_iterations {
        return false;
    }
    level < threshold
}
