use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A clonable handle that interrupts a running [`Context`](crate::Context).
///
/// Objective callbacks typically capture a handle so they can end the run
/// from inside an evaluation. The stop takes effect once the current
/// evaluation returns; its score is still recorded.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Requests that the run stop after the current evaluation.
    pub fn force_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Absolute and relative tolerances on successive scores.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Tolerance {
    pub(crate) abs: Option<f64>,
    pub(crate) rel: Option<f64>,
}

impl Tolerance {
    pub(crate) fn is_set(&self) -> bool {
        self.abs.is_some() || self.rel.is_some()
    }

    /// Returns `true` if a tolerance is positive and can end a search on its own.
    ///
    /// A zero tolerance is set but never met by a non-zero difference.
    pub(crate) fn can_converge(&self) -> bool {
        self.abs.is_some_and(|abs| abs > 0.0) || self.rel.is_some_and(|rel| rel > 0.0)
    }

    /// Returns `true` if `old` and `new` are within tolerance of each other.
    ///
    /// Non-finite scores never converge.
    pub(crate) fn converged(&self, old: f64, new: f64) -> bool {
        if !old.is_finite() || !new.is_finite() {
            return false;
        }
        let diff = (new - old).abs();
        let abs_ok = self.abs.is_some_and(|abs| diff < abs);
        let rel_ok = self
            .rel
            .is_some_and(|rel| diff < rel * 0.5 * (new.abs() + old.abs()) || (rel > 0.0 && diff == 0.0));
        abs_ok || rel_ok
    }
}
