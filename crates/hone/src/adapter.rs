use std::cell::RefCell;

use hone_engine::StopHandle;
use tracing::trace;

use crate::StopCriteria;

/// Bridges the solver's `&[f64]` callback to a `&[f64; N]` objective.
///
/// Each evaluation polls the stop condition first and, if it fires, asks the
/// solver to stop through `stop`. The evaluation itself still runs so the
/// solver gets a score for the point it asked about.
///
/// The objective sits in a `RefCell` so the global and local contexts of a
/// composed run can share it. The solver never runs them concurrently.
pub(crate) struct ObjectiveAdapter<'f, const N: usize, F: ?Sized> {
    objective: &'f RefCell<F>,
    criteria: StopCriteria,
    stop: StopHandle,
}

impl<'f, const N: usize, F> ObjectiveAdapter<'f, N, F>
where
    F: FnMut(&[f64; N]) -> f64 + ?Sized,
{
    pub(crate) fn new(objective: &'f RefCell<F>, criteria: StopCriteria, stop: StopHandle) -> Self {
        Self {
            objective,
            criteria,
            stop,
        }
    }

    pub(crate) fn evaluate(&self, x: &[f64]) -> f64 {
        if self.criteria.should_stop() {
            trace!("stop condition fired, forcing solver stop");
            self.stop.force_stop();
        }

        let Some(x) = x.first_chunk::<N>() else {
            return f64::NAN;
        };
        let mut objective = self.objective.borrow_mut();
        (&mut *objective)(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use approx::assert_relative_eq;

    #[test]
    fn views_the_leading_values() {
        let objective = RefCell::new(|x: &[f64; 2]| x[0] - x[1]);
        let adapter: ObjectiveAdapter<'_, 2, _> =
            ObjectiveAdapter::new(&objective, StopCriteria::default(), StopHandle::default());

        assert_relative_eq!(adapter.evaluate(&[5.0, 3.0]), 2.0);
        assert_relative_eq!(adapter.evaluate(&[5.0, 3.0, 100.0]), 2.0);
        assert!(adapter.evaluate(&[5.0]).is_nan());
    }

    #[test]
    fn forces_stop_but_still_evaluates() {
        let flag = Arc::new(AtomicBool::new(false));
        let source = Arc::clone(&flag);
        let criteria = StopCriteria::default().with_stop_condition(move || source.load(Ordering::Relaxed));
        let stop = StopHandle::default();

        let calls = RefCell::new(0);
        let objective = RefCell::new(|x: &[f64; 1]| {
            *calls.borrow_mut() += 1;
            x[0]
        });
        let adapter: ObjectiveAdapter<'_, 1, _> = ObjectiveAdapter::new(&objective, criteria, stop.clone());

        adapter.evaluate(&[1.0]);
        assert!(!stop.is_stopped());

        flag.store(true, Ordering::Relaxed);
        assert_relative_eq!(adapter.evaluate(&[4.0]), 4.0);
        assert!(stop.is_stopped());
        assert_eq!(*calls.borrow(), 2);
    }
}
